//! Load settings from the process environment.

use crate::config::{PlaceholderStyle, ScriptsConfig};
use crate::error::ConfigError;
use std::path::PathBuf;

pub const QUERIES_PATH_VAR: &str = "SQLSCRIPT_QUERIES_PATH";
pub const PLACEHOLDER_VAR: &str = "SQLSCRIPT_PLACEHOLDER";
pub const DEFAULT_QUERIES_PATH: &str = "./queries";

/// Settings from `SQLSCRIPT_QUERIES_PATH` (default `./queries`) and `SQLSCRIPT_PLACEHOLDER`
/// (`dollar` or `question`, default `dollar`).
pub fn from_env() -> Result<ScriptsConfig, ConfigError> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Same as [`from_env`] with an arbitrary variable source.
pub fn from_lookup<F>(lookup: F) -> Result<ScriptsConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let queries_path = lookup(QUERIES_PATH_VAR)
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_QUERIES_PATH));
    let placeholder = match lookup(PLACEHOLDER_VAR) {
        Some(s) if !s.trim().is_empty() => s.parse::<PlaceholderStyle>()?,
        _ => PlaceholderStyle::default(),
    };
    Ok(ScriptsConfig {
        queries_path,
        placeholder,
    })
}
