//! Runtime settings for the script pipeline.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// How positional bind placeholders are spelled in rendered SQL.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `$1, $2, ...` (PostgreSQL).
    #[default]
    Dollar,
    /// `?` (SQLite, MySQL). Values bind in the order the placeholders are written.
    Question,
}

impl PlaceholderStyle {
    /// Placeholder for the 1-based position `n`.
    pub fn placeholder(self, n: usize) -> String {
        match self {
            PlaceholderStyle::Dollar => format!("${}", n),
            PlaceholderStyle::Question => "?".to_string(),
        }
    }
}

impl FromStr for PlaceholderStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dollar" | "$" => Ok(PlaceholderStyle::Dollar),
            "question" | "?" => Ok(PlaceholderStyle::Question),
            _ => Err(ConfigError::InvalidPlaceholder(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScriptsConfig {
    /// Root under which `<folder>/<name><suffix>` templates live.
    pub queries_path: PathBuf,
    #[serde(default)]
    pub placeholder: PlaceholderStyle,
}

impl ScriptsConfig {
    pub fn new(queries_path: impl Into<PathBuf>) -> Self {
        ScriptsConfig {
            queries_path: queries_path.into(),
            placeholder: PlaceholderStyle::default(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: PlaceholderStyle) -> Self {
        self.placeholder = placeholder;
        self
    }
}
