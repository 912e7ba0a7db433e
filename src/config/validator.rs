//! Config validation.

use crate::config::ScriptsConfig;
use crate::error::ConfigError;

/// The templates root must be an existing directory.
pub fn validate(config: &ScriptsConfig) -> Result<(), ConfigError> {
    if !config.queries_path.is_dir() {
        return Err(ConfigError::QueriesPath(config.queries_path.clone()));
    }
    Ok(())
}
