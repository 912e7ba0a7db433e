//! Maps (verb, folder, name) to a template file under the queries root.

use crate::error::ScriptError;
use crate::verb::Verb;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct TemplateResolver {
    root: PathBuf,
}

/// A single path segment of ASCII letters, digits, `_` or `-`.
fn valid_segment(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl TemplateResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        TemplateResolver { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<folder>/<name><suffix>` without touching the filesystem.
    pub fn script_path(&self, verb: Verb, folder: &str, name: &str) -> Result<PathBuf, ScriptError> {
        for segment in [folder, name] {
            if !valid_segment(segment) {
                return Err(ScriptError::InvalidResourceName(segment.to_string()));
            }
        }
        Ok(self.root.join(folder).join(format!("{}{}", name, verb.suffix())))
    }

    /// Parse the HTTP method, then resolve. Unknown methods never reach the filesystem.
    pub async fn resolve(&self, method: &str, folder: &str, name: &str) -> Result<PathBuf, ScriptError> {
        let verb: Verb = method.parse()?;
        self.resolve_verb(verb, folder, name).await
    }

    /// Existence is re-checked on every call.
    pub async fn resolve_verb(&self, verb: Verb, folder: &str, name: &str) -> Result<PathBuf, ScriptError> {
        let path = self.script_path(verb, folder, name)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(ScriptError::TemplateNotFound(path)),
        }
    }
}
