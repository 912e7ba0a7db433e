//! Renders a template file against a parameter set into SQL text plus bound values.

use crate::config::PlaceholderStyle;
use crate::error::ScriptError;
use crate::script::{FuncRegistry, ParamSet};
use crate::sql::BindValue;
use minijinja::{Environment, UndefinedBehavior};
use std::path::Path;

/// SQL produced by substitution only; user values travel in `values`.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedStatement {
    pub sql: String,
    pub values: Vec<BindValue>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateRenderer {
    placeholder: PlaceholderStyle,
}

impl TemplateRenderer {
    pub fn new(placeholder: PlaceholderStyle) -> Self {
        TemplateRenderer { placeholder }
    }

    /// Read `path` and render it under its base name. Each call builds its own environment
    /// and helper registry.
    pub async fn render(&self, path: &Path, params: &ParamSet) -> Result<RenderedStatement, ScriptError> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ScriptError::TemplateParse {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("script.sql");
        self.render_source(path, name, &source, params)
    }

    /// Render an in-memory template; `name` stands in for the path in errors.
    pub fn render_str(&self, name: &str, source: &str, params: &ParamSet) -> Result<RenderedStatement, ScriptError> {
        self.render_source(Path::new(name), name, source, params)
    }

    fn render_source(
        &self,
        path: &Path,
        name: &str,
        source: &str,
        params: &ParamSet,
    ) -> Result<RenderedStatement, ScriptError> {
        let parse_err = |e: minijinja::Error| ScriptError::TemplateParse {
            path: path.to_path_buf(),
            source: Box::new(e),
        };
        let funcs = FuncRegistry::new(params.clone(), self.placeholder);
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        funcs.register(&mut env);
        env.add_template(name, source).map_err(parse_err)?;
        let template = env.get_template(name).map_err(parse_err)?;
        let rendered = template.render(funcs.params()).map_err(ScriptError::TemplateExec)?;
        let (sql, values) = funcs.finish(&rendered).map_err(ScriptError::TemplateExec)?;
        tracing::debug!(template = %name, sql = %sql, params = ?values, "rendered");
        Ok(RenderedStatement { sql, values })
    }
}
