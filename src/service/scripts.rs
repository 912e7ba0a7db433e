//! The script pipeline: resource + verb + params to a Scanner.

use crate::config::ScriptsConfig;
use crate::engine::{ScriptEngine, Scanner};
use crate::error::ScriptError;
use crate::script::{ParamSet, RenderedStatement, TemplateRenderer, TemplateResolver};
use crate::verb::Verb;
use std::path::PathBuf;

#[derive(Clone)]
pub struct ScriptService {
    resolver: TemplateResolver,
    renderer: TemplateRenderer,
    engine: ScriptEngine,
}

impl ScriptService {
    pub fn new(config: &ScriptsConfig, engine: ScriptEngine) -> Self {
        ScriptService {
            resolver: TemplateResolver::new(&config.queries_path),
            renderer: TemplateRenderer::new(config.placeholder),
            engine,
        }
    }

    pub fn engine(&self) -> &ScriptEngine {
        &self.engine
    }

    /// Resolve and render without executing.
    pub async fn prepare(
        &self,
        verb: Verb,
        folder: &str,
        name: &str,
        params: &ParamSet,
    ) -> Result<(PathBuf, RenderedStatement), ScriptError> {
        let path = self.resolver.resolve_verb(verb, folder, name).await?;
        let statement = self.renderer.render(&path, params).await?;
        Ok((path, statement))
    }

    /// Run `<folder>/<name>` for `method`. Pipeline errors land in the Scanner.
    pub async fn run(&self, method: &str, folder: &str, name: &str, params: &ParamSet) -> Scanner {
        let verb = match method.parse::<Verb>() {
            Ok(v) => v,
            Err(e) => return Scanner::Failed(e),
        };
        tracing::debug!(verb = %verb, folder = %folder, script = %name, params = params.len(), "script");
        match self.prepare(verb, folder, name, params).await {
            Ok((_, statement)) => {
                self.engine
                    .execute_verb(verb, &statement.sql, &statement.values)
                    .await
            }
            Err(e) => {
                tracing::warn!(verb = %verb, folder = %folder, script = %name, error = %e, "script not prepared");
                Scanner::Failed(e)
            }
        }
    }
}
