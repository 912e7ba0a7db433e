//! sqlscript: templated SQL scripts resolved per resource and HTTP verb, rendered with bound
//! parameters and executed with verb-appropriate transaction semantics.

pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod script;
pub mod service;
pub mod sql;
pub mod state;
pub mod verb;

pub use config::{PlaceholderStyle, ScriptsConfig};
pub use engine::{ConnectionProvider, Database, PgLazyProvider, Scanner, ScriptEngine, StaticProvider};
pub use error::{ConfigError, ScriptError};
pub use routes::{common_routes, script_routes};
pub use script::{ParamSet, RenderedStatement, TemplateRenderer, TemplateResolver};
pub use service::ScriptService;
pub use sql::BindValue;
pub use state::AppState;
pub use verb::Verb;
