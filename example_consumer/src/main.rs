//! Example consumer: serves the templates under `SQLSCRIPT_QUERIES_PATH` against `DATABASE_URL`.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Or from this directory: `cargo run`

use sqlscript::{common_routes, config, script_routes, AppState, PgLazyProvider, ScriptEngine, ScriptService};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sqlscript=info,tower_http=info")),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/sqlscript".into());
    let scripts_config = config::from_env()?;
    config::validate(&scripts_config)?;

    let provider = PgLazyProvider::new(database_url).with_max_connections(5);
    let engine = ScriptEngine::new(Arc::new(provider));
    let state = AppState::new(ScriptService::new(&scripts_config, engine));

    let app = axum::Router::new()
        .merge(common_routes(state.clone()))
        .merge(script_routes(state));

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!(
        queries = %scripts_config.queries_path.display(),
        "listening on http://{}",
        listener.local_addr()?
    );
    axum::serve(listener, app).await?;
    Ok(())
}
