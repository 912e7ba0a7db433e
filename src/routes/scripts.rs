//! Script routes: one route accepting every method; unsupported ones fail in the pipeline.

use crate::handlers::execute_script;
use crate::state::AppState;
use axum::{routing::any, Router};
use tower_http::trace::TraceLayer;

pub fn script_routes(state: AppState) -> Router {
    Router::new()
        .route("/_QUERIES/:folder/:script", any(execute_script))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
