//! Common routes: health, readiness, version.

use crate::response::error_body;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> Result<Json<HealthBody>, (StatusCode, Json<serde_json::Value>)> {
    let sc = state.scripts.engine().query("SELECT 1", &[]).await;
    if let Some(e) = sc.error() {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(error_body(e.code(), e.to_string())),
        ));
    }
    Ok(Json(HealthBody { status: "ok" }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health, GET /ready (runs `SELECT 1`), GET /version.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
