//! Script handler: any method on /_QUERIES/:folder/:script.

use crate::response::scanner_response;
use crate::script::ParamSet;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::Method,
    response::Response,
};

/// Query pairs become the parameter set (last value wins); the method picks the template.
pub async fn execute_script(
    State(state): State<AppState>,
    method: Method,
    Path((folder, script)): Path<(String, String)>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = ParamSet::from_pairs(pairs);
    let sc = state.scripts.run(method.as_str(), &folder, &script, &params).await;
    scanner_response(sc)
}
