//! Turns a Scanner into an HTTP response.

use crate::engine::Scanner;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Success: 200 with the scanner's JSON payload as-is. Failure: the error envelope.
pub fn scanner_response(sc: Scanner) -> Response {
    match sc.into_result() {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn error_body(code: &str, message: String) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}
