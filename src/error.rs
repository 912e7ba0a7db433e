//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid placeholder style '{0}' (expected 'dollar' or 'question')")]
    InvalidPlaceholder(String),
    #[error("queries path {0} is not a directory")]
    QueriesPath(PathBuf),
}

/// Every failure the script pipeline can produce. Carried inside a [`crate::engine::Scanner`]
/// rather than raised across the execution boundary.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("invalid http method {0}")]
    UnsupportedVerb(String),
    #[error("invalid resource name '{0}'")]
    InvalidResourceName(String),
    #[error("could not load {}", .0.display())]
    TemplateNotFound(PathBuf),
    #[error("could not parse file {}: {source}", path.display())]
    TemplateParse {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("could not execute template: {0}")]
    TemplateExec(#[source] minijinja::Error),
    #[error("database connection unavailable: {0}")]
    ConnectionUnavailable(#[source] sqlx::Error),
    #[error("could not begin transaction: {0}")]
    TransactionBeginFailed(#[source] sqlx::Error),
    #[error("could not prepare sql `{sql}`: {source}")]
    StatementPrepareFailed {
        sql: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("could not perform sql `{sql}`: {source}")]
    StatementExecFailed {
        sql: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("could not run query `{sql}`: {source}")]
    QueryFailed {
        sql: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("could not read rows affected: {0}")]
    RowCountUnavailable(#[source] serde_json::Error),
    #[error("could not commit transaction: {0}")]
    CommitFailed(#[source] sqlx::Error),
    #[error("could not encode result: {0}")]
    ResultEncoding(#[source] serde_json::Error),
}

impl ScriptError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ScriptError::UnsupportedVerb(_) => "unsupported_verb",
            ScriptError::InvalidResourceName(_) => "invalid_resource_name",
            ScriptError::TemplateNotFound(_) => "template_not_found",
            ScriptError::TemplateParse { .. } => "template_parse_error",
            ScriptError::TemplateExec(_) => "template_exec_error",
            ScriptError::ConnectionUnavailable(_) => "connection_unavailable",
            ScriptError::TransactionBeginFailed(_) => "transaction_begin_failed",
            ScriptError::StatementPrepareFailed { .. } => "statement_prepare_failed",
            ScriptError::StatementExecFailed { .. } => "statement_exec_failed",
            ScriptError::QueryFailed { .. } => "query_failed",
            ScriptError::RowCountUnavailable(_) => "row_count_unavailable",
            ScriptError::CommitFailed(_) => "commit_failed",
            ScriptError::ResultEncoding(_) => "result_encoding_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ScriptError::UnsupportedVerb(_) => StatusCode::METHOD_NOT_ALLOWED,
            ScriptError::TemplateNotFound(_) => StatusCode::NOT_FOUND,
            ScriptError::InvalidResourceName(_)
            | ScriptError::TemplateParse { .. }
            | ScriptError::TemplateExec(_)
            | ScriptError::StatementPrepareFailed { .. }
            | ScriptError::StatementExecFailed { .. }
            | ScriptError::QueryFailed { .. } => StatusCode::BAD_REQUEST,
            ScriptError::ConnectionUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ScriptError::TransactionBeginFailed(_)
            | ScriptError::RowCountUnavailable(_)
            | ScriptError::CommitFailed(_)
            | ScriptError::ResultEncoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ScriptError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}
