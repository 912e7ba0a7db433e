//! Runs rendered statements: reads without a transaction, writes inside one.

pub mod backend;
pub mod postgres;
pub mod scanner;
pub mod sqlite;

pub use backend::{ConnectionProvider, Database, StaticProvider, WriteError, WriteTransaction};
pub use postgres::PgLazyProvider;
pub use scanner::{RowSet, Scanner, WriteSummary};

use crate::error::ScriptError;
use crate::sql::BindValue;
use crate::verb::Verb;
use std::sync::Arc;

#[derive(Clone)]
pub struct ScriptEngine {
    provider: Arc<dyn ConnectionProvider>,
}

async fn rollback(tx: Box<dyn WriteTransaction>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "rollback failed");
    }
}

impl ScriptEngine {
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        ScriptEngine { provider }
    }

    pub fn from_database(db: impl Database + 'static) -> Self {
        Self::new(Arc::new(StaticProvider::new(db)))
    }

    /// Dispatch on the HTTP method. Never fails: every outcome is in the Scanner.
    pub async fn execute(&self, method: &str, sql: &str, values: &[BindValue]) -> Scanner {
        match method.parse::<Verb>() {
            Ok(verb) => self.execute_verb(verb, sql, values).await,
            Err(e) => Scanner::Failed(e),
        }
    }

    pub async fn execute_verb(&self, verb: Verb, sql: &str, values: &[BindValue]) -> Scanner {
        let sc = if verb.is_write() {
            self.write(sql, values).await
        } else {
            self.query(sql, values).await
        };
        if let Some(e) = sc.error() {
            tracing::warn!(verb = %verb, code = e.code(), error = %e, "script failed");
        }
        sc
    }

    /// Read path: no explicit transaction, no partial rows on failure.
    pub async fn query(&self, sql: &str, values: &[BindValue]) -> Scanner {
        let db = match self.provider.get().await {
            Ok(db) => db,
            Err(e) => return Scanner::Failed(e),
        };
        match db.fetch_rows(sql, values).await {
            Ok(rows) => Scanner::rows(rows),
            Err(source) => Scanner::Failed(ScriptError::QueryFailed {
                sql: sql.to_string(),
                source,
            }),
        }
    }

    /// Write path: begin, prepare, execute, count, commit. Any failure before commit rolls back.
    /// The row count and payload are produced before commit, so a reported failure means
    /// nothing was applied.
    pub async fn write(&self, sql: &str, values: &[BindValue]) -> Scanner {
        let db = match self.provider.get().await {
            Ok(db) => db,
            Err(e) => return Scanner::Failed(e),
        };
        let mut tx = match db.begin().await {
            Ok(tx) => tx,
            Err(e) => return Scanner::Failed(ScriptError::TransactionBeginFailed(e)),
        };
        let rows_affected = match tx.execute(sql, values).await {
            Ok(n) => n,
            Err(e) => {
                rollback(tx).await;
                let sql = sql.to_string();
                return Scanner::Failed(match e {
                    WriteError::Prepare(source) => ScriptError::StatementPrepareFailed { sql, source },
                    WriteError::Exec(source) => ScriptError::StatementExecFailed { sql, source },
                });
            }
        };
        let summary = match WriteSummary::encode(rows_affected) {
            Ok(s) => s,
            Err(e) => {
                rollback(tx).await;
                return Scanner::Failed(ScriptError::RowCountUnavailable(e));
            }
        };
        if let Err(e) = tx.commit().await {
            return Scanner::Failed(ScriptError::CommitFailed(e));
        }
        Scanner::Summary(summary)
    }
}
