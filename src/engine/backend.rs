//! Database seam: who lends a handle, and what the engine needs from it.

use crate::error::ScriptError;
use crate::sql::BindValue;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Failure of a single write statement, split by the step that failed.
#[derive(Debug)]
pub enum WriteError {
    Prepare(sqlx::Error),
    Exec(sqlx::Error),
}

/// An open transaction. Dropping it without commit rolls it back.
#[async_trait]
pub trait WriteTransaction: Send {
    /// Prepare `sql` inside the transaction and execute it; returns rows affected.
    async fn execute(&mut self, sql: &str, values: &[BindValue]) -> Result<u64, WriteError>;
    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error>;
    async fn rollback(self: Box<Self>) -> Result<(), sqlx::Error>;
}

/// A ready-to-use handle (normally a pool). Shared across concurrent requests.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run a query outside any explicit transaction and decode every row to a JSON object.
    async fn fetch_rows(&self, sql: &str, values: &[BindValue]) -> Result<Vec<Value>, sqlx::Error>;
    async fn begin(&self) -> Result<Box<dyn WriteTransaction>, sqlx::Error>;
}

/// Supplies database handles; owned and lifecycled outside the engine.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn get(&self) -> Result<Arc<dyn Database>, ScriptError>;
}

/// Hands out one pre-built handle.
#[derive(Clone)]
pub struct StaticProvider {
    db: Arc<dyn Database>,
}

impl StaticProvider {
    pub fn new(db: impl Database + 'static) -> Self {
        StaticProvider { db: Arc::new(db) }
    }
}

#[async_trait]
impl ConnectionProvider for StaticProvider {
    async fn get(&self) -> Result<Arc<dyn Database>, ScriptError> {
        Ok(self.db.clone())
    }
}
