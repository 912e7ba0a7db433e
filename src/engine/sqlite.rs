//! SQLite backend over `sqlx::SqlitePool`.

use crate::engine::backend::{Database, WriteError, WriteTransaction};
use crate::sql::{sqlite_row_to_json, BindValue};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::{Executor, Statement, Transaction};

#[async_trait]
impl Database for SqlitePool {
    async fn fetch_rows(&self, sql: &str, values: &[BindValue]) -> Result<Vec<Value>, sqlx::Error> {
        tracing::debug!(sql = %sql, params = ?values, "query");
        let mut query = sqlx::query(sql);
        for v in values {
            query = query.bind(v.clone());
        }
        let rows = query.fetch_all(self).await?;
        rows.iter().map(sqlite_row_to_json).collect()
    }

    async fn begin(&self) -> Result<Box<dyn WriteTransaction>, sqlx::Error> {
        let tx = sqlx::Pool::begin(self).await?;
        Ok(Box::new(SqliteWrite { tx }))
    }
}

struct SqliteWrite {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl WriteTransaction for SqliteWrite {
    async fn execute(&mut self, sql: &str, values: &[BindValue]) -> Result<u64, WriteError> {
        tracing::debug!(sql = %sql, params = ?values, "query (tx)");
        let stmt = (&mut *self.tx).prepare(sql).await.map_err(WriteError::Prepare)?;
        let mut query = stmt.query();
        for v in values {
            query = query.bind(v.clone());
        }
        let done = query.execute(&mut *self.tx).await.map_err(WriteError::Exec)?;
        Ok(done.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }
}
