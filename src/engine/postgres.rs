//! PostgreSQL backend over `sqlx::PgPool`.

use crate::engine::backend::{ConnectionProvider, Database, WriteError, WriteTransaction};
use crate::error::ScriptError;
use crate::sql::{pg_row_to_json, BindValue};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::encode::Encode;
use sqlx::postgres::{PgPool, PgPoolOptions, PgTypeInfo, Postgres};
use sqlx::{Executor, Statement, Transaction, Type};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Declared parameter types, so the prepared statement agrees with what gets bound.
fn param_types(values: &[BindValue]) -> Vec<PgTypeInfo> {
    values
        .iter()
        .map(|v| {
            <BindValue as Encode<Postgres>>::produces(v)
                .unwrap_or_else(<BindValue as Type<Postgres>>::type_info)
        })
        .collect()
}

#[async_trait]
impl Database for PgPool {
    async fn fetch_rows(&self, sql: &str, values: &[BindValue]) -> Result<Vec<Value>, sqlx::Error> {
        tracing::debug!(sql = %sql, params = ?values, "query");
        let mut query = sqlx::query(sql);
        for v in values {
            query = query.bind(v.clone());
        }
        let rows = query.fetch_all(self).await?;
        rows.iter().map(pg_row_to_json).collect()
    }

    async fn begin(&self) -> Result<Box<dyn WriteTransaction>, sqlx::Error> {
        let tx = sqlx::Pool::begin(self).await?;
        Ok(Box::new(PgWrite { tx }))
    }
}

struct PgWrite {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl WriteTransaction for PgWrite {
    async fn execute(&mut self, sql: &str, values: &[BindValue]) -> Result<u64, WriteError> {
        tracing::debug!(sql = %sql, params = ?values, "query (tx)");
        let types = param_types(values);
        let stmt = (&mut *self.tx)
            .prepare_with(sql, &types)
            .await
            .map_err(WriteError::Prepare)?;
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

/// Connects on first use and keeps the pool. A failed connect is reported as
/// `ConnectionUnavailable` and retried on the next call.
pub struct PgLazyProvider {
    url: String,
    max_connections: u32,
    pool: OnceCell<PgPool>,
}

impl PgLazyProvider {
    pub fn new(url: impl Into<String>) -> Self {
        PgLazyProvider {
            url: url.into(),
            max_connections: 5,
            pool: OnceCell::new(),
        }
    }

    pub fn with_max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }
}

#[async_trait]
impl ConnectionProvider for PgLazyProvider {
    async fn get(&self) -> Result<Arc<dyn Database>, ScriptError> {
        let pool = self
            .pool
            .get_or_try_init(|| async {
                PgPoolOptions::new()
                    .max_connections(self.max_connections)
                    .connect(&self.url)
                    .await
            })
            .await
            .map_err(ScriptError::ConnectionUnavailable)?;
        Ok(Arc::new(pool.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_types_follow_values() {
        let types = param_types(&[BindValue::Int(1), BindValue::Text("a".into()), BindValue::Bool(true)]);
        assert_eq!(types[0], <i64 as Type<Postgres>>::type_info());
        assert_eq!(types[1], <String as Type<Postgres>>::type_info());
        assert_eq!(types[2], <bool as Type<Postgres>>::type_info());
    }

    #[tokio::test]
    async fn unreachable_database_is_connection_unavailable() {
        let provider = PgLazyProvider::new("not a url");
        let err = provider.get().await.err().unwrap();
        assert!(matches!(err, ScriptError::ConnectionUnavailable(_)));
    }
}
