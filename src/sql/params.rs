//! Positional values that sqlx can bind for PostgreSQL and SQLite.

use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::{Database, Type};

type BoxDynError = Box<dyn std::error::Error + Send + Sync>;

/// A value bound to a statement placeholder. Never spliced into SQL text.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for BindValue {
    fn from(b: bool) -> Self {
        BindValue::Bool(b)
    }
}

impl From<i32> for BindValue {
    fn from(n: i32) -> Self {
        BindValue::Int(n.into())
    }
}

impl From<i64> for BindValue {
    fn from(n: i64) -> Self {
        BindValue::Int(n)
    }
}

impl From<f64> for BindValue {
    fn from(n: f64) -> Self {
        BindValue::Float(n)
    }
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::Text(s.to_string())
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::Text(s)
    }
}

impl<'q> Encode<'q, Postgres> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        Ok(match self {
            BindValue::Null => <Option<i32> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            BindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            BindValue::Int(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            BindValue::Float(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            BindValue::Text(s) => <String as Encode<Postgres>>::encode_by_ref(s, buf)?,
        })
    }

    /// Text binds as TEXT; templates cast (`{{ id }}::int`) when the column type differs.
    fn produces(&self) -> Option<PgTypeInfo> {
        match self {
            BindValue::Null | BindValue::Text(_) => None,
            BindValue::Bool(_) => Some(<bool as Type<Postgres>>::type_info()),
            BindValue::Int(_) => Some(<i64 as Type<Postgres>>::type_info()),
            BindValue::Float(_) => Some(<f64 as Type<Postgres>>::type_info()),
        }
    }
}

impl Type<Postgres> for BindValue {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }
}

impl<'q> Encode<'q, Sqlite> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        Ok(match self {
            BindValue::Null => <Option<i64> as Encode<Sqlite>>::encode_by_ref(&None, buf)?,
            BindValue::Bool(b) => <bool as Encode<Sqlite>>::encode_by_ref(b, buf)?,
            BindValue::Int(n) => <i64 as Encode<Sqlite>>::encode_by_ref(n, buf)?,
            BindValue::Float(n) => <f64 as Encode<Sqlite>>::encode_by_ref(n, buf)?,
            BindValue::Text(s) => <String as Encode<Sqlite>>::encode_by_ref(s, buf)?,
        })
    }
}

impl Type<Sqlite> for BindValue {
    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }
}

