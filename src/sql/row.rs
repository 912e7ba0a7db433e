//! Row decoding into JSON objects (column name to value).
//!
//! A NULL cell becomes `null`. A non-NULL cell whose type has no JSON mapping fails the row
//! with [`sqlx::Error::ColumnDecode`] naming the column, so the read reports it instead of
//! returning a silent `null`.

use serde_json::{Map, Number, Value};
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

pub fn pg_row_to_json(row: &PgRow) -> Result<Value, sqlx::Error> {
    let mut map = Map::new();
    for col in row.columns() {
        let idx = col.ordinal();
        let value = if row.try_get_raw(idx)?.is_null() {
            Value::Null
        } else {
            pg_cell_to_value(row, idx)
                .ok_or_else(|| undecodable(col.name(), col.type_info().name()))?
        };
        map.insert(col.name().to_string(), value);
    }
    Ok(Value::Object(map))
}

pub fn sqlite_row_to_json(row: &SqliteRow) -> Result<Value, sqlx::Error> {
    let mut map = Map::new();
    for col in row.columns() {
        let idx = col.ordinal();
        let value = if row.try_get_raw(idx)?.is_null() {
            Value::Null
        } else {
            sqlite_cell_to_value(row, idx)
                .ok_or_else(|| undecodable(col.name(), col.type_info().name()))?
        };
        map.insert(col.name().to_string(), value);
    }
    Ok(Value::Object(map))
}

fn undecodable(column: &str, type_name: &str) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("unsupported column type {}; cast it in the template (e.g. {}::text)", type_name, column)
            .into(),
    }
}

// NaN and infinities have no JSON number.
fn float(n: f64) -> Value {
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

fn json_array<T: Into<Value>>(items: Vec<T>) -> Value {
    Value::Array(items.into_iter().map(Into::into).collect())
}

fn hex(bytes: &[u8]) -> String {
    let digits: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("\\x{}", digits)
}

fn pg_cell_to_value(row: &PgRow, idx: usize) -> Option<Value> {
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(idx) {
        return Some(Value::Number(n.into()));
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(idx) {
        return Some(Value::Number(n.into()));
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(idx) {
        return Some(Value::Number(n.into()));
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(idx) {
        return Some(float(n as f64));
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(idx) {
        return Some(float(n));
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(idx) {
        return Some(Value::Bool(b));
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(idx) {
        return Some(Value::String(u.to_string()));
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        return Some(Value::String(d.to_rfc3339()));
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return Some(Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string()));
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return Some(Value::String(d.format("%Y-%m-%d").to_string()));
    }
    if let Ok(Some(t)) = row.try_get::<Option<chrono::NaiveTime>, _>(idx) {
        return Some(Value::String(t.format("%H:%M:%S%.f").to_string()));
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(idx) {
        return Some(Value::String(s));
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(idx) {
        return Some(j);
    }
    if let Ok(Some(b)) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return Some(Value::String(hex(&b)));
    }
    if let Ok(Some(items)) = row.try_get::<Option<Vec<String>>, _>(idx) {
        return Some(json_array(items));
    }
    if let Ok(Some(items)) = row.try_get::<Option<Vec<i64>>, _>(idx) {
        return Some(json_array(items));
    }
    if let Ok(Some(items)) = row.try_get::<Option<Vec<i32>>, _>(idx) {
        return Some(json_array(items));
    }
    if let Ok(Some(items)) = row.try_get::<Option<Vec<bool>>, _>(idx) {
        return Some(json_array(items));
    }
    None
}

// INTEGER before anything else so 0/1 columns stay numbers.
fn sqlite_cell_to_value(row: &SqliteRow, idx: usize) -> Option<Value> {
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(idx) {
        return Some(Value::Number(n.into()));
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(idx) {
        return Some(float(n));
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(idx) {
        return Some(Value::String(s));
    }
    if let Ok(Some(b)) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return Some(Value::String(String::from_utf8_lossy(&b).into_owned()));
    }
    None
}
