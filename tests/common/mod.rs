//! Shared fixtures: an in-memory SQLite table and a temporary templates root.

#![allow(dead_code)]

use sqlscript::{PlaceholderStyle, ScriptEngine, ScriptService, ScriptsConfig};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tempfile::TempDir;

/// One connection so every statement sees the same in-memory database.
pub async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query("CREATE TABLE t (id INTEGER PRIMARY KEY, v INTEGER NOT NULL CHECK (v >= 0))")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO t (id, v) VALUES (1, 0)")
        .execute(&pool)
        .await
        .unwrap();
    pool
}

pub async fn value_of(pool: &SqlitePool, id: i64) -> Option<i64> {
    sqlx::query_scalar::<_, i64>("SELECT v FROM t WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .unwrap()
}

pub fn write_template(root: &Path, folder: &str, file: &str, source: &str) {
    std::fs::create_dir_all(root.join(folder)).unwrap();
    std::fs::write(root.join(folder).join(file), source).unwrap();
}

/// Templates for `crm/items` covering every verb.
pub fn templates() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_template(
        root,
        "crm",
        "items.read.sql",
        "SELECT id, v FROM t{% if id is defined %} WHERE id = {{ id }}{% endif %} ORDER BY id",
    );
    write_template(root, "crm", "items.write.sql", "INSERT INTO t (id, v) VALUES ({{ id|int }}, {{ v|int }})");
    write_template(root, "crm", "items.update.sql", "UPDATE t SET v = {{ v|int }} WHERE id = {{ id|int }}");
    write_template(root, "crm", "items.delete.sql", "DELETE FROM t WHERE id IN {{ in_format('ids') }}");
    dir
}

pub fn service(root: &Path, pool: SqlitePool) -> ScriptService {
    let config = ScriptsConfig::new(root).with_placeholder(PlaceholderStyle::Question);
    ScriptService::new(&config, ScriptEngine::from_database(pool))
}
