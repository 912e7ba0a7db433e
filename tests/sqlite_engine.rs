mod common;

use serde_json::{json, Value};
use sqlscript::{BindValue, ParamSet, ScriptEngine, ScriptError};

fn payload_json(sc: &sqlscript::Scanner) -> Value {
    serde_json::from_slice(sc.payload().expect("payload")).unwrap()
}

#[tokio::test]
async fn patch_commits_and_reports_rows_affected() {
    let pool = common::pool().await;
    let engine = ScriptEngine::from_database(pool.clone());
    let sc = engine
        .execute("PATCH", "UPDATE t SET v = ? WHERE id = ?", &[BindValue::Int(5), BindValue::Int(1)])
        .await;
    assert!(sc.error().is_none(), "{:?}", sc.error());
    assert_eq!(sc.payload().unwrap(), br#"{"rows_affected":1}"#);
    assert_eq!(common::value_of(&pool, 1).await, Some(5));
}

#[tokio::test]
async fn constraint_violation_leaves_rows_unchanged() {
    let pool = common::pool().await;
    let engine = ScriptEngine::from_database(pool.clone());
    let sql = "UPDATE t SET v = ? WHERE id = ?";
    let sc = engine.execute("PATCH", sql, &[BindValue::Int(-1), BindValue::Int(1)]).await;
    let err = sc.error().expect("error");
    assert!(matches!(err, ScriptError::StatementExecFailed { .. }));
    assert!(err.to_string().contains(sql));
    assert!(sc.payload().is_none());
    assert_eq!(common::value_of(&pool, 1).await, Some(0));
}

#[tokio::test]
async fn failed_multi_row_insert_is_rolled_back() {
    let pool = common::pool().await;
    let engine = ScriptEngine::from_database(pool.clone());
    let sc = engine
        .execute("POST", "INSERT INTO t (id, v) VALUES (2, 1), (1, 1)", &[])
        .await;
    assert!(sc.error().is_some());
    assert_eq!(common::value_of(&pool, 2).await, None);
    assert_eq!(common::value_of(&pool, 1).await, Some(0));
}

#[tokio::test]
async fn malformed_sql_fails_at_prepare() {
    let pool = common::pool().await;
    let engine = ScriptEngine::from_database(pool.clone());
    let sc = engine.execute("DELETE", "DELET FROM t", &[]).await;
    assert!(matches!(sc.error(), Some(ScriptError::StatementPrepareFailed { .. })));
    assert_eq!(common::value_of(&pool, 1).await, Some(0));
}

#[tokio::test]
async fn get_returns_matching_rows() {
    let pool = common::pool().await;
    let engine = ScriptEngine::from_database(pool);
    let sc = engine.execute("GET", "SELECT * FROM t WHERE id = ?", &[BindValue::Int(1)]).await;
    assert!(sc.error().is_none());
    assert_eq!(payload_json(&sc), json!([{"id": 1, "v": 0}]));
}

#[tokio::test]
async fn get_decodes_real_blob_and_null_cells() {
    let pool = common::pool().await;
    let engine = ScriptEngine::from_database(pool);
    let sc = engine
        .execute("GET", "SELECT 1.5 AS f, x'6869' AS b, NULL AS n, 'x' AS s", &[])
        .await;
    assert!(sc.error().is_none(), "{:?}", sc.error());
    assert_eq!(payload_json(&sc), json!([{"f": 1.5, "b": "hi", "n": null, "s": "x"}]));
}

#[tokio::test]
async fn options_is_unsupported() {
    let pool = common::pool().await;
    let engine = ScriptEngine::from_database(pool);
    let sc = engine.execute("OPTIONS", "SELECT 1", &[]).await;
    assert!(matches!(sc.error(), Some(ScriptError::UnsupportedVerb(_))));
    assert!(sc.payload().is_none());
}

#[tokio::test]
async fn service_runs_templates_end_to_end() {
    let pool = common::pool().await;
    let dir = common::templates();
    let svc = common::service(dir.path(), pool.clone());

    let sc = svc.run("POST", "crm", "items", &ParamSet::new().with("id", "2").with("v", "7")).await;
    assert_eq!(payload_json(&sc), json!({"rows_affected": 1}));

    let sc = svc.run("PUT", "crm", "items", &ParamSet::new().with("id", "1").with("v", "3")).await;
    assert_eq!(payload_json(&sc), json!({"rows_affected": 1}));

    let sc = svc.run("GET", "crm", "items", &ParamSet::new()).await;
    assert_eq!(payload_json(&sc), json!([{"id": 1, "v": 3}, {"id": 2, "v": 7}]));

    let sc = svc.run("DELETE", "crm", "items", &ParamSet::new().with("ids", "1,2")).await;
    assert_eq!(payload_json(&sc), json!({"rows_affected": 2}));
    assert_eq!(common::value_of(&pool, 1).await, None);
}

#[tokio::test]
async fn stored_parameter_binds_in_text_order() {
    let pool = common::pool().await;
    let dir = common::templates();
    common::write_template(
        dir.path(),
        "crm",
        "stored.update.sql",
        "{% set w = param('id') %}UPDATE t SET v = {{ v|int }} WHERE id = {{ w }}",
    );
    common::write_template(
        dir.path(),
        "crm",
        "stored.delete.sql",
        "{% set w = param('id') %}DELETE FROM t WHERE id = {{ w }} AND id = {{ w }}",
    );
    let svc = common::service(dir.path(), pool.clone());
    let params = ParamSet::new().with("id", "1").with("v", "5");

    let sc = svc.run("PATCH", "crm", "stored", &params).await;
    assert!(sc.error().is_none(), "{:?}", sc.error());
    assert_eq!(payload_json(&sc), json!({"rows_affected": 1}));
    assert_eq!(common::value_of(&pool, 1).await, Some(5));

    let sc = svc.run("DELETE", "crm", "stored", &params).await;
    assert!(sc.error().is_none(), "{:?}", sc.error());
    assert_eq!(payload_json(&sc), json!({"rows_affected": 1}));
    assert_eq!(common::value_of(&pool, 1).await, None);
}

#[tokio::test]
async fn parameter_values_never_reach_sql_text() {
    let pool = common::pool().await;
    let dir = common::templates();
    let svc = common::service(dir.path(), pool);

    let sc = svc.run("GET", "crm", "items", &ParamSet::new().with("id", "1 OR 1=1")).await;
    assert_eq!(payload_json(&sc), json!([]));

    let sc = svc.run("GET", "crm", "items", &ParamSet::new().with("id", "1")).await;
    assert_eq!(payload_json(&sc), json!([{"id": 1, "v": 0}]));
}

#[tokio::test]
async fn pipeline_errors_land_in_the_scanner() {
    let pool = common::pool().await;
    let dir = common::templates();
    let svc = common::service(dir.path(), pool);

    let sc = svc.run("GET", "crm", "missing", &ParamSet::new()).await;
    match sc.error() {
        Some(ScriptError::TemplateNotFound(path)) => {
            assert_eq!(path, &dir.path().join("crm").join("missing.read.sql"));
        }
        other => panic!("unexpected: {:?}", other),
    }

    let sc = svc.run("PATCH", "crm", "items", &ParamSet::new().with("id", "1")).await;
    assert!(matches!(sc.error(), Some(ScriptError::TemplateExec(_))));

    let sc = svc.run("GET", "..", "items", &ParamSet::new()).await;
    assert!(matches!(sc.error(), Some(ScriptError::InvalidResourceName(_))));
}
