//! Upsert decision layer driven end to end through a recording executor.

use std::sync::Arc;

use bizdir::{
    EntityKind, Fields, KeyType, RecordingExecutor, SqlParam, WriteEngine, WriteError,
};
use serde_json::{json, Value};

fn engine() -> (Arc<RecordingExecutor>, WriteEngine) {
    let exec = Arc::new(RecordingExecutor::new());
    let engine = WriteEngine::new(exec.clone());
    (exec, engine)
}

fn fields(value: Value) -> Fields {
    Fields::from_value(value).expect("test body is an object")
}

#[tokio::test]
async fn branch_create_sends_one_insert_with_json_address() {
    let (exec, engine) = engine();
    let body = fields(json!({
        "company_id": "c1",
        "name": "North",
        "is_hq": true,
        "address": {"street": "Main"},
    }));

    engine.setup_branch(&body).await.unwrap();

    let calls = exec.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].verb(), "INSERT");
    assert_eq!(calls[0].params.len(), 5);
    assert_eq!(
        calls[0].params[4],
        SqlParam::Json(r#"{"street":"Main"}"#.to_string())
    );
}

#[tokio::test]
async fn branch_flag_only_update_matches_on_id_alone() {
    let (exec, engine) = engine();
    let body = fields(json!({"id": "b-10", "is_hq": true}));

    engine.setup_branch(&body).await.unwrap();

    let call = exec.last_call().unwrap();
    assert_eq!(call.verb(), "UPDATE");
    assert!(call.sql.contains("SET is_hq = $1"));
    assert!(call.sql.contains("WHERE id = $2::uuid"));
    assert!(!call.sql.contains("company_id"));
    assert!(!call.sql.contains("address"));
    assert_eq!(call.params, vec![SqlParam::Bool(true), SqlParam::text("b-10")]);
}

#[tokio::test]
async fn branch_without_company_never_reaches_executor() {
    let (exec, engine) = engine();
    let body = fields(json!({
        "name": "North",
        "is_hq": true,
        "address": {"street": "Main"},
    }));

    let err = engine.setup_branch(&body).await.unwrap_err();

    assert!(matches!(err, WriteError::Validation(_)));
    assert!(err.to_string().contains("'company_id'"));
    assert_eq!(exec.call_count(), 0);
}

#[tokio::test]
async fn non_headquarters_branch_is_currently_rejected() {
    let (exec, engine) = engine();
    let body = fields(json!({
        "company_id": "c1",
        "name": "Warehouse",
        "is_hq": false,
        "address": {"street": "Dock 4"},
    }));

    let err = engine.setup_branch(&body).await.unwrap_err();

    assert_eq!(err.http_status(), 400);
    assert_eq!(exec.call_count(), 0);
}

#[tokio::test]
async fn executor_rows_are_returned_unmodified() {
    let row = json!({"id": "b-1", "company_id": "c1", "is_hq": true, "is_visible": false,
                     "address": {"street": "Main"}});
    let exec = Arc::new(RecordingExecutor::new().with_rows(vec![row.as_object().cloned().unwrap()]));
    let engine = WriteEngine::new(exec);

    let rows = engine
        .setup_branch(&fields(json!({
            "company_id": "c1",
            "name": "North",
            "is_hq": true,
            "address": {"street": "Main"},
        })))
        .await
        .unwrap();

    assert_eq!(Value::Array(rows.into_iter().map(Value::Object).collect()), json!([row]));
}

#[tokio::test]
async fn executor_failure_propagates_as_execution_error() {
    let exec = Arc::new(
        RecordingExecutor::new().fail_when_sql_contains("business_sections", "relation does not exist"),
    );
    let engine = WriteEngine::new(exec.clone());

    let err = engine
        .setup_section(&fields(json!({
            "company_id": "c1",
            "page": "home",
            "order_position": 2,
            "component": "hero",
            "component_variant_id": "v1",
            "content": {},
            "metadata": {},
        })))
        .await
        .unwrap_err();

    assert!(matches!(err, WriteError::Execution(_)));
    assert_eq!(err.http_status(), 500);
    assert!(err.to_string().contains("relation does not exist"));
    assert_eq!(exec.call_count(), 1);
}

#[tokio::test]
async fn navigation_update_is_company_scoped() {
    let (exec, engine) = engine();
    engine
        .setup_navigation(&fields(json!({
            "id": "n-1",
            "company_id": "c1",
            "label": "Dashboard",
            "link": "/dashboard",
            "tab": "principal",
            "action": "navigate",
            "order_position": 2,
            "icon": {"type": "svg", "name": "dashboard"},
        })))
        .await
        .unwrap();

    let call = exec.last_call().unwrap();
    assert!(call.sql.starts_with("UPDATE business_navigation_content"));
    assert!(call.sql.contains("company_id = $8::uuid"));
}

#[tokio::test]
async fn company_registration_with_and_without_id() {
    let (exec, engine) = engine();
    let base = json!({
        "fantasy_name": "Acme",
        "legal_info": {"tax_id": "A-1"},
        "url_domain": "acme.example",
    });

    engine.register_company(&fields(base.clone())).await.unwrap();
    let mut with_id = base;
    with_id["id"] = json!("42");
    engine.register_company(&fields(with_id)).await.unwrap();

    let calls = exec.calls();
    assert_eq!(calls[0].params.len(), 3);
    assert_eq!(calls[1].params.len(), 4);
    assert!(calls.iter().all(|c| c.sql.ends_with("RETURNING id")));
}

#[tokio::test]
async fn key_type_controls_identifier_casts() {
    let exec = Arc::new(RecordingExecutor::new());
    let engine = WriteEngine::new(exec.clone()).with_key_type(KeyType::BigInt);

    engine
        .upsert(EntityKind::Branch, &fields(json!({"id": "7", "is_hq": true})))
        .await
        .unwrap();

    assert!(exec.last_call().unwrap().sql.contains("WHERE id = $2::bigint"));
}
