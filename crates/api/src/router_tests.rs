//! Route tests driving the router in-process with `oneshot`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use db::{MemoryStore, StoreOp};
use nodes::{mock, NodeProperties, WorkflowNode};

use crate::{router, AppState};

fn seeded() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::with_seed(builder::catalog::demo_seed().unwrap()));
    let state = AppState::new(store.clone(), store.clone());
    (store, router(state))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn welcome_flow(status: &str) -> Value {
    let nodes = vec![
        WorkflowNode::new("Lead Intake", NodeProperties::for_trigger(mock::lead_created_trigger())),
        WorkflowNode::new("Welcome Email", NodeProperties::for_action(mock::send_email_action())),
    ];
    json!({
        "name": "Welcome Flow",
        "description": "Greets new leads",
        "status": status,
        "category": "Leads",
        "tags": ["onboarding"],
        "created_by": "u1",
        "workflow_nodes": nodes,
    })
}

async fn create(app: &Router, status: &str) -> Value {
    let (code, body) = call(app, Method::POST, "/api/v1/automations", Some(welcome_flow(status))).await;
    assert_eq!(code, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn create_then_list_and_get() {
    let (_, app) = seeded();
    let created = create(&app, "Active").await;
    let id = created["id"].as_str().unwrap();

    let (code, list) = call(&app, Method::GET, "/api/v1/automations", None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (code, fetched) = call(&app, Method::GET, &format!("/api/v1/automations/{id}"), None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(fetched["name"], "Welcome Flow");
    assert_eq!(fetched["workflow_nodes"], created["workflow_nodes"]);
    assert_eq!(fetched["workflow_nodes"][0]["properties"]["event_name"], "lead.created");
}

#[tokio::test]
async fn create_without_trigger_is_unprocessable() {
    let (store, app) = seeded();
    let mut body = welcome_flow("Draft");
    body["workflow_nodes"] = json!([]);

    let (code, error) = call(&app, Method::POST, "/api/v1/automations", Some(body)).await;
    assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], "Please add a trigger to start the workflow");
    assert!(db::AutomationStore::list(store.as_ref()).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_automation_is_not_found() {
    let (_, app) = seeded();
    let uri = format!("/api/v1/automations/{}", uuid::Uuid::new_v4());

    let (code, _) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(code, StatusCode::NOT_FOUND);
    let (code, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(code, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn toggle_and_duplicate() {
    let (_, app) = seeded();
    let created = create(&app, "Active").await;
    let id = created["id"].as_str().unwrap();

    let (code, toggled) =
        call(&app, Method::POST, &format!("/api/v1/automations/{id}/toggle"), None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(toggled["status"], "Paused");

    let (code, copy) =
        call(&app, Method::POST, &format!("/api/v1/automations/{id}/duplicate"), None).await;
    assert_eq!(code, StatusCode::CREATED);
    assert_eq!(copy["name"], "Welcome Flow (Copy)");
    assert_eq!(copy["status"], "Draft");
    assert_eq!(copy["runs_count"], 0);
    assert_eq!(copy["workflow_nodes"], created["workflow_nodes"]);
}

#[tokio::test]
async fn update_and_delete() {
    let (_, app) = seeded();
    let created = create(&app, "Draft").await;
    let uri = format!("/api/v1/automations/{}", created["id"].as_str().unwrap());

    let mut body = welcome_flow("Active");
    body["name"] = json!("Welcome Flow v2");
    let (code, updated) = call(&app, Method::PUT, &uri, Some(body)).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(updated["name"], "Welcome Flow v2");
    assert_eq!(updated["status"], "Active");

    let (code, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(code, StatusCode::NO_CONTENT);
    let (code, _) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(code, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_and_analytics() {
    let (_, app) = seeded();
    create(&app, "Active").await;
    create(&app, "Paused").await;

    let (_, active) = call(&app, Method::GET, "/api/v1/automations?status=Active", None).await;
    assert_eq!(active.as_array().unwrap().len(), 1);

    let (_, none) = call(&app, Method::GET, "/api/v1/automations?search=invoice", None).await;
    assert!(none.as_array().unwrap().is_empty());

    let (code, _) = call(&app, Method::GET, "/api/v1/automations?status=Archived", None).await;
    assert_eq!(code, StatusCode::BAD_REQUEST);

    let (code, stats) = call(&app, Method::GET, "/api/v1/automations/analytics", None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["active"], 1);
    assert_eq!(stats["paused"], 1);
    assert_eq!(stats["success_rate"], 0.0);
}

#[tokio::test]
async fn definitions_are_filtered() {
    let (_, app) = seeded();

    let (code, actions) = call(&app, Method::GET, "/api/v1/definitions/actions?search=MAIL", None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(actions.as_array().unwrap().len(), 1);
    assert_eq!(actions[0]["id"], "act-send-email");

    let (_, triggers) =
        call(&app, Method::GET, "/api/v1/definitions/triggers?category=Sales", None).await;
    assert_eq!(triggers.as_array().unwrap().len(), 1);
    assert_eq!(triggers[0]["event_name"], "course.purchased");
}

#[tokio::test]
async fn registry_failure_yields_empty_catalog() {
    let (store, app) = seeded();
    store.fail_on(StoreOp::ListTriggers);

    let (code, triggers) = call(&app, Method::GET, "/api/v1/definitions/triggers", None).await;
    assert_eq!(code, StatusCode::OK);
    assert!(triggers.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn instantiate_template_creates_draft() {
    let (_, app) = seeded();
    let (code, templates) = call(&app, Method::GET, "/api/v1/templates", None).await;
    assert_eq!(code, StatusCode::OK);
    let template_id = templates[0]["id"].as_str().unwrap();

    let (code, created) = call(
        &app,
        Method::POST,
        &format!("/api/v1/templates/{template_id}/instantiate"),
        Some(json!({ "created_by": "u2" })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED);
    assert_eq!(created["status"], "Draft");
    assert_eq!(created["created_by"], "u2");

    let (_, templates) = call(&app, Method::GET, "/api/v1/templates", None).await;
    assert_eq!(templates[0]["usage_count"], 4);

    let (code, _) = call(
        &app,
        Method::POST,
        &format!("/api/v1/templates/{}/instantiate", uuid::Uuid::new_v4()),
        Some(json!({})),
    )
    .await;
    assert_eq!(code, StatusCode::NOT_FOUND);
}
