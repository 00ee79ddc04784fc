//! HTTP tests for the notes API, driven in-process with `oneshot` over an
//! in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use jhonote_api::{router, ApiConfig, AppState};
use jhonote_core::{MemoryNoteStore, NoteRepository};
use serde_json::{json, Value};
use tower::util::ServiceExt;

const OWNER: &str = "api-user";

fn app_with_store() -> (Router, Arc<MemoryNoteStore>) {
    let store = Arc::new(MemoryNoteStore::new());
    let config = ApiConfig::default();
    let state = AppState::new(NoteRepository::new(store.clone()), config.owner_header.clone());
    (router(state, &config), store)
}

fn app() -> Router {
    app_with_store().0
}

async fn send(app: &Router, method: Method, uri: &str, owner: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(owner) = owner {
        builder = builder.header("x-owner-id", owner);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, value) = send(app, Method::POST, "/api/notes", Some(OWNER), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    value["note"].clone()
}

#[tokio::test]
async fn test_health_needs_no_owner() {
    let (status, body) = send(&app(), Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["name"], "jhonote-api");
}

#[tokio::test]
async fn test_missing_owner_is_unauthorized() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/notes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, Method::GET, "/api/notes", Some("   "), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_applies_defaults() {
    let app = app();
    let note = create(&app, json!({"content": "Buy milk"})).await;
    assert!(note["title"].is_null());
    assert_eq!(note["completed"], false);
    assert_eq!(note["priority"], "media");
    assert!(note["deleted_at"].is_null());
    assert_eq!(note["owner_id"], OWNER);
}

#[tokio::test]
async fn test_create_blank_content_is_bad_request() {
    let (app, store) = app_with_store();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/notes",
        Some(OWNER),
        Some(json!({"content": "  \n"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("content"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_list_orders_pinned_first_and_filters() {
    let app = app();
    let pinned = create(&app, json!({"content": "old pinned", "pinned": true})).await;
    let fav = create(&app, json!({"content": "fresh", "is_favorite": true, "tags": ["#Casa"]})).await;

    let (status, body) = send(&app, Method::GET, "/api/notes", Some(OWNER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["notes"][0]["id"], pinned["id"]);

    let (_, body) = send(&app, Method::GET, "/api/notes?filter=favorites&tag=casa", Some(OWNER), None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["notes"][0]["id"], fav["id"]);

    let (_, body) = send(&app, Method::GET, "/api/notes?search=FRESH", Some(OWNER), None).await;
    assert_eq!(body["total"], 1);

    let (status, _) = send(&app, Method::GET, "/api/notes?priority=urgente", Some(OWNER), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let (app, store) = app_with_store();
    let uri = format!("/api/notes/{}", uuid::Uuid::now_v7());
    let (status, _) = send(&app, Method::PUT, &uri, Some(OWNER), Some(json!({"content": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_update_replaces_fields() {
    let app = app();
    let note = create(&app, json!({"content": "draft", "title": "Plan"})).await;
    let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(OWNER),
        Some(json!({"content": "final", "tags": ["Clase", "clase"], "priority": "alta"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["note"]["content"], "final");
    assert!(body["note"]["title"].is_null());
    assert_eq!(body["note"]["tags"], json!(["clase"]));
    assert_eq!(body["note"]["priority"], "alta");
}

#[tokio::test]
async fn test_patch_flags() {
    let app = app();
    let note = create(&app, json!({"content": "x"})).await;
    let id = note["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/notes/{id}/completed"),
        Some(OWNER),
        Some(json!({"value": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["note"]["completed"], true);

    let (_, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/notes/{id}/favorite"),
        Some(OWNER),
        Some(json!({"value": true})),
    )
    .await;
    assert_eq!(body["note"]["is_favorite"], true);
    assert_eq!(body["note"]["completed"], true);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/notes/{id}/archived"),
        Some(OWNER),
        Some(json!({"value": true})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_foreign_note_looks_missing() {
    let app = app();
    let note = create(&app, json!({"content": "private"})).await;
    let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::GET, &uri, Some("intruder"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &uri, Some("intruder"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, &uri, Some(OWNER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["note"]["deleted_at"].is_null());
}

#[tokio::test]
async fn test_store_outage_is_service_unavailable() {
    let (app, store) = app_with_store();
    store.set_unavailable(true);
    let (status, body) = send(&app, Method::GET, "/api/notes", Some(OWNER), None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_delete_all_for_owner() {
    let app = app();
    create(&app, json!({"content": "a"})).await;
    create(&app, json!({"content": "b"})).await;

    let (status, body) = send(&app, Method::DELETE, "/api/notes", Some(OWNER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["succeeded"], 2);

    let (_, body) = send(&app, Method::GET, "/api/notes", Some(OWNER), None).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (status, body) = send(&app(), Method::GET, "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/notes"].is_object());
}
