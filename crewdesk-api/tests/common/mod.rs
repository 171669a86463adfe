#![allow(dead_code)]

/// Common test utilities for integration tests
///
/// Builds the full router over the in-memory store, so every test
/// exercises the real middleware, handlers, and fanout path without a
/// MongoDB instance. Requests go through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crewdesk_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, JwtConfig, StoreConfig},
};
use crewdesk_shared::store::{memory::MemoryStore, Store};

/// Secret shared by the test config and tests that forge tokens
pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context: the router plus a handle on the backing store
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone() as Arc<dyn Store>, test_config());
        Self {
            app: build_router(state),
            store,
        }
    }
}

fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        store: StoreConfig {
            url: "mongodb://unused".to_string(),
            database: "unused".to_string(),
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiration_hours: 24,
        },
    }
}

/// Sends one request and returns (status, parsed JSON body)
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    request(app, "GET", uri, token, None).await
}

pub async fn post(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    request(app, "POST", uri, token, Some(body)).await
}

pub async fn put(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    request(app, "PUT", uri, token, body).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    request(app, "DELETE", uri, token, None).await
}

/// Signs up a user and returns (token, user id)
pub async fn signup(app: &Router, email: &str, full_name: &str, role: &str) -> (String, Uuid) {
    let (status, body) = post(
        app,
        "/api/auth/signup",
        None,
        serde_json::json!({
            "email": email,
            "password": "password123",
            "full_name": full_name,
            "role": role,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");

    let token = body["access_token"].as_str().unwrap().to_string();
    let user_id = body["user"]["id"].as_str().unwrap().parse().unwrap();
    (token, user_id)
}

/// Creates a project as `token` and returns its id
pub async fn create_project(
    app: &Router,
    token: &str,
    title: &str,
    team_members: &[Uuid],
) -> Uuid {
    let members: Vec<String> = team_members.iter().map(Uuid::to_string).collect();
    let (status, body) = post(
        app,
        "/api/projects",
        Some(token),
        serde_json::json!({
            "title": title,
            "description": "test project",
            "team_members": members,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "project create failed: {body}");
    body["id"].as_str().unwrap().parse().unwrap()
}

/// Creates a task as `token` and returns its id
pub async fn create_task(
    app: &Router,
    token: &str,
    project_id: Uuid,
    title: &str,
    assigned_to: Option<Uuid>,
) -> Uuid {
    let mut payload = serde_json::json!({
        "title": title,
        "description": "test task",
        "project_id": project_id.to_string(),
    });
    if let Some(assignee) = assigned_to {
        payload["assigned_to"] = Value::String(assignee.to_string());
    }
    let (status, body) = post(app, "/api/tasks", Some(token), payload).await;
    assert_eq!(status, StatusCode::OK, "task create failed: {body}");
    body["id"].as_str().unwrap().parse().unwrap()
}

/// The caller's notifications, newest first
pub async fn notifications_of(app: &Router, token: &str) -> Vec<Value> {
    let (status, body) = get(app, "/api/notifications", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().clone()
}
