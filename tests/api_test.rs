//! Integration tests for API endpoints.
//!
//! Each test builds the full application over a fresh in-memory SQLite
//! database and drives it with `tower::ServiceExt::oneshot`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use api_skeleton::config::Config;
use api_skeleton::infra::seed::ensure_default_admin;
use api_skeleton::infra::{Database, Persistence};
use api_skeleton::{create_app, AppState};

// =============================================================================
// Helpers
// =============================================================================

fn test_config() -> Config {
    let vars = HashMap::from([
        ("JWT_SECRET", "test-secret-key-for-testing-only-32chars"),
        ("DATABASE_URL", "sqlite::memory:"),
        ("DATABASE_MAX_CONNECTIONS", "1"),
    ]);
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap()
}

async fn test_app() -> Router {
    let config = test_config();
    let database = Database::connect(&config).await.unwrap();

    let uow = Persistence::new(database.get_connection());
    ensure_default_admin(&uow, &config).await.unwrap();

    create_app(AppState::from_config(Arc::new(database), config))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}

async fn register(app: &Router, username: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": username, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body
}

async fn create_product(app: &Router, token: &str, name: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/products",
        Some(token),
        Some(json!({
            "name": name,
            "description": "test product",
            "price_cents": 1990,
            "stock": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body
}

fn assert_envelope(body: &Value, status: StatusCode) {
    assert_eq!(body["code"], status.as_u16());
    assert!(body["message"].is_string());
    assert!(body["data"].is_null());
}

// =============================================================================
// Index, health and framework errors
// =============================================================================

#[tokio::test]
async fn test_index_returns_welcome() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "welcome to api skeleton");
}

#[tokio::test]
async fn test_health_reports_database_up() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_hides_database_error_details() {
    let config = test_config();
    let database = Database::connect(&config).await.unwrap();
    let connection = database.get_connection();
    let app = create_app(AppState::from_config(Arc::new(database), config));

    connection.close().await.unwrap();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "status": "degraded", "database": "unhealthy" }));
}

#[tokio::test]
async fn test_unknown_route_is_enveloped_404() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/does-not-exist", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&body, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
}

#[tokio::test]
async fn test_wrong_method_is_enveloped_405() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::DELETE, "/", None, None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_envelope(&body, StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/user/me", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_envelope(&body, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authenticated");
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/user/me", Some("not-a-jwt"), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Could not validate credentials");
}

#[tokio::test]
async fn test_login_validation_failure_is_422() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "ab", "password": "123456" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);
}

#[tokio::test]
async fn test_login_wrong_password_is_401() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "wrong-password" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_envelope(&body, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_seeded_admin_can_login_and_read_profile() {
    let app = test_app().await;
    let token = login(&app, "admin", "123456").await;

    let (status, body) = send(&app, Method::GET, "/api/user/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "admin");
    assert_eq!(body["email"], "admin@example.com");
    assert_eq!(body["state"], "enabled");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_then_update_profile() {
    let app = test_app().await;
    let user = register(&app, "alice").await;
    assert_eq!(user["nickname"], "alice");

    let token = login(&app, "alice", "secret123").await;
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/user/me",
        Some(&token),
        Some(json!({ "nickname": "Alice", "gender": "female" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nickname"], "Alice");
    assert_eq!(body["gender"], "female");
}

#[tokio::test]
async fn test_register_duplicate_username_is_409() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": "admin", "password": "secret123" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_envelope(&body, StatusCode::CONFLICT);
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_product_crud_and_soft_delete() {
    let app = test_app().await;
    let token = login(&app, "admin", "123456").await;

    let created = create_product(&app, &token, "Keyboard").await;
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/products/{}", id);

    let (status, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Keyboard");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "stock": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock"], 9);
    assert_eq!(body["name"], "Keyboard");

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted");

    let (status, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&body, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/api/products", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);
}

#[tokio::test]
async fn test_product_update_refreshes_updated_at() {
    let app = test_app().await;
    let token = login(&app, "admin", "123456").await;

    let created = create_product(&app, &token, "Mouse").await;
    let uri = format!("/api/products/{}", created["id"].as_str().unwrap());

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "price_cents": 2500 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let parse = |v: &Value| {
        chrono::DateTime::parse_from_rfc3339(v.as_str().unwrap()).unwrap()
    };
    assert_eq!(parse(&updated["created_at"]), parse(&created["created_at"]));
    assert!(parse(&updated["updated_at"]) > parse(&created["updated_at"]));
}

#[tokio::test]
async fn test_non_owner_cannot_modify_product() {
    let app = test_app().await;
    let admin_token = login(&app, "admin", "123456").await;
    let product = create_product(&app, &admin_token, "Monitor").await;
    let uri = format!("/api/products/{}", product["id"].as_str().unwrap());

    register(&app, "mallory").await;
    let other_token = login(&app, "mallory", "secret123").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&other_token),
        Some(json!({ "name": "Stolen" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You do not own this product");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // still readable by anyone authenticated
    let (status, body) = send(&app, Method::GET, &uri, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Monitor");
}

#[tokio::test]
async fn test_product_listing_paginates() {
    let app = test_app().await;
    let token = login(&app, "admin", "123456").await;
    for name in ["A", "B", "C"] {
        create_product(&app, &token, name).await;
    }

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/products?page=2&per_page=2",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["page"], 2);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["total_pages"], 2);
}

#[tokio::test]
async fn test_invalid_product_is_422() {
    let app = test_app().await;
    let token = login(&app, "admin", "123456").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(&token),
        Some(json!({ "name": "", "description": "", "price_cents": -1, "stock": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);
}
