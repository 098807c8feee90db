use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::env;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tower::ServiceExt;

use flatmate_search::config::Config;
use flatmate_search::database::{init_db, AppState};
use flatmate_search::route::create_app;

// Mutex to ensure tests that modify env vars don't run in parallel
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn setup_test_app() -> (axum::Router, NamedTempFile) {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_db.path().to_str().unwrap();
    let db = init_db(db_path).expect("Failed to initialize test database");
    (create_app(AppState::new(db, Config::default())), temp_db)
}

/// Helper function to parse response body as JSON
async fn response_json(body: Body) -> Value {
    let bytes = body
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();

    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}

fn import_request(authorization: Option<&str>) -> Request<Body> {
    let payload = json!([{ "id": "auth-1", "title": "Guarded Room" }]);
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/listings")
        .header("content-type", "application/json");
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

#[tokio::test]
async fn test_auth_middleware_enabled_valid_token() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    env::set_var("AUTHORIZATION", "secret_token");

    let (app, _temp_db) = setup_test_app();
    let response = app.oneshot(import_request(Some("secret_token"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    env::remove_var("AUTHORIZATION");
}

#[tokio::test]
async fn test_auth_middleware_enabled_invalid_token() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    env::set_var("AUTHORIZATION", "secret_token");

    let (app, _temp_db) = setup_test_app();
    let response = app.oneshot(import_request(Some("wrong_token"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(body["code"], "unauthorized");

    env::remove_var("AUTHORIZATION");
}

#[tokio::test]
async fn test_auth_middleware_enabled_no_token() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    env::set_var("AUTHORIZATION", "secret_token");

    let (app, _temp_db) = setup_test_app();
    let response = app.oneshot(import_request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["message"], "Invalid or missing authorization header");

    env::remove_var("AUTHORIZATION");
}

#[tokio::test]
async fn test_auth_does_not_guard_search_or_sessions() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    env::set_var("AUTHORIZATION", "secret_token");

    let (app, _temp_db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/listings?search=room")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/sessions?search=room")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    env::remove_var("AUTHORIZATION");
}

#[tokio::test]
async fn test_auth_middleware_disabled() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    env::remove_var("AUTHORIZATION");

    let (app, _temp_db) = setup_test_app();
    let response = app.oneshot(import_request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}
