//! End-to-end tests for the demo router with the request logger installed.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use request_logger::test_util::CapturedLogs;
use request_logger_demo::{app_with_logger, request_id::REQUEST_ID_HEADER, Config};
use tower::ServiceExt;
use tracing::Level;

fn test_app(captured: &CapturedLogs) -> Router {
    let mut config = Config::default();
    config.request_log.skip_paths = vec!["/health".to_string()];
    app_with_logger(&config, captured.logger())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_is_not_logged() {
    let captured = CapturedLogs::new();
    let app = test_app(&captured);

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(captured.records().is_empty());
}

#[tokio::test]
async fn test_found_item_logged_at_debug() {
    let captured = CapturedLogs::new();
    let app = test_app(&captured);

    let response = app.oneshot(get("/items/2")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));

    let records = captured.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::DEBUG);
    assert_eq!(records[0].field("path"), Some("/items/2"));
    assert_eq!(records[0].message, "[request-logger]200 GET  OK");
}

#[tokio::test]
async fn test_missing_item_logged_at_warn() {
    let captured = CapturedLogs::new();
    let app = test_app(&captured);

    let response = app.oneshot(get("/items/99")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let records = captured.records();
    assert_eq!(records[0].level, Level::WARN);
    assert_eq!(records[0].message, "[request-logger]404 GET Not Found");
}

#[tokio::test]
async fn test_invalid_query_keeps_query_in_path() {
    let captured = CapturedLogs::new();
    let app = test_app(&captured);

    let response = app.oneshot(get("/items?limit=0")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let records = captured.records();
    assert_eq!(records[0].level, Level::WARN);
    assert_eq!(records[0].field("path"), Some("/items?limit=0"));
}

#[tokio::test]
async fn test_internal_error_logged_at_error_without_leaking() {
    let captured = CapturedLogs::new();
    let app = test_app(&captured);

    let response = app.oneshot(get("/fail")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(!body.contains("inventory backend"));

    let records = captured.records();
    assert_eq!(records[0].level, Level::ERROR);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let captured = CapturedLogs::new();
    let app = test_app(&captured);

    let request = Request::builder()
        .uri("/items")
        .header(REQUEST_ID_HEADER, "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "req-123"
    );
}

#[tokio::test]
async fn test_cors_preflight_is_logged() {
    let captured = CapturedLogs::new();
    let app = test_app(&captured);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/items")
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

    let records = captured.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::DEBUG);
    assert_eq!(records[0].message, "[request-logger]200 OPTIONS  OK");
    assert_eq!(records[0].field("path"), Some("/items"));
}
