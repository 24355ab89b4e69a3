//! Integration tests for the storefront page, health check and headers.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use blockshop_core::Catalog;
use blockshop_integration_tests::TestClient;

#[tokio::test]
async fn test_health() {
    let mut client = TestClient::new();

    let resp = client.get("/health", false).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");
}

#[tokio::test]
async fn test_home_lists_catalog() {
    let mut client = TestClient::new();

    let resp = client.get("/", false).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(
        resp.header("content-type")
            .is_some_and(|ct| ct.starts_with("text/html"))
    );
    for item in Catalog::builtin().items() {
        assert!(resp.body.contains(&item.name), "missing {}", item.name);
    }
    assert!(resp.body.contains("Your cart is empty"));
    assert!(resp.body.contains(r#"id="toasts""#));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let mut client = TestClient::new();

    let resp = client.get("/products/elytra", false).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers() {
    let mut client = TestClient::new();

    let resp = client.get("/", false).await;
    assert_eq!(resp.header("x-frame-options"), Some("DENY"));
    assert_eq!(resp.header("x-content-type-options"), Some("nosniff"));
    assert!(
        resp.header("content-security-policy")
            .is_some_and(|csp| csp.contains("https://unpkg.com"))
    );
}

#[tokio::test]
async fn test_request_id_generated_and_echoed() {
    let mut client = TestClient::new();

    let resp = client.get("/health", false).await;
    let generated = resp.header("x-request-id").unwrap();
    assert_eq!(generated.len(), 36);

    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "upstream-123")
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = client.send_raw(request).await;
    assert_eq!(resp.header("x-request-id"), Some("upstream-123"));
}
