//! End-to-end tests of the cart fragment routes and the JSON API.

use axum::http::StatusCode;
use bolt_integration_tests::{TestApp, checkout_fixture};
use bolt_storefront::commerce::memory::{Fixture, Operation, order_with_lines};
use bolt_storefront::middleware::REQUEST_ID_HEADER;
use serde_json::json;

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_adjust_returns_refreshed_panel() {
    let app = TestApp::new(checkout_fixture());
    app.get("/checkout").await;

    let fragment = app
        .post_form("/cart/adjust", "line_id=line-1&quantity=3")
        .await;

    assert_eq!(fragment.status, StatusCode::OK);
    assert!(fragment.body.contains(r#"id="order-panel""#));
    assert!(fragment.body.contains("299.25 Ft"));
    assert!(!fragment.body.contains("<html"));
}

#[tokio::test]
async fn test_remove_last_line_empties_panel() {
    let app = TestApp::new(checkout_fixture());
    app.get("/checkout").await;

    let fragment = app.post_form("/cart/remove", "line_id=line-1").await;

    assert_eq!(fragment.status, StatusCode::OK);
    assert!(fragment.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_rejected_adjust_is_shown_inline() {
    let app = TestApp::new(checkout_fixture());
    app.get("/checkout").await;
    app.backend
        .reject_next_mutation("INSUFFICIENT_STOCK_ERROR", "Only 1 left in stock");

    let fragment = app
        .post_form("/cart/adjust", "line_id=line-1&quantity=5")
        .await;

    assert_eq!(fragment.status, StatusCode::OK);
    assert!(fragment.body.contains("Only 1 left in stock"));
    assert!(fragment.body.contains("199.50 Ft"));
}

#[tokio::test]
async fn test_adjust_without_backend_session_is_401() {
    let app = TestApp::new(checkout_fixture());

    let response = app
        .post_form("/cart/adjust", "line_id=line-1&quantity=3")
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.backend.calls(Operation::AdjustOrderLine), 0);
}

#[tokio::test]
async fn test_adjust_rejects_absurd_quantity() {
    let app = TestApp::new(checkout_fixture());
    app.get("/checkout").await;

    let response = app
        .post_form("/cart/adjust", "line_id=line-1&quantity=1000")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// API
// =============================================================================

#[tokio::test]
async fn test_active_order_is_null_without_backend_session() {
    let app = TestApp::new(Fixture::default());

    let response = app.get("/api/active-order").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "null");
    assert_eq!(app.backend.calls(Operation::ActiveOrder), 0);
}

#[tokio::test]
async fn test_active_order_is_fetched_on_every_request() {
    let app = TestApp::new(checkout_fixture());
    app.get("/checkout").await;
    app.backend.set_order(Some(order_with_lines(&[(3, 9975)])));

    let response = app.get("/api/active-order").await;
    let order: serde_json::Value = serde_json::from_str(&response.body).unwrap();

    assert_eq!(order["totalWithTax"], 29925);
    assert_eq!(order["lines"][0]["quantity"], 3);
    assert_eq!(app.backend.calls(Operation::ActiveOrder), 2);
}

#[tokio::test]
async fn test_scroll_offset_is_restored_on_next_render() {
    let app = TestApp::new(checkout_fixture());

    let saved = app
        .post_json("/api/scroll", &json!({ "path": "/checkout", "offset": 120 }))
        .await;
    assert_eq!(saved.status, StatusCode::NO_CONTENT);

    let page = app.get("/checkout").await;
    assert!(page.body.contains(r#"data-restore-offset="120""#));
}

#[tokio::test]
async fn test_scroll_rejects_relative_path() {
    let app = TestApp::new(checkout_fixture());

    let response = app
        .post_json("/api/scroll", &json!({ "path": "checkout", "offset": 1 }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_and_request_id() {
    let app = TestApp::new(Fixture::default());

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
    assert!(response.headers.contains_key(REQUEST_ID_HEADER));
}
