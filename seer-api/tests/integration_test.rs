use std::sync::Arc;

use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use seer_api::{app, AppState};
use seer_core::reporting::{RecordingReporter, ReportingBridge, Surface};
use seer_core::upstream::StaticUpstream;
use seer_shared::models::{LineItem, Order, OrderPayload};
use seer_shared::Masked;
use seer_store::{Config, InMemoryEventCache};

struct Harness {
    app: Router,
    browser: RecordingReporter,
    server: RecordingReporter,
}

fn harness_with(config: Config, upstream: StaticUpstream) -> Harness {
    harness_from(config, upstream, |state| state)
}

fn harness_from(
    config: Config,
    upstream: StaticUpstream,
    customize: impl FnOnce(AppState) -> AppState,
) -> Harness {
    let browser = RecordingReporter::new(Surface::Browser);
    let server = RecordingReporter::new(Surface::Server);
    let edge = RecordingReporter::new(Surface::Edge);
    let reporters = ReportingBridge::new(
        Arc::new(browser.clone()),
        Arc::new(server.clone()),
        Arc::new(edge),
    );
    let state = AppState::new(
        config,
        reporters,
        Arc::new(upstream),
        Arc::new(InMemoryEventCache::new()),
    );

    Harness {
        app: app(customize(state)),
        browser,
        server,
    }
}

fn harness() -> Harness {
    harness_with(Config::default(), StaticUpstream::responding(503, "Service Unavailable"))
}

async fn send(app: &Router, method: Method, uri: &str, body: Body) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn post_order(app: &Router, payload: &str) -> (StatusCode, String) {
    send(app, Method::POST, "/api/cross-boundary", Body::from(payload.to_string())).await
}

async fn get_page(app: &Router, uri: &str) -> (StatusCode, String) {
    send(app, Method::GET, uri, Body::empty()).await
}

fn json_body(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

#[tokio::test]
async fn test_empty_items_rejected() {
    let h = harness();

    let (status, body) = post_order(&h.app, r#"{"order":{"items":[],"shippingCountry":"AQ"}}"#).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json_body(&body),
        json!({ "detail": "Order payload missing line items", "type": "OrderValidationError" })
    );

    let captures = h.server.captures();
    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0].ctx.tags["scenario"], "cross-boundary");
    assert_eq!(captures[0].ctx.tags["http.method"], "POST");
    assert!(h.browser.is_empty());
}

#[tokio::test]
async fn test_valid_order_accepted() {
    let h = harness();

    let (status, body) = post_order(
        &h.app,
        r#"{"order":{"items":[{"id":"001","name":"Product A","quantity":1,"price":29.99}],"shippingCountry":"US"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({ "status": "ok" }));
    assert!(h.server.is_empty());
}

#[tokio::test]
async fn test_antarctica_rejected() {
    let h = harness();

    let (status, body) = post_order(
        &h.app,
        r#"{"order":{"items":[{"id":"001"}],"shippingCountry":"AQ"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(&body)["detail"], "Shipping not supported for Antarctica");
}

#[tokio::test]
async fn test_malformed_json_is_client_error() {
    let h = harness();

    let (status, body) = post_order(&h.app, r#"{"order": {"items": ["#).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(&body)["type"], "OrderValidationError");
    assert_eq!(h.server.len(), 1);
}

#[tokio::test]
async fn test_non_post_uses_placeholder_order() {
    let h = harness();

    let (status, body) = get_page(&h.app, "/api/cross-boundary").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(&body)["detail"], "Order payload missing line items");
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let h = harness();
    let padding = "x".repeat(2048);

    let (status, _) = post_order(&h.app, &format!(r#"{{"order":null,"pad":"{}"}}"#, padding)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_third_party_failure_is_bad_gateway() {
    let h = harness();

    let (status, body) = get_page(&h.app, "/api/third-party-failure").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        json_body(&body),
        json!({ "detail": "External API returned a non-success status", "type": "IntegrationError" })
    );

    let captures = h.server.captures();
    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0].ctx.tags["scenario"], "integration-failure");
    assert_eq!(
        captures[0].ctx.contexts["integration"]["endpoint"],
        "https://httpstat.us/503"
    );
}

#[tokio::test]
async fn test_third_party_unreachable_is_bad_gateway() {
    let h = harness_with(Config::default(), StaticUpstream::unreachable("dns failure"));

    let (status, body) = get_page(&h.app, "/api/third-party-failure").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json_body(&body)["detail"], "Third-party request failed unexpectedly");
}

#[tokio::test]
async fn test_third_party_success_is_unexpected() {
    let h = harness_with(Config::default(), StaticUpstream::responding(200, "{}"));

    let (status, body) = get_page(&h.app, "/api/third-party-failure").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({ "status": "unexpected-success" }));
    assert!(h.server.is_empty());
}

#[tokio::test]
async fn test_health_and_index() {
    let h = harness();

    let (status, body) = get_page(&h.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({ "status": "ok" }));

    let (status, page) = get_page(&h.app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("/scenarios/integration-failure"));
}

#[tokio::test]
async fn test_unknown_routes_are_not_found() {
    let h = harness();

    assert_eq!(get_page(&h.app, "/scenarios/edge-easy").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get_page(&h.app, "/nope").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_client_easy_page_captures_on_browser() {
    let h = harness();

    let (status, page) = get_page(&h.app, "/scenarios/client-easy").await;

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("ProfileNormalizationError"));
    let captures = h.browser.captures();
    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0].ctx.tags["scenario"], "client-easy");
    assert_eq!(captures[0].ctx.tags["surface"], "browser");
}

#[tokio::test]
async fn test_client_complex_page_captures_missing_metrics() {
    let h = harness();

    let (status, _) = get_page(&h.app, "/scenarios/client-complex").await;

    assert_eq!(status, StatusCode::OK);
    let captures = h.browser.captures();
    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0].message, "Analytics event has no metrics to summarize");
    assert_eq!(captures[0].ctx.tags["error.type"], "AnalyticsConsistencyError");
}

#[tokio::test]
async fn test_server_simple_without_token_is_500() {
    let h = harness();

    let (status, _) = get_page(&h.app, "/scenarios/server-simple").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let captures = h.server.captures();
    assert_eq!(captures.len(), 1);
    assert_eq!(
        captures[0].message,
        "Server configuration missing FEATURE_FLAG_SYNC_TOKEN. Sync job cannot proceed."
    );
    assert_eq!(captures[0].ctx.tags["error.type"], "ConfigurationError");
}

#[tokio::test]
async fn test_server_simple_with_token_renders_masked() {
    let mut config = Config::default();
    config.scenarios.feature_flag_sync_token = Some(Masked::new("sync-secret".to_string()));
    let h = harness_with(config, StaticUpstream::responding(503, ""));

    let (status, page) = get_page(&h.app, "/scenarios/server-simple").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!page.contains("sync-secret"));
    assert!(h.server.is_empty());
}

#[tokio::test]
async fn test_server_complex_default_snapshot_is_500() {
    let h = harness();

    let (status, _) = get_page(&h.app, "/scenarios/server-complex").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let captures = h.server.captures();
    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0].message, "Snapshot missing items array");
    assert_eq!(captures[0].ctx.contexts["failure"]["snapshot"]["warehouse"], "phx");
}

#[tokio::test]
async fn test_server_complex_valid_snapshot_lists_availability() {
    let mut config = Config::default();
    config.scenarios.warehouse_snapshot =
        r#"{"items":[{"skus":[{"sku":"A-1","available":3}]}]}"#.to_string();
    let h = harness_with(config, StaticUpstream::responding(503, ""));

    let (status, page) = get_page(&h.app, "/scenarios/server-complex").await;

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("A-1: 3"));
}

#[tokio::test]
async fn test_cross_boundary_page_submits_valid_order() {
    let h = harness();

    let (status, page) = get_page(&h.app, "/scenarios/cross-boundary").await;

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Order submitted"));
    assert!(h.browser.is_empty());
    assert!(h.server.is_empty());
}

#[tokio::test]
async fn test_cross_boundary_page_reports_rejected_order_on_browser() {
    let h = harness_from(
        Config::default(),
        StaticUpstream::responding(503, "Service Unavailable"),
        |state| {
            state.with_checkout_order(OrderPayload {
                order: Some(Order::new(vec![LineItem::new("001", "Product A", 1, 29.99)], "AQ")),
            })
        },
    );

    let (status, page) = get_page(&h.app, "/scenarios/cross-boundary").await;

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Checkout client failed to submit order"));

    let browser = h.browser.captures();
    assert_eq!(browser.len(), 1);
    assert_eq!(browser[0].message, "Checkout client failed to submit order");
    assert_eq!(browser[0].ctx.tags["scenario"], "cross-boundary");
    assert_eq!(
        browser[0].ctx.extra["serverDetail"],
        "Shipping not supported for Antarctica"
    );
    assert_eq!(browser[0].ctx.extra["serverType"], "OrderValidationError");

    let server = h.server.captures();
    assert_eq!(server.len(), 1);
    assert_eq!(server[0].message, "Shipping not supported for Antarctica");
}

#[tokio::test]
async fn test_cross_boundary_page_reports_empty_order_on_browser() {
    let h = harness_from(
        Config::default(),
        StaticUpstream::responding(503, "Service Unavailable"),
        |state| state.with_checkout_order(OrderPayload::default()),
    );

    let (status, _) = get_page(&h.app, "/scenarios/cross-boundary").await;

    assert_eq!(status, StatusCode::OK);
    let browser = h.browser.captures();
    assert_eq!(browser.len(), 1);
    assert_eq!(browser[0].ctx.extra["serverDetail"], "Order payload missing line items");
    assert_eq!(h.server.captures().len(), 1);
}

#[tokio::test]
async fn test_integration_page_captures_on_both_surfaces() {
    let h = harness();

    let (status, _) = get_page(&h.app, "/scenarios/integration-failure").await;

    assert_eq!(status, StatusCode::OK);

    let server = h.server.captures();
    assert_eq!(server.len(), 1);
    assert_eq!(server[0].ctx.tags["error.type"], "IntegrationError");

    let browser = h.browser.captures();
    assert_eq!(browser.len(), 1);
    assert_eq!(browser[0].message, "Marketing integration failed to sync audience");
    assert_eq!(browser[0].ctx.extra["type"], "IntegrationError");
    assert_eq!(browser[0].ctx.tags["scenario"], "integration-failure");
}
