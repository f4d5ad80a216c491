use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::Method,
    routing::any,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::info;

use seer_core::reporting::{capture_failure, CaptureContext};
use seer_core::scenarios::checkout::CHECKOUT_PATH;
use seer_core::scenarios::Scenario;
use seer_core::validation::check_order_request;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes(body_limit: usize) -> Router<AppState> {
    Router::new()
        .route(CHECKOUT_PATH, any(submit_order))
        .layer(DefaultBodyLimit::max(body_limit))
}

/// Validate a submitted order. Only a POST body is read; any other method
/// is treated as carrying no order.
async fn submit_order(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let raw = (method == Method::POST).then_some(body.as_ref());

    match check_order_request(raw) {
        Ok(order) => {
            info!(
                items = order.line_items().len(),
                country = order.shipping_country().unwrap_or_default(),
                "Order accepted"
            );
            Ok(Json(json!({ "status": "ok" })))
        }
        Err(error) => {
            capture_failure(
                state.reporters.server(),
                Scenario::CrossBoundary,
                &error,
                CaptureContext::new().tag("http.method", method.as_str()),
            );
            Err(error.into())
        }
    }
}
