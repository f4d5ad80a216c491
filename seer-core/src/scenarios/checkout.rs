use seer_shared::models::{LineItem, Order, OrderPayload, Problem};
use serde_json::json;

use crate::error::{ClassifiedError, ErrorClass, FailureKind};
use crate::reporting::CaptureContext;

pub const CHECKOUT_PATH: &str = "/api/cross-boundary";

/// Detail reported by the server, carried as the cause of a client-side failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ServerProblem(pub String);

/// The order the checkout client submits: one line item shipped to the US.
pub fn sample_order() -> OrderPayload {
    OrderPayload {
        order: Some(Order::new(
            vec![LineItem::new("001", "Product A", 1, 29.99)],
            "US",
        )),
    }
}

/// Failure seen by the browser when the checkout API rejects the order.
pub fn submission_failure(status: u16, body: &str) -> ClassifiedError {
    let problem: Option<Problem> = serde_json::from_str(body).ok();
    let detail = problem
        .as_ref()
        .map(|p| p.detail.clone())
        .unwrap_or_else(|| "Unknown upstream error".to_string());
    let server_type = problem.map(|p| p.type_);

    ClassifiedError::new(
        ErrorClass::CheckoutClient,
        FailureKind::DependencyFailure {
            status: Some(status),
            body: body.to_string(),
        },
        "Checkout client failed to submit order",
    )
    .with_context(json!({ "serverDetail": detail, "serverType": server_type }))
    .with_cause(ServerProblem(detail))
}

/// Extras sent alongside a checkout failure capture.
pub fn capture_extras(error: &ClassifiedError) -> CaptureContext {
    let context = error.context();
    CaptureContext::new()
        .extra("serverDetail", context["serverDetail"].clone())
        .extra("serverType", context["serverType"].clone())
}
