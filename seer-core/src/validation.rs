use seer_shared::models::{Order, OrderPayload};
use serde_json::{json, Value};

use crate::error::{ClassifiedError, ErrorClass, FailureKind, ValidationReason};

/// The one shipping destination orders are refused for (Antarctica).
pub const UNSUPPORTED_REGION: &str = "AQ";

/// Order assumed when a request carries none: no items, shipped to Antarctica.
pub fn placeholder_order() -> Order {
    Order::new(Vec::new(), UNSUPPORTED_REGION)
}

fn order_error(kind: FailureKind, message: &str) -> ClassifiedError {
    ClassifiedError::new(ErrorClass::OrderValidation, kind, message)
}

/// Decode a raw request body. An absent or blank body, or a JSON `null`,
/// decodes to `None`. Only text that is not JSON at all is a decode failure;
/// any well-formed document is read leniently.
pub fn decode_order_payload(raw: Option<&[u8]>) -> Result<Option<OrderPayload>, ClassifiedError> {
    let Some(raw) = raw.filter(|bytes| !bytes.iter().all(u8::is_ascii_whitespace)) else {
        return Ok(None);
    };

    let doc = serde_json::from_slice::<Value>(raw).map_err(|e| {
        let text = String::from_utf8_lossy(raw);
        order_error(FailureKind::decode(&text), "Request body is not valid JSON")
            .with_context(json!({ "reason": e.to_string() }))
            .with_cause(e)
    })?;

    if doc.is_null() {
        return Ok(None);
    }
    Ok(Some(OrderPayload::from_json(&doc)))
}

/// Items-presence first, then region. The first violated rule wins.
pub fn validate_order(order: &Order) -> Result<(), ClassifiedError> {
    if order.line_items().is_empty() {
        return Err(order_error(
            FailureKind::Validation(ValidationReason::MissingItems),
            "Order payload missing line items",
        )
        .with_context(json!({ "order": order })));
    }

    if order.shipping_country() == Some(UNSUPPORTED_REGION) {
        return Err(order_error(
            FailureKind::Validation(ValidationReason::UnsupportedRegion {
                country: UNSUPPORTED_REGION.to_string(),
            }),
            "Shipping not supported for Antarctica",
        )
        .with_context(json!({ "order": order })));
    }

    Ok(())
}

/// Full accept/reject decision for a checkout request body, checked in the
/// order parse -> items-presence -> region. Pure: the same input always
/// yields the same outcome.
pub fn check_order_request(raw: Option<&[u8]>) -> Result<Order, ClassifiedError> {
    let order = decode_order_payload(raw)?
        .and_then(|payload| payload.order)
        .unwrap_or_else(placeholder_order);

    validate_order(&order)?;
    Ok(order)
}
