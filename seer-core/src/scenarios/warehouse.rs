use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::error::{ClassifiedError, ErrorClass, FailureKind, ValidationReason};

/// Snapshot used when none is configured. It has no `items`, so loading it fails.
pub const DEFAULT_SNAPSHOT: &str = r#"{"warehouse":"phx"}"#;

/// SKU -> units available.
pub type Availability = BTreeMap<String, f64>;

fn snapshot_error(kind: FailureKind, message: &str, context: Value) -> ClassifiedError {
    ClassifiedError::new(ErrorClass::WarehouseSnapshot, kind, message).with_context(context)
}

fn malformed_entry(field: &str, item: &Value) -> ClassifiedError {
    snapshot_error(
        FailureKind::Validation(ValidationReason::MalformedEntry {
            field: field.to_string(),
        }),
        "SKU entry is malformed",
        json!({ "item": item }),
    )
}

pub fn parse_snapshot(blob: &str) -> Result<Value, ClassifiedError> {
    serde_json::from_str(blob).map_err(|e| {
        snapshot_error(
            FailureKind::decode(blob),
            "Snapshot JSON is malformed",
            json!({ "blob": blob, "reason": e.to_string() }),
        )
        .with_cause(e)
    })
}

/// Flatten `items[].skus[]` into one list of SKU entries.
pub fn normalize_items(snapshot: &Value) -> Result<Vec<Value>, ClassifiedError> {
    let buckets = snapshot
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            snapshot_error(
                FailureKind::Validation(ValidationReason::MissingField {
                    field: "items".to_string(),
                }),
                "Snapshot missing items array",
                json!({ "snapshot": snapshot }),
            )
        })?;

    let mut entries = Vec::new();
    for bucket in buckets {
        let skus = bucket
            .get("skus")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed_entry("skus", bucket))?;
        entries.extend(skus.iter().cloned());
    }
    Ok(entries)
}

/// SKU key for an entry: a non-empty string, or a number in its JSON text.
fn sku_key(item: &Value) -> Option<String> {
    match item.get("sku")? {
        Value::String(sku) if !sku.is_empty() => Some(sku.clone()),
        Value::Number(sku) => Some(sku.to_string()),
        _ => None,
    }
}

/// Build the SKU availability map. Later entries for the same SKU win.
pub fn calculate_sku_availability(items: &[Value]) -> Result<Availability, ClassifiedError> {
    let mut availability = Availability::new();

    for item in items {
        let sku = sku_key(item).ok_or_else(|| malformed_entry("sku", item))?;
        let available = item
            .get("available")
            .and_then(Value::as_f64)
            .ok_or_else(|| malformed_entry("available", item))?;

        availability.insert(sku, available);
    }

    Ok(availability)
}

/// Parse, normalize and tally a raw warehouse snapshot.
pub fn load_availability(blob: &str) -> Result<Availability, ClassifiedError> {
    let snapshot = parse_snapshot(blob)?;
    let items = normalize_items(&snapshot)?;
    calculate_sku_availability(&items)
}
