use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ClassifiedError, ErrorClass, FailureKind};

pub const EVENT_CACHE_KEY: &str = "analytics:event";

/// Record written the first time the cache is read. `metrics` is null on purpose.
pub const SEED_EVENT: &str = r#"{"metrics":null,"meta":{"source":"checkout-funnel"}}"#;

/// Per-client key/value cache holding raw analytics events.
#[async_trait]
pub trait EventCache: Send + Sync {
    /// Return the cached value for `key`, storing `seed` first if nothing is cached.
    async fn get_or_seed(&self, key: &str, seed: &str) -> String;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(default)]
    pub name: Option<String>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    #[serde(default)]
    pub metrics: Option<Vec<Metric>>,
    #[serde(default)]
    pub meta: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub totals: f64,
    /// `None` when there are no metrics to average.
    pub average: Option<f64>,
}

fn consistency_error(kind: FailureKind, message: &str) -> ClassifiedError {
    ClassifiedError::new(ErrorClass::AnalyticsConsistency, kind, message)
}

pub async fn load_raw_event(cache: &dyn EventCache) -> String {
    cache.get_or_seed(EVENT_CACHE_KEY, SEED_EVENT).await
}

pub fn decode_event(raw: &str) -> Result<Value, ClassifiedError> {
    serde_json::from_str(raw).map_err(|e| {
        consistency_error(FailureKind::decode(raw), "Unable to decode analytics payload")
            .with_context(json!({ "raw": raw, "reason": e.to_string() }))
            .with_cause(e)
    })
}

pub fn hydrate_event(event: Value) -> Result<AnalyticsEvent, ClassifiedError> {
    if !event.is_object() {
        return Err(consistency_error(
            FailureKind::NullAccess {
                path: "event".to_string(),
            },
            "Event payload missing after hydration",
        )
        .with_context(json!({ "event": event })));
    }

    serde_json::from_value(event.clone()).map_err(|e| {
        consistency_error(FailureKind::decode(&event.to_string()), "Unable to decode analytics payload")
            .with_context(json!({ "event": event, "reason": e.to_string() }))
            .with_cause(e)
    })
}

pub fn build_dashboard_summary(event: &AnalyticsEvent) -> Result<DashboardSummary, ClassifiedError> {
    let metrics = event.metrics.as_ref().ok_or_else(|| {
        consistency_error(
            FailureKind::NullAccess {
                path: "event.metrics".to_string(),
            },
            "Analytics event has no metrics to summarize",
        )
        .with_context(json!({ "meta": event.meta }))
    })?;

    let totals: f64 = metrics.iter().map(|metric| metric.value).sum();
    let average = if metrics.is_empty() {
        None
    } else {
        Some(totals / metrics.len() as f64)
    };

    Ok(DashboardSummary { totals, average })
}

/// Load, decode, hydrate and summarize the cached analytics event.
pub async fn run(cache: &dyn EventCache) -> Result<DashboardSummary, ClassifiedError> {
    let raw = load_raw_event(cache).await;
    let event = decode_event(&raw)?;
    let hydrated = hydrate_event(event)?;
    build_dashboard_summary(&hydrated)
}
