use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ClassifiedError;
use crate::scenarios::Scenario;

/// Runtime environment a reporter is initialized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Browser,
    Server,
    Edge,
}

impl Surface {
    pub const ALL: [Surface; 3] = [Surface::Browser, Surface::Server, Surface::Edge];

    pub const fn as_str(self) -> &'static str {
        match self {
            Surface::Browser => "browser",
            Surface::Server => "server",
            Surface::Edge => "edge",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reporter lifecycle. A reporter is built once and never re-initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Active,
    Disabled,
}

/// Tags, named contexts and extra data attached to one capture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureContext {
    pub tags: BTreeMap<String, String>,
    pub contexts: BTreeMap<String, Map<String, Value>>,
    pub extra: BTreeMap<String, Value>,
}

impl CaptureContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base context for a classified failure raised by `scenario`.
    pub fn for_failure(scenario: Scenario, error: &ClassifiedError) -> Self {
        let mut ctx = Self::new()
            .tag("scenario", scenario.slug())
            .tag("error.type", error.type_name())
            .tag("error.category", error.category());

        if !error.context().is_null() {
            ctx = ctx.context("failure", error.context().clone());
        }
        ctx
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Named context block. Non-object values are wrapped as `{ "value": v }`.
    pub fn context(mut self, name: impl Into<String>, value: Value) -> Self {
        let block = match value {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        self.contexts.insert(name.into(), block);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Forwards captured errors to an external monitoring service.
///
/// `capture` is fire-and-forget: implementations must not panic and must not
/// surface their own delivery failures to the caller.
pub trait ErrorReporter: Send + Sync {
    fn surface(&self) -> Surface;

    fn state(&self) -> BridgeState;

    /// Returns the event id when the capture was accepted for delivery.
    fn capture(&self, error: &(dyn StdError + 'static), ctx: CaptureContext) -> Option<Uuid>;

    /// Drain queued events. Returns `false` if the timeout elapsed first.
    fn flush(&self, _timeout: Duration) -> bool {
        true
    }
}

/// Capture a classified failure with the standard scenario/surface tags.
pub fn capture_failure(
    reporter: &dyn ErrorReporter,
    scenario: Scenario,
    error: &ClassifiedError,
    ctx: CaptureContext,
) -> Option<Uuid> {
    let mut merged = CaptureContext::for_failure(scenario, error).tag("surface", reporter.surface().as_str());
    merged.tags.extend(ctx.tags);
    merged.contexts.extend(ctx.contexts);
    merged.extra.extend(ctx.extra);

    tracing::warn!(
        scenario = scenario.slug(),
        surface = %reporter.surface(),
        error_type = error.type_name(),
        category = error.category(),
        "Capturing failure: {}",
        error
    );

    reporter.capture(error, merged)
}

/// Reporter used when no DSN is configured for a surface. Every capture is a no-op.
#[derive(Debug, Clone)]
pub struct DisabledReporter {
    surface: Surface,
}

impl DisabledReporter {
    pub fn new(surface: Surface) -> Self {
        Self { surface }
    }
}

impl ErrorReporter for DisabledReporter {
    fn surface(&self) -> Surface {
        self.surface
    }

    fn state(&self) -> BridgeState {
        BridgeState::Disabled
    }

    fn capture(&self, error: &(dyn StdError + 'static), _ctx: CaptureContext) -> Option<Uuid> {
        tracing::debug!(surface = %self.surface, "Reporting disabled, dropping capture: {}", error);
        None
    }
}

/// A capture as seen by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCapture {
    pub id: Uuid,
    pub surface: Surface,
    pub message: String,
    pub ctx: CaptureContext,
}

/// In-memory reporter that keeps every capture. Used by tests and local runs
/// where captures should be inspectable instead of shipped.
#[derive(Debug, Clone)]
pub struct RecordingReporter {
    surface: Surface,
    captures: Arc<Mutex<Vec<RecordedCapture>>>,
}

impl RecordingReporter {
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            captures: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn captures(&self) -> Vec<RecordedCapture> {
        self.captures.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.captures.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.lock().is_empty()
    }
}

impl ErrorReporter for RecordingReporter {
    fn surface(&self) -> Surface {
        self.surface
    }

    fn state(&self) -> BridgeState {
        BridgeState::Active
    }

    fn capture(&self, error: &(dyn StdError + 'static), ctx: CaptureContext) -> Option<Uuid> {
        let id = Uuid::new_v4();
        self.captures.lock().push(RecordedCapture {
            id,
            surface: self.surface,
            message: error.to_string(),
            ctx,
        });
        Some(id)
    }
}

/// One reporter per surface, built once at startup and shared by handlers.
#[derive(Clone)]
pub struct ReportingBridge {
    browser: Arc<dyn ErrorReporter>,
    server: Arc<dyn ErrorReporter>,
    edge: Arc<dyn ErrorReporter>,
}

impl ReportingBridge {
    pub fn new(
        browser: Arc<dyn ErrorReporter>,
        server: Arc<dyn ErrorReporter>,
        edge: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self { browser, server, edge }
    }

    pub fn disabled() -> Self {
        Self::new(
            Arc::new(DisabledReporter::new(Surface::Browser)),
            Arc::new(DisabledReporter::new(Surface::Server)),
            Arc::new(DisabledReporter::new(Surface::Edge)),
        )
    }

    pub fn for_surface(&self, surface: Surface) -> &dyn ErrorReporter {
        match surface {
            Surface::Browser => self.browser.as_ref(),
            Surface::Server => self.server.as_ref(),
            Surface::Edge => self.edge.as_ref(),
        }
    }

    pub fn shared(&self, surface: Surface) -> Arc<dyn ErrorReporter> {
        match surface {
            Surface::Browser => Arc::clone(&self.browser),
            Surface::Server => Arc::clone(&self.server),
            Surface::Edge => Arc::clone(&self.edge),
        }
    }

    pub fn browser(&self) -> &dyn ErrorReporter {
        self.browser.as_ref()
    }

    pub fn server(&self) -> &dyn ErrorReporter {
        self.server.as_ref()
    }

    pub fn edge(&self) -> &dyn ErrorReporter {
        self.edge.as_ref()
    }

    /// Flush every surface, giving each the full timeout.
    pub fn flush(&self, timeout: Duration) -> bool {
        Surface::ALL
            .iter()
            .map(|surface| self.for_surface(*surface).flush(timeout))
            .fold(true, |all, flushed| all && flushed)
    }
}

impl fmt::Debug for ReportingBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportingBridge")
            .field("browser", &self.browser.state())
            .field("server", &self.server.state())
            .field("edge", &self.edge.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorClass, FailureKind, ValidationReason};
    use serde_json::json;

    fn missing_items() -> ClassifiedError {
        ClassifiedError::new(
            ErrorClass::OrderValidation,
            FailureKind::Validation(ValidationReason::MissingItems),
            "Order payload missing line items",
        )
        .with_context(json!({ "order": { "items": [], "shippingCountry": "AQ" } }))
    }

    #[test]
    fn test_capture_failure_tags() {
        let reporter = RecordingReporter::new(Surface::Server);
        let id = capture_failure(
            &reporter,
            Scenario::CrossBoundary,
            &missing_items(),
            CaptureContext::new().extra("attempt", json!(1)),
        );

        assert!(id.is_some());
        let captures = reporter.captures();
        assert_eq!(captures.len(), 1);

        let capture = &captures[0];
        assert_eq!(capture.message, "Order payload missing line items");
        assert_eq!(capture.ctx.tags["scenario"], "cross-boundary");
        assert_eq!(capture.ctx.tags["surface"], "server");
        assert_eq!(capture.ctx.tags["error.type"], "OrderValidationError");
        assert_eq!(capture.ctx.contexts["failure"]["order"]["shippingCountry"], "AQ");
        assert_eq!(capture.ctx.extra["attempt"], json!(1));
    }

    #[test]
    fn test_disabled_reporter_drops_everything() {
        let reporter = DisabledReporter::new(Surface::Edge);

        assert_eq!(reporter.state(), BridgeState::Disabled);
        assert!(capture_failure(&reporter, Scenario::ServerSimple, &missing_items(), CaptureContext::new()).is_none());
        assert!(reporter.flush(Duration::from_millis(10)));
    }

    #[test]
    fn test_context_wraps_scalars() {
        let ctx = CaptureContext::new().context("integration", json!("https://example.test"));
        assert_eq!(ctx.contexts["integration"]["value"], "https://example.test");
    }

    #[test]
    fn test_bridge_routes_by_surface() {
        let browser = RecordingReporter::new(Surface::Browser);
        let bridge = ReportingBridge::new(
            Arc::new(browser.clone()),
            Arc::new(DisabledReporter::new(Surface::Server)),
            Arc::new(DisabledReporter::new(Surface::Edge)),
        );

        bridge.browser().capture(&missing_items(), CaptureContext::new());

        assert_eq!(browser.len(), 1);
        assert_eq!(bridge.for_surface(Surface::Server).state(), BridgeState::Disabled);
        assert_eq!(bridge.shared(Surface::Browser).state(), BridgeState::Active);
        assert!(bridge.flush(Duration::from_millis(10)));
    }
}
