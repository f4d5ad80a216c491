use std::sync::Arc;

use seer_core::reporting::ReportingBridge;
use seer_core::scenarios::analytics::EventCache;
use seer_core::scenarios::checkout;
use seer_core::upstream::UpstreamClient;
use seer_shared::models::OrderPayload;
use seer_store::app_config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub reporters: ReportingBridge,
    pub upstream: Arc<dyn UpstreamClient>,
    pub event_cache: Arc<dyn EventCache>,
    /// Order the cross-boundary page submits to the checkout API.
    pub checkout_order: Arc<OrderPayload>,
}

impl AppState {
    pub fn new(
        config: Config,
        reporters: ReportingBridge,
        upstream: Arc<dyn UpstreamClient>,
        event_cache: Arc<dyn EventCache>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            reporters,
            upstream,
            event_cache,
            checkout_order: Arc::new(checkout::sample_order()),
        }
    }

    pub fn with_checkout_order(mut self, order: OrderPayload) -> Self {
        self.checkout_order = Arc::new(order);
        self
    }
}
