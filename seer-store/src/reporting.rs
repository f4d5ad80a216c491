use std::borrow::Cow;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use sentry::protocol::{Context, Event, Level};
use sentry::types::{Dsn, ParseDsnError};
use sentry::{ClientOptions, Hub, Scope};
use tracing::{info, warn};
use uuid::Uuid;

use seer_core::reporting::{
    BridgeState, CaptureContext, DisabledReporter, ErrorReporter, ReportingBridge, Surface,
};

use crate::app_config::ReportingConfig;

#[derive(Debug, thiserror::Error)]
pub enum ReportingError {
    #[error("invalid DSN for {surface} reporter: {source}")]
    InvalidDsn {
        surface: Surface,
        #[source]
        source: ParseDsnError,
    },
}

/// Sentry-backed reporter for one surface. Holds its own hub so the three
/// surfaces never share scope or transport.
pub struct SentryReporter {
    surface: Surface,
    client: Arc<sentry::Client>,
    hub: Hub,
}

impl SentryReporter {
    pub fn new(surface: Surface, options: ClientOptions) -> Self {
        let client = Arc::new(sentry::Client::with_options(sentry::apply_defaults(options)));
        let hub = Hub::new(Some(Arc::clone(&client)), Arc::new(Scope::default()));
        Self { surface, client, hub }
    }

    pub fn options_for(surface: Surface, dsn: Dsn, config: &ReportingConfig) -> ClientOptions {
        ClientOptions {
            dsn: Some(dsn),
            environment: Some(Cow::Owned(config.environment.clone())),
            release: config.release.clone().map(Cow::Owned),
            traces_sample_rate: config.traces_sample_rate,
            server_name: Some(Cow::Borrowed(surface.as_str())),
            ..Default::default()
        }
    }

    fn build_event(&self, error: &(dyn StdError + 'static), ctx: CaptureContext) -> Event<'static> {
        let mut event = sentry::event_from_error(error);
        event.level = Level::Error;
        event.message = Some(error.to_string());
        event.tags.insert("surface".to_string(), self.surface.as_str().to_string());
        event.tags.extend(ctx.tags);
        event.extra.extend(ctx.extra);
        for (name, block) in ctx.contexts {
            event
                .contexts
                .insert(name, Context::Other(block.into_iter().collect()));
        }
        event
    }
}

impl ErrorReporter for SentryReporter {
    fn surface(&self) -> Surface {
        self.surface
    }

    fn state(&self) -> BridgeState {
        if self.client.is_enabled() {
            BridgeState::Active
        } else {
            BridgeState::Disabled
        }
    }

    fn capture(&self, error: &(dyn StdError + 'static), ctx: CaptureContext) -> Option<Uuid> {
        let event = self.build_event(error, ctx);
        let id = self.hub.capture_event(event);
        if id.is_nil() {
            None
        } else {
            Some(id)
        }
    }

    fn flush(&self, timeout: Duration) -> bool {
        self.client.flush(Some(timeout))
    }
}

/// Build one reporter per surface. A surface without a DSN gets a disabled
/// reporter; a malformed DSN is a startup error.
pub fn init_bridge(config: &ReportingConfig) -> Result<ReportingBridge, ReportingError> {
    let build = |surface: Surface| -> Result<Arc<dyn ErrorReporter>, ReportingError> {
        match config.dsn_for(surface) {
            Some(raw) => {
                let dsn: Dsn = raw
                    .parse()
                    .map_err(|source| ReportingError::InvalidDsn { surface, source })?;
                info!(%surface, environment = %config.environment, "Error reporting enabled");
                let options = SentryReporter::options_for(surface, dsn, config);
                Ok(Arc::new(SentryReporter::new(surface, options)))
            }
            None => {
                warn!(%surface, "No DSN configured, error reporting disabled");
                Ok(Arc::new(DisabledReporter::new(surface)))
            }
        }
    };

    Ok(ReportingBridge::new(
        build(Surface::Browser)?,
        build(Surface::Server)?,
        build(Surface::Edge)?,
    ))
}
