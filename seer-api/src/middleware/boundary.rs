use std::any::Any;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Response;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};

use seer_core::reporting::{CaptureContext, ErrorReporter};

use crate::pages;

/// A panic that escaped a handler.
#[derive(Debug, thiserror::Error)]
#[error("handler panicked: {0}")]
pub struct HandlerPanic(pub String);

impl HandlerPanic {
    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<String>()
            .cloned()
            .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Self(message)
    }
}

/// Captures a handler panic and answers with the generic 500 page.
#[derive(Clone)]
pub struct ReportPanic {
    reporter: Arc<dyn ErrorReporter>,
}

impl ResponseForPanic for ReportPanic {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let panic = HandlerPanic::from_payload(err.as_ref());
        tracing::error!("{}", panic);

        self.reporter.capture(
            &panic,
            CaptureContext::new()
                .tag("surface", self.reporter.surface().as_str())
                .tag("mechanism", "panic"),
        );

        pages::server_error()
    }
}

pub fn error_boundary(reporter: Arc<dyn ErrorReporter>) -> CatchPanicLayer<ReportPanic> {
    CatchPanicLayer::custom(ReportPanic { reporter })
}
