pub mod error;
pub mod reporting;
pub mod scenarios;
pub mod upstream;
pub mod validation;

pub use error::{ClassifiedError, ErrorClass, FailureKind, ValidationReason};
pub use reporting::{CaptureContext, ErrorReporter, ReportingBridge, Surface};
pub use scenarios::Scenario;
