use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use seer_shared::models::Problem;
use serde_json::Value;

/// Longest slice of an undecodable payload kept in the failure.
const RAW_PREVIEW_CHARS: usize = 256;

/// Stable type label of a failure. This is what clients see in the `type`
/// field of an error body and what monitoring groups on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    OrderValidation,
    Integration,
    Configuration,
    WarehouseSnapshot,
    AnalyticsConsistency,
    ProfileNormalization,
    CheckoutClient,
    AudienceSync,
}

impl ErrorClass {
    pub const fn type_name(self) -> &'static str {
        match self {
            ErrorClass::OrderValidation => "OrderValidationError",
            ErrorClass::Integration => "IntegrationError",
            ErrorClass::Configuration => "ConfigurationError",
            ErrorClass::WarehouseSnapshot => "WarehouseSnapshotError",
            ErrorClass::AnalyticsConsistency => "AnalyticsConsistencyError",
            ErrorClass::ProfileNormalization => "ProfileNormalizationError",
            ErrorClass::CheckoutClient => "CheckoutClientError",
            ErrorClass::AudienceSync => "AudienceSyncError",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    MissingItems,
    UnsupportedRegion { country: String },
    MissingField { field: String },
    MalformedEntry { field: String },
}

impl ValidationReason {
    pub fn category(&self) -> &'static str {
        match self {
            ValidationReason::MissingItems => "validation: missing items",
            ValidationReason::UnsupportedRegion { .. } => "validation: unsupported region",
            ValidationReason::MissingField { .. } => "validation: missing field",
            ValidationReason::MalformedEntry { .. } => "validation: malformed entry",
        }
    }
}

/// What went wrong, independent of which scenario it happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Validation(ValidationReason),
    DecodeFailure { raw: String },
    DependencyFailure { status: Option<u16>, body: String },
    ConfigMissing { key: String },
    NullAccess { path: String },
}

impl FailureKind {
    pub fn decode(raw: &str) -> Self {
        FailureKind::DecodeFailure {
            raw: raw.chars().take(RAW_PREVIEW_CHARS).collect(),
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            FailureKind::Validation(reason) => reason.category(),
            FailureKind::DecodeFailure { .. } => "validation: malformed input",
            FailureKind::DependencyFailure { .. } => "dependency: upstream failure",
            FailureKind::ConfigMissing { .. } => "configuration: missing setting",
            FailureKind::NullAccess { .. } => "runtime: null access",
        }
    }

    /// HTTP status used when the failure is answered by an API route.
    pub fn status_code(&self) -> u16 {
        match self {
            FailureKind::Validation(_) | FailureKind::DecodeFailure { .. } => 422,
            FailureKind::DependencyFailure { .. } => 502,
            FailureKind::ConfigMissing { .. } | FailureKind::NullAccess { .. } => 500,
        }
    }

    pub fn is_client_input(&self) -> bool {
        matches!(
            self,
            FailureKind::Validation(_) | FailureKind::DecodeFailure { .. }
        )
    }
}

/// A failure annotated with a type label, a category and diagnostic context.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ClassifiedError {
    class: ErrorClass,
    kind: FailureKind,
    message: String,
    context: Value,
    #[source]
    cause: Option<Arc<dyn StdError + Send + Sync>>,
}

impl ClassifiedError {
    pub fn new(class: ErrorClass, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            class,
            kind,
            message: message.into(),
            context: Value::Null,
            cause: None,
        }
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn class(&self) -> ErrorClass {
        self.class
    }

    pub fn kind(&self) -> &FailureKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &Value {
        &self.context
    }

    pub fn type_name(&self) -> &'static str {
        self.class.type_name()
    }

    pub fn category(&self) -> &'static str {
        self.kind.category()
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// The `{ detail, type }` body sent back to clients.
    pub fn problem(&self) -> Problem {
        Problem::new(self.message.clone(), self.type_name())
    }
}

impl PartialEq for ClassifiedError {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class
            && self.kind == other.kind
            && self.message == other.message
            && self.context == other.context
    }
}
