use async_trait::async_trait;
use serde_json::json;

use crate::error::{ClassifiedError, ErrorClass, FailureKind};

/// Raw answer from a third-party endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },
}

/// Outbound HTTP access to third-party services.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn get(&self, endpoint: &str) -> Result<UpstreamResponse, UpstreamError>;
}

/// Call a third-party endpoint, classifying both transport errors and
/// non-2xx answers as `IntegrationError`s.
pub async fn call_third_party(
    client: &dyn UpstreamClient,
    endpoint: &str,
) -> Result<UpstreamResponse, ClassifiedError> {
    let response = client.get(endpoint).await.map_err(|e| {
        ClassifiedError::new(
            ErrorClass::Integration,
            FailureKind::DependencyFailure {
                status: None,
                body: String::new(),
            },
            "Third-party request failed unexpectedly",
        )
        .with_context(json!({ "cause": e.to_string() }))
        .with_cause(e)
    })?;

    if !response.is_success() {
        return Err(ClassifiedError::new(
            ErrorClass::Integration,
            FailureKind::DependencyFailure {
                status: Some(response.status),
                body: response.body.clone(),
            },
            "External API returned a non-success status",
        )
        .with_context(json!({ "status": response.status, "body": response.body })));
    }

    Ok(response)
}

/// Canned upstream for tests and offline runs: answers every request with
/// the same response, or the same transport error.
pub struct StaticUpstream {
    outcome: Result<UpstreamResponse, String>,
}

impl StaticUpstream {
    pub fn responding(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: Ok(UpstreamResponse {
                status,
                body: body.into(),
            }),
        }
    }

    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(reason.into()),
        }
    }
}

#[async_trait]
impl UpstreamClient for StaticUpstream {
    async fn get(&self, endpoint: &str) -> Result<UpstreamResponse, UpstreamError> {
        tracing::debug!("Static upstream answering {}", endpoint);
        self.outcome.clone().map_err(|reason| UpstreamError::Transport {
            endpoint: endpoint.to_string(),
            reason,
        })
    }
}
