use seer_shared::models::Problem;
use serde_json::{json, Value};

use crate::error::{ClassifiedError, ErrorClass, FailureKind};
use crate::reporting::CaptureContext;

pub const INTEGRATION_PATH: &str = "/api/third-party-failure";

/// Failure seen by the browser when the marketing sync proxy answers non-2xx.
pub fn sync_failure(status: u16, body: &str) -> ClassifiedError {
    let problem = serde_json::from_str::<Problem>(body)
        .ok()
        .map(|p| json!({ "detail": p.detail, "type": p.type_ }))
        .unwrap_or(Value::Null);

    ClassifiedError::new(
        ErrorClass::AudienceSync,
        FailureKind::DependencyFailure {
            status: Some(status),
            body: body.to_string(),
        },
        "Marketing integration failed to sync audience",
    )
    .with_context(json!({ "status": status, "problem": problem }))
}

/// The server's problem body, attached as extras.
pub fn capture_extras(error: &ClassifiedError) -> CaptureContext {
    let mut ctx = CaptureContext::new();
    if let Some(problem) = error.context()["problem"].as_object() {
        for (key, value) in problem {
            ctx = ctx.extra(key.clone(), value.clone());
        }
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_becomes_extras() {
        let error = sync_failure(
            502,
            r#"{"detail":"External API returned a non-success status","type":"IntegrationError"}"#,
        );
        let extras = capture_extras(&error).extra;

        assert_eq!(error.message(), "Marketing integration failed to sync audience");
        assert_eq!(extras["type"], "IntegrationError");
        assert_eq!(extras["detail"], "External API returned a non-success status");
    }

    #[test]
    fn test_non_json_body_has_no_extras() {
        let error = sync_failure(502, "Bad Gateway");
        assert!(capture_extras(&error).extra.is_empty());
    }
}
