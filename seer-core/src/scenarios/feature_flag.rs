use seer_shared::Masked;
use serde_json::json;

use crate::error::{ClassifiedError, ErrorClass, FailureKind};

pub const SYNC_TOKEN_KEY: &str = "FEATURE_FLAG_SYNC_TOKEN";

/// The sync job cannot run without its token. A blank token counts as missing.
pub fn require_sync_token(token: Option<&Masked<String>>) -> Result<&Masked<String>, ClassifiedError> {
    token.filter(|token| !token.is_blank()).ok_or_else(|| {
        ClassifiedError::new(
            ErrorClass::Configuration,
            FailureKind::ConfigMissing {
                key: SYNC_TOKEN_KEY.to_string(),
            },
            format!(
                "Server configuration missing {}. Sync job cannot proceed.",
                SYNC_TOKEN_KEY
            ),
        )
        .with_context(json!({ "key": SYNC_TOKEN_KEY }))
    })
}
