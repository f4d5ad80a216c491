use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ClassifiedError, ErrorClass, FailureKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
}

/// Profile hydrated from client state. The client never stores one, so this
/// is always empty.
pub fn hydrated_profile() -> Option<Profile> {
    None
}

/// Trim and lowercase the profile email.
pub fn normalize_email(profile: Option<&Profile>) -> Result<String, ClassifiedError> {
    let profile = profile.ok_or_else(|| {
        ClassifiedError::new(
            ErrorClass::ProfileNormalization,
            FailureKind::NullAccess {
                path: "profile.email".to_string(),
            },
            "Cannot normalize email: profile record is null",
        )
        .with_context(json!({ "profile": null }))
    })?;

    Ok(profile.email.trim().to_lowercase())
}

/// Normalize the email of whatever profile the client hydrated.
pub fn run() -> Result<String, ClassifiedError> {
    let profile = hydrated_profile();
    normalize_email(profile.as_ref())
}
