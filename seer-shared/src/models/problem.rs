use serde::{Deserialize, Serialize};

/// JSON error body returned by the API: `{ "detail": ..., "type": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub detail: String,
    #[serde(rename = "type")]
    pub type_: String,
}

impl Problem {
    pub fn new(detail: impl Into<String>, type_: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            type_: type_.into(),
        }
    }
}
