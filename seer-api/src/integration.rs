use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use seer_core::reporting::{capture_failure, CaptureContext};
use seer_core::scenarios::audience::INTEGRATION_PATH;
use seer_core::scenarios::Scenario;
use seer_core::upstream::call_third_party;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(INTEGRATION_PATH, get(third_party_failure))
}

/// Proxy the configured third-party endpoint. A healthy upstream is the
/// unexpected outcome here.
async fn third_party_failure(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let endpoint = state.config.upstream.third_party_url.as_str();

    match call_third_party(state.upstream.as_ref(), endpoint).await {
        Ok(response) => {
            tracing::warn!("Third-party endpoint {} answered {}", endpoint, response.status);
            Ok(Json(json!({ "status": "unexpected-success" })))
        }
        Err(error) => {
            capture_failure(
                state.reporters.server(),
                Scenario::IntegrationFailure,
                &error,
                CaptureContext::new().context("integration", json!({ "endpoint": endpoint })),
            );
            Err(error.into())
        }
    }
}
