use axum::{
    body::{self, Body},
    extract::{Path, State},
    http::{header, Method, Request},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower::ServiceExt;

use seer_core::reporting::{capture_failure, CaptureContext};
use seer_core::scenarios::{analytics, audience, checkout, feature_flag, profile, warehouse, Scenario};
use seer_core::ClassifiedError;

use crate::error::ApiError;
use crate::pages::{self, Outcome};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/scenarios/{slug}", get(scenario_page))
}

async fn index() -> Html<String> {
    pages::index()
}

async fn scenario_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let Some(scenario) = Scenario::from_slug(&slug) else {
        tracing::debug!("Unknown scenario {}", slug);
        return Ok(pages::not_found());
    };

    let outcome = match scenario {
        Scenario::ClientEasy => match profile::run() {
            Ok(email) => Outcome::Completed(format!("Normalized email {}", email)),
            Err(error) => capture(&state, scenario, &error, CaptureContext::new()),
        },
        Scenario::ClientComplex => match analytics::run(state.event_cache.as_ref()).await {
            Ok(summary) => Outcome::Completed(format!(
                "Dashboard totals {} (average {})",
                summary.totals,
                summary
                    .average
                    .map(|avg| avg.to_string())
                    .unwrap_or_else(|| "n/a".into())
            )),
            Err(error) => capture(&state, scenario, &error, CaptureContext::new()),
        },
        Scenario::ServerSimple => {
            let token = state.config.scenarios.feature_flag_sync_token.as_ref();
            match feature_flag::require_sync_token(token) {
                Ok(token) => Outcome::Completed(format!("Feature flags synced with token {}", token)),
                Err(error) => {
                    capture(&state, scenario, &error, CaptureContext::new());
                    return Ok(pages::server_error());
                }
            }
        }
        Scenario::ServerComplex => {
            match warehouse::load_availability(&state.config.scenarios.warehouse_snapshot) {
                Ok(availability) => {
                    let listing = availability
                        .iter()
                        .map(|(sku, available)| format!("{}: {}", sku, available))
                        .collect::<Vec<_>>()
                        .join(", ");
                    Outcome::Completed(format!("Availability {}", listing))
                }
                Err(error) => {
                    capture(&state, scenario, &error, CaptureContext::new());
                    return Ok(pages::server_error());
                }
            }
        }
        Scenario::CrossBoundary => submit_sample_order(&state)
            .await
            .inspect_err(|e| report_unexpected(&state, scenario, e))?,
        Scenario::IntegrationFailure => sync_audience(&state)
            .await
            .inspect_err(|e| report_unexpected(&state, scenario, e))?,
    };

    Ok(pages::scenario(scenario, &outcome).into_response())
}

fn capture(
    state: &AppState,
    scenario: Scenario,
    error: &ClassifiedError,
    ctx: CaptureContext,
) -> Outcome {
    let surface = scenario.surface();
    let event_id = capture_failure(state.reporters.for_surface(surface), scenario, error, ctx);
    Outcome::Captured {
        type_name: error.type_name(),
        message: error.message().to_string(),
        surface,
        event_id,
    }
}

fn report_unexpected(state: &AppState, scenario: Scenario, error: &ApiError) {
    if let ApiError::Internal(err) = error {
        let source: &(dyn std::error::Error + 'static) = err.as_ref();
        state.reporters.server().capture(
            source,
            CaptureContext::new()
                .tag("scenario", scenario.slug())
                .tag("surface", "server")
                .tag("error.type", "InternalError"),
        );
    }
}

/// Send a request through the API router in-process, as the browser would.
async fn call_api(state: &AppState, request: Request<Body>) -> Result<(u16, String), ApiError> {
    let response = crate::api_routes(state.clone())
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});
    let status = response.status().as_u16();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(anyhow::Error::from)?;
    Ok((status, String::from_utf8_lossy(&bytes).into_owned()))
}

async fn submit_sample_order(state: &AppState) -> Result<Outcome, ApiError> {
    let payload = serde_json::to_vec(state.checkout_order.as_ref()).map_err(anyhow::Error::from)?;
    let request = Request::builder()
        .method(Method::POST)
        .uri(checkout::CHECKOUT_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload))
        .map_err(anyhow::Error::from)?;

    let (status, body) = call_api(state, request).await?;
    if (200..300).contains(&status) {
        return Ok(Outcome::Completed("Order submitted".into()));
    }

    let error = checkout::submission_failure(status, &body);
    let extras = checkout::capture_extras(&error);
    Ok(capture(state, Scenario::CrossBoundary, &error, extras))
}

async fn sync_audience(state: &AppState) -> Result<Outcome, ApiError> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(audience::INTEGRATION_PATH)
        .body(Body::empty())
        .map_err(anyhow::Error::from)?;

    let (status, body) = call_api(state, request).await?;
    if (200..300).contains(&status) {
        return Ok(Outcome::Completed(format!("Audience synced: {}", body)));
    }

    let error = audience::sync_failure(status, &body);
    let extras = audience::capture_extras(&error);
    Ok(capture(state, Scenario::IntegrationFailure, &error, extras))
}

