use axum::{http::Method, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use seer_core::reporting::Surface;

pub mod checkout;
pub mod error;
pub mod integration;
pub mod middleware;
pub mod pages;
pub mod scenarios;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// The JSON API on its own. Scenario pages call into this router in-process.
pub fn api_routes(state: AppState) -> Router {
    api_router(state.config.server.body_limit_bytes).with_state(state)
}

fn api_router(body_limit: usize) -> Router<AppState> {
    Router::new()
        .merge(checkout::routes(body_limit))
        .merge(integration::routes())
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let boundary = middleware::error_boundary(state.reporters.shared(Surface::Server));

    Router::new()
        .merge(api_router(state.config.server.body_limit_bytes))
        .merge(scenarios::routes())
        .route("/health", get(health))
        .fallback(not_found)
        .layer(boundary)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> impl IntoResponse {
    pages::not_found()
}
