use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seer_core::ClassifiedError;
use seer_shared::models::Problem;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Classified(#[from] ClassifiedError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, problem) = match self {
            ApiError::Classified(err) => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    tracing::error!(error_type = err.type_name(), "{}", err);
                }
                (status, err.problem())
            }
            ApiError::Internal(err) => {
                tracing::error!("Internal Server Error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Problem::new("Internal Server Error", "InternalError"),
                )
            }
        };

        (status, Json(problem)).into_response()
    }
}
