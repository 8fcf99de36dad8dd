use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::triage::assessor::AssessError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Remote service error: {0}")]
    RemoteService(String),
}

impl From<AssessError> for AppError {
    fn from(err: AssessError) -> Self {
        match err {
            AssessError::RemoteService(e) => AppError::RemoteService(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::RemoteService(msg) => {
                tracing::error!("Remote service error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "REMOTE_SERVICE_ERROR",
                    "The assessment service is unavailable. If you feel unwell, \
                    please contact a healthcare professional."
                        .to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
