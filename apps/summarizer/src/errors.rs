use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::batch::table::TableError;
use crate::batch::BatchError;
use crate::scoring::interpretations::FragmentError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`;
/// the CLI surfaces the same values through `anyhow` in `main`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Input error: {0}")]
    Input(#[from] TableError),

    #[error("{0}")]
    Batch(#[from] BatchError),

    #[error("Interpretation table error: {0}")]
    Integrity(#[from] FragmentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "CONFIGURATION_ERROR",
                    "The generation service is not configured".to_string(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Input(TableError::Io(e)) => {
                tracing::error!("Input read error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "Failed to read the uploaded table".to_string(),
                )
            }
            AppError::Input(e) => (StatusCode::BAD_REQUEST, "INPUT_ERROR", e.to_string()),
            AppError::Batch(e @ BatchError::InputRejected { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INPUT_REJECTED",
                e.to_string(),
            ),
            AppError::Batch(BatchError::Integrity(e)) => {
                tracing::error!("Interpretation table integrity error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTEGRITY_ERROR",
                    "The interpretation table is incomplete".to_string(),
                )
            }
            AppError::Integrity(e) => {
                tracing::error!("Interpretation table integrity error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTEGRITY_ERROR",
                    "The interpretation table is incomplete".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "An I/O error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
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
