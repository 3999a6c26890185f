//! HTTP error handling.
//!
//! Every failure is rendered as `{"success": false, "message": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::MessageResponse;
use crate::db::repository::RepositoryError;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Caller identity missing or unknown
    Unauthorized(String),
    /// Internal server error; the message is sent as-is
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Repository(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Repository(RepositoryError::ValidationError { .. }) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Internal(msg) => msg,
            AppError::Repository(e) if status.is_client_error() => e.message().to_string(),
            AppError::Repository(e) => {
                tracing::error!("Repository failure: {}", e);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (
            status,
            Json(MessageResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
