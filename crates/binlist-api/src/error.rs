//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use binlist_core::error::{DispatchError, QueryError, RegistryError};
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The lookup client could not be built.
    #[error("lookup client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Two handlers were registered for one command type.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Submission failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// Query failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Dispatch(DispatchError::Validation(_))
            | Self::Query(QueryError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            Self::Query(QueryError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Dispatch(DispatchError::UnregisteredCommand(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "unregistered_command")
            }
            Self::Dispatch(DispatchError::Interrupted(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "interrupted")
            }
            Self::Dispatch(DispatchError::Lifecycle(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "lifecycle_error")
            }
            Self::Dispatch(DispatchError::Infrastructure(_))
            | Self::Query(QueryError::Infrastructure(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            error: error_code,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
