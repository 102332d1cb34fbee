//! Error types for the HTTP service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use plog_proto::{ErrorBody, LoggingError};
use thiserror::Error;

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors that can occur in the logging service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {0}: {1}")]
    BindFailed(std::net::SocketAddr, std::io::Error),

    /// The server stopped with an I/O failure.
    #[error("server error: {0}")]
    Serve(std::io::Error),

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A controller or decoding failure.
    #[error(transparent)]
    Logging(#[from] LoggingError),
}

impl ServiceError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Logging(LoggingError::Validation(_) | LoggingError::Serialization { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Logging(LoggingError::Connectivity { .. }) => StatusCode::BAD_GATEWAY,
            Self::Logging(LoggingError::Remote { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Logging(LoggingError::Storage { .. })
            | Self::BindFailed(_, _)
            | Self::Serve(_)
            | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Logging(err) => ErrorBody {
                error: err.kind().to_string(),
                message: err.detail().to_string(),
            },
            other => ErrorBody {
                error: "internal".to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
