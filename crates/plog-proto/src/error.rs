//! Error types shared by the controller, the stores and both client transports.

use thiserror::Error;

/// Boxed error used to carry the original cause of a failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur anywhere in the logging pipeline.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Filter or paging values that cannot be corrected locally.
    #[error("validation error: {0}")]
    Validation(String),

    /// The remote service could not be reached or did not answer in time.
    #[error("connectivity error: {message}")]
    Connectivity {
        /// What was being attempted.
        message: String,
        /// Underlying transport failure, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// A payload could not be encoded or decoded.
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of the failure.
        message: String,
        /// Underlying codec failure, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// The persistence backend failed.
    #[error("storage error: {message}")]
    Storage {
        /// Description of the failure.
        message: String,
        /// Underlying backend failure, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// The remote service answered with an error that has no dedicated kind.
    #[error("remote error ({status}): {message}")]
    Remote {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message returned by the service.
        message: String,
    },
}

/// Result type alias for logging operations.
pub type Result<T> = std::result::Result<T, LoggingError>;

impl LoggingError {
    /// Creates a connectivity error wrapping its cause.
    pub fn connectivity(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Connectivity {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a storage error wrapping its cause.
    pub fn storage(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a serialization error wrapping its cause.
    pub fn serialization(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Serialization {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Stable machine-readable name of the error kind, used on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Connectivity { .. } => "connectivity",
            Self::Serialization { .. } => "serialization",
            Self::Storage { .. } => "storage",
            Self::Remote { .. } => "remote",
        }
    }

    /// The error message without the kind prefix.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::Connectivity { message, .. }
            | Self::Serialization { message, .. }
            | Self::Storage { message, .. }
            | Self::Remote { message, .. } => message,
        }
    }

    /// Rebuilds an error reported by the remote service.
    ///
    /// Known kinds map back to their own variant so that callers observe the
    /// same error through either transport. Unknown kinds become [`Self::Remote`].
    #[must_use]
    pub fn from_wire(status: u16, kind: &str, message: String) -> Self {
        match kind {
            "validation" => Self::Validation(message),
            "serialization" => Self::Serialization {
                message,
                source: None,
            },
            "storage" => Self::Storage {
                message,
                source: None,
            },
            _ => Self::Remote { status, message },
        }
    }

    /// Returns true for failures that only the remote transport can produce.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Connectivity { .. } | Self::Remote { .. })
    }
}

impl From<serde_json::Error> for LoggingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<std::io::Error> for LoggingError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
