//! Request and response bodies exchanged between the HTTP client and service.

use serde::{Deserialize, Serialize};

use crate::query::{FilterParams, PagingParams};

/// Route accepting a JSON array of messages to persist.
pub const SAVE_ROUTE: &str = "/v1/logging/save";
/// Route answering a [`ReadRequest`] with a `DataPage` of messages.
pub const READ_ROUTE: &str = "/v1/logging/read";
/// Route accepting a [`ClearRequest`].
pub const CLEAR_ROUTE: &str = "/v1/logging/clear";
/// Liveness probe route.
pub const HEALTH_ROUTE: &str = "/health";

/// Header carrying the caller's correlation (trace) ID.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Body of a read request: filter criteria and paging side by side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRequest {
    /// Filter criteria
    #[serde(flatten)]
    pub filter: FilterParams,
    /// Paging window
    #[serde(flatten)]
    pub paging: PagingParams,
}

impl ReadRequest {
    /// Builds a request; absent arguments use their defaults.
    #[must_use]
    pub fn new(filter: Option<FilterParams>, paging: Option<PagingParams>) -> Self {
        Self {
            filter: filter.unwrap_or_default(),
            paging: paging.unwrap_or_default(),
        }
    }
}

/// Body of a clear request.
///
/// Without a correlation ID every stored message is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearRequest {
    /// Only remove messages carrying this correlation ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// JSON error body returned by the service on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error kind (`validation`, `serialization`, `storage`, ...)
    pub error: String,
    /// Error details
    pub message: String,
}
