//! HTTP request handlers for the logging API.
//!
//! Each handler decodes its JSON body, calls the [`LoggingController`] and
//! encodes the answer. Bodies are decoded by hand rather than through the
//! `Json` extractor so that an empty body means "defaults" and decoding
//! failures come back in the service's own error shape.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use plog_proto::wire::CORRELATION_ID_HEADER;
use plog_proto::{ClearRequest, DataPage, LogMessage, LoggingError, ReadRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::controller::LoggingController;
use crate::error::ServiceResult;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status message.
    pub status: String,
    /// Number of stored messages.
    pub stored: usize,
}

/// Handle POST /v1/logging/save - persist a batch of messages.
pub async fn save_messages(
    State(controller): State<Arc<LoggingController>>,
    headers: HeaderMap,
    body: Bytes,
) -> ServiceResult<StatusCode> {
    let messages: Vec<LogMessage> = decode(&body)?;
    let correlation_id = correlation_id(&headers).map(str::to_string);
    blocking(move || controller.save(correlation_id.as_deref(), messages)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle POST /v1/logging/read - one filtered page of messages.
pub async fn read_messages(
    State(controller): State<Arc<LoggingController>>,
    headers: HeaderMap,
    body: Bytes,
) -> ServiceResult<Json<DataPage<LogMessage>>> {
    let request: ReadRequest = decode(&body)?;
    let page = controller.get_page_by_filter(
        correlation_id(&headers),
        Some(request.filter),
        Some(request.paging),
    )?;
    Ok(Json(page))
}

/// Handle POST /v1/logging/clear - remove all or correlation-scoped messages.
pub async fn clear_messages(
    State(controller): State<Arc<LoggingController>>,
    body: Bytes,
) -> ServiceResult<StatusCode> {
    let request: ClearRequest = decode(&body)?;
    blocking(move || controller.clear(request.correlation_id.as_deref())).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle GET /health - liveness probe.
pub async fn health_check(State(controller): State<Arc<LoggingController>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        stored: controller.persistence().len(),
    })
}

/// Runs a controller write off the async workers; file backends fsync and rename.
async fn blocking<T, F>(f: F) -> Result<T, LoggingError>
where
    F: FnOnce() -> Result<T, LoggingError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| LoggingError::storage("storage task failed", e))?
}

fn decode<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, LoggingError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(body)?)
}

fn correlation_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn decode_empty_body_is_default() {
        let request: ClearRequest = decode(&Bytes::from_static(b"  \n")).unwrap();
        assert!(request.correlation_id.is_none());

        let batch: Vec<LogMessage> = decode(&Bytes::new()).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn decode_malformed_body_is_serialization_error() {
        let err = decode::<ReadRequest>(&Bytes::from_static(b"{\"take\": \"many\"}")).unwrap_err();
        assert_eq!(err.kind(), "serialization");
    }

    #[test]
    fn correlation_id_from_header() {
        let mut headers = HeaderMap::new();
        assert!(correlation_id(&headers).is_none());

        headers.insert(CORRELATION_ID_HEADER, HeaderValue::from_static("req-7"));
        assert_eq!(correlation_id(&headers), Some("req-7"));

        headers.insert(CORRELATION_ID_HEADER, HeaderValue::from_static(""));
        assert!(correlation_id(&headers).is_none());
    }
}
