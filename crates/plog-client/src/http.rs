//! HTTP client for a remote logging service.

use plog_proto::wire::{CLEAR_ROUTE, CORRELATION_ID_HEADER, READ_ROUTE, SAVE_ROUTE};
use plog_proto::{
    ClearRequest, DataPage, ErrorBody, FilterParams, LogMessage, LoggingError, PagingParams,
    ReadRequest, Result,
};
use serde::Serialize;
use tracing::debug;

use crate::client::LoggingClient;
use crate::config::ConnectionConfig;

/// Client sending logging operations to a `plogd` service over HTTP.
///
/// Every request carries the configured timeout. Failures to reach the
/// service become [`LoggingError::Connectivity`]; error answers from the
/// service are decoded back into the kind the controller raised.
#[derive(Debug, Clone)]
pub struct HttpLoggingClient {
    http: reqwest::Client,
    base_url: String,
    config: ConnectionConfig,
}

impl HttpLoggingClient {
    /// Create a client for the given connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::Connectivity`] if the HTTP client cannot be built.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LoggingError::connectivity("failed to build HTTP client", e))?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            config,
        })
    }

    /// Get the connection settings.
    #[must_use]
    pub const fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Get the service base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        route: &str,
        correlation_id: Option<&str>,
        body: &B,
    ) -> Result<Vec<u8>> {
        let payload = serde_json::to_vec(body)?;
        let url = format!("{}{}", self.base_url, route);

        let mut request = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload);
        if let Some(id) = correlation_id {
            request = request.header(CORRELATION_ID_HEADER, id);
        }

        let response = request.send().await.map_err(|e| transport_error(&url, e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(&url, e))?;

        debug!(url = %url, status = status.as_u16(), "logging request completed");

        if status.is_success() {
            Ok(bytes.to_vec())
        } else {
            Err(decode_error(status.as_u16(), &bytes))
        }
    }
}

impl LoggingClient for HttpLoggingClient {
    async fn save(&self, correlation_id: Option<&str>, messages: Vec<LogMessage>) -> Result<()> {
        self.post(SAVE_ROUTE, correlation_id, &messages).await?;
        Ok(())
    }

    async fn get_page_by_filter(
        &self,
        correlation_id: Option<&str>,
        filter: Option<FilterParams>,
        paging: Option<PagingParams>,
    ) -> Result<DataPage<LogMessage>> {
        let request = ReadRequest::new(filter, paging);
        let bytes = self.post(READ_ROUTE, correlation_id, &request).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn clear(&self, correlation_id: Option<&str>) -> Result<()> {
        let request = ClearRequest {
            correlation_id: correlation_id.map(str::to_string),
        };
        self.post(CLEAR_ROUTE, correlation_id, &request).await?;
        Ok(())
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> LoggingError {
    let message = if err.is_timeout() {
        format!("request to {url} timed out")
    } else if err.is_connect() {
        format!("cannot connect to {url}")
    } else {
        format!("request to {url} failed")
    };
    LoggingError::connectivity(message, err)
}

fn decode_error(status: u16, body: &[u8]) -> LoggingError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(body) => LoggingError::from_wire(status, &body.error, body.message),
        Err(_) => LoggingError::Remote {
            status,
            message: String::from_utf8_lossy(body).into_owned(),
        },
    }
}
