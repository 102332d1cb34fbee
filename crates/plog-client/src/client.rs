//! The transport-agnostic client contract.

use std::future::Future;
use std::sync::Arc;

use plog_proto::{DataPage, FilterParams, LogMessage, PagingParams, Result};

/// Operations every logging transport provides.
///
/// The direct client calls the controller in-process; the HTTP client sends
/// the same operations to a remote service. Both must produce identical
/// persisted state and query results for the same sequence of calls.
///
/// `correlation_id` on every operation identifies the caller's request for
/// tracing. On [`clear`](Self::clear) it also selects which messages are removed.
pub trait LoggingClient: Send + Sync {
    /// Persist a batch of messages in order.
    fn save(
        &self,
        correlation_id: Option<&str>,
        messages: Vec<LogMessage>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Read one page of messages matching `filter`.
    fn get_page_by_filter(
        &self,
        correlation_id: Option<&str>,
        filter: Option<FilterParams>,
        paging: Option<PagingParams>,
    ) -> impl Future<Output = Result<DataPage<LogMessage>>> + Send;

    /// Remove every message, or only those carrying `correlation_id`.
    fn clear(&self, correlation_id: Option<&str>) -> impl Future<Output = Result<()>> + Send;
}

impl<C: LoggingClient> LoggingClient for Arc<C> {
    fn save(
        &self,
        correlation_id: Option<&str>,
        messages: Vec<LogMessage>,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).save(correlation_id, messages)
    }

    fn get_page_by_filter(
        &self,
        correlation_id: Option<&str>,
        filter: Option<FilterParams>,
        paging: Option<PagingParams>,
    ) -> impl Future<Output = Result<DataPage<LogMessage>>> + Send {
        (**self).get_page_by_filter(correlation_id, filter, paging)
    }

    fn clear(&self, correlation_id: Option<&str>) -> impl Future<Output = Result<()>> + Send {
        (**self).clear(correlation_id)
    }
}
