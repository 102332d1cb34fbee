//! Business logic shared by every transport.
//!
//! The [`LoggingController`] is the single place where incoming batches are
//! normalized and queries receive their defaults. The direct client calls it
//! in-process and the HTTP service calls it after decoding a request, so both
//! transports observe exactly the same behavior.

use chrono::Utc;
use plog_proto::{DataPage, FilterParams, LogMessage, PagingParams, Result};
use plog_store::SharedPersistence;
use tracing::{debug, info, warn};

/// Validates, timestamps and forwards log messages to a persistence backend.
pub struct LoggingController {
    persistence: SharedPersistence,
}

impl std::fmt::Debug for LoggingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingController")
            .field("stored", &self.persistence.len())
            .finish()
    }
}

impl LoggingController {
    /// Creates a controller over the given persistence.
    #[must_use]
    pub fn new(persistence: SharedPersistence) -> Self {
        Self { persistence }
    }

    /// Returns the persistence backend.
    #[must_use]
    pub const fn persistence(&self) -> &SharedPersistence {
        &self.persistence
    }

    /// Persists a batch, stamping messages that have no time with the server clock.
    ///
    /// `correlation_id` identifies the calling request for tracing only.
    pub fn save(&self, correlation_id: Option<&str>, mut messages: Vec<LogMessage>) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        for message in &mut messages {
            message.time.get_or_insert(now);
        }

        let count = messages.len();
        self.persistence.save(messages).inspect_err(|e| {
            warn!(correlation_id = correlation_id.unwrap_or_default(), error = %e, "failed to store log batch");
        })?;

        debug!(
            correlation_id = correlation_id.unwrap_or_default(),
            count, "saved log batch"
        );
        Ok(())
    }

    /// Returns a page of messages matching `filter`.
    ///
    /// An absent filter matches everything; absent paging uses the default
    /// window. Paging is resolved by the backend through
    /// [`PagingParams::resolve`]: a negative `skip` is rejected, a negative
    /// `take` becomes zero.
    pub fn get_page_by_filter(
        &self,
        correlation_id: Option<&str>,
        filter: Option<FilterParams>,
        paging: Option<PagingParams>,
    ) -> Result<DataPage<LogMessage>> {
        let filter = filter.unwrap_or_default();
        let paging = paging.unwrap_or_default();

        let page = self.persistence.get_page_by_filter(&filter, &paging)?;
        debug!(
            correlation_id = correlation_id.unwrap_or_default(),
            returned = page.data.len(),
            total = ?page.total,
            "read log page"
        );
        Ok(page)
    }

    /// Removes every stored message, or only those carrying `correlation_id`.
    pub fn clear(&self, correlation_id: Option<&str>) -> Result<()> {
        self.persistence.clear(correlation_id)?;
        info!(scope = correlation_id.unwrap_or("all"), "cleared log messages");
        Ok(())
    }
}
