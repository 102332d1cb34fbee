//! In-process client that calls the controller directly.

use std::sync::Arc;

use plog_proto::{DataPage, FilterParams, LogMessage, PagingParams, Result};
use plog_service::LoggingController;

use crate::client::LoggingClient;

/// Client calling a [`LoggingController`] in the same process.
///
/// No serialization takes place, which makes this the reference behavior the
/// HTTP client is compared against.
#[derive(Debug, Clone)]
pub struct DirectLoggingClient {
    controller: Arc<LoggingController>,
}

impl DirectLoggingClient {
    /// Create a client over a shared controller.
    #[must_use]
    pub fn new(controller: Arc<LoggingController>) -> Self {
        Self { controller }
    }

    /// Get the controller this client calls.
    #[must_use]
    pub fn controller(&self) -> Arc<LoggingController> {
        self.controller.clone()
    }
}

impl LoggingClient for DirectLoggingClient {
    async fn save(&self, correlation_id: Option<&str>, messages: Vec<LogMessage>) -> Result<()> {
        self.controller.save(correlation_id, messages)
    }

    async fn get_page_by_filter(
        &self,
        correlation_id: Option<&str>,
        filter: Option<FilterParams>,
        paging: Option<PagingParams>,
    ) -> Result<DataPage<LogMessage>> {
        self.controller
            .get_page_by_filter(correlation_id, filter, paging)
    }

    async fn clear(&self, correlation_id: Option<&str>) -> Result<()> {
        self.controller.clear(correlation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plog_proto::{LogLevel, LoggingError};
    use plog_store::MemoryPersistence;

    fn make_client() -> DirectLoggingClient {
        let store = Arc::new(MemoryPersistence::default());
        DirectLoggingClient::new(Arc::new(LoggingController::new(store)))
    }

    #[tokio::test]
    async fn save_then_read() {
        let client = make_client();
        client
            .save(
                Some("req-1"),
                vec![
                    LogMessage::new(LogLevel::Info, "one"),
                    LogMessage::new(LogLevel::Error, "two"),
                ],
            )
            .await
            .unwrap();

        let page = client
            .get_page_by_filter(None, None, Some(PagingParams::default().with_count(true)))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.total, Some(2));
        assert!(page.data.iter().all(|m| m.time.is_some()));
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let client = make_client();
        client
            .save(None, vec![LogMessage::new(LogLevel::Warn, "w")])
            .await
            .unwrap();

        client.clear(None).await.unwrap();

        let page = client.get_page_by_filter(None, None, None).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn validation_errors_pass_through() {
        let client = make_client();
        let err = client
            .get_page_by_filter(None, None, Some(PagingParams::new(-1, 10)))
            .await
            .unwrap_err();
        assert!(matches!(err, LoggingError::Validation(_)));
    }

    #[tokio::test]
    async fn shared_controller_sees_same_data() {
        let client = make_client();
        let other = DirectLoggingClient::new(client.controller());

        client
            .save(None, vec![LogMessage::new(LogLevel::Info, "shared")])
            .await
            .unwrap();

        let page = other.get_page_by_filter(None, None, None).await.unwrap();
        assert_eq!(page.data[0].message, "shared");
    }
}
