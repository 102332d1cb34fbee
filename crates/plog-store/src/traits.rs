//! Traits for log message persistence.
//!
//! This module provides the [`Persistence`] trait for abstracting over
//! different storage implementations (in-memory, file-based, etc.).

use std::sync::Arc;

use plog_proto::{DataPage, FilterParams, LogMessage, PagingParams, Result};

use crate::config::PersistenceConfig;
use crate::file_store::FilePersistence;
use crate::memory::MemoryPersistence;

/// Trait for log message storage backends.
///
/// Implementors must serialize writers against readers so that a query never
/// observes part of a `save` batch.
pub trait Persistence: Send + Sync {
    /// Appends messages in input order, assigning each a new identity.
    ///
    /// Messages without a time are stamped with the store's clock. No
    /// deduplication is performed.
    fn save(&self, messages: Vec<LogMessage>) -> Result<()>;

    /// Returns one page of messages matching the filter, newest first.
    ///
    /// An absent `take` uses the configured page size. `total` is computed only
    /// when `paging.count` is set.
    fn get_page_by_filter(
        &self,
        filter: &FilterParams,
        paging: &PagingParams,
    ) -> Result<DataPage<LogMessage>>;

    /// Removes every message, or only those carrying `correlation_id` when given.
    ///
    /// Clearing an empty store succeeds.
    fn clear(&self, correlation_id: Option<&str>) -> Result<()>;

    /// Returns the number of stored messages.
    fn len(&self) -> usize;

    /// Returns true if the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared persistence handle.
pub type SharedPersistence = Arc<dyn Persistence>;

/// Opens the backend selected by the configuration.
///
/// A configured `path` selects [`FilePersistence`], otherwise
/// [`MemoryPersistence`] is used.
pub fn open_persistence(config: PersistenceConfig) -> Result<SharedPersistence> {
    if config.path.is_some() {
        Ok(Arc::new(FilePersistence::open(config)?))
    } else {
        Ok(Arc::new(MemoryPersistence::new(config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plog_proto::LogLevel;
    use tempfile::TempDir;

    #[test]
    fn open_memory_by_default() {
        let store = open_persistence(PersistenceConfig::default()).unwrap();
        assert!(store.is_empty());

        store
            .save(vec![LogMessage::new(LogLevel::Info, "test")])
            .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn open_file_when_path_set() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("messages.jsonl");
        let store = open_persistence(PersistenceConfig::default().with_path(&path)).unwrap();

        store
            .save(vec![LogMessage::new(LogLevel::Info, "test")])
            .unwrap();
        assert!(path.exists());
    }
}
