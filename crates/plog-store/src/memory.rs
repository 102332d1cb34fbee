//! In-memory log message storage.
//!
//! The reference [`Persistence`] implementation: an append-only vector of
//! [`StoredMessage`]s behind a single-writer/multi-reader lock.

use chrono::Utc;
use parking_lot::RwLock;
use plog_proto::{DataPage, FilterParams, LogMessage, PagingParams, Result};
use tracing::debug;

use crate::config::PersistenceConfig;
use crate::page::{select_page, StoredMessage};
use crate::traits::Persistence;

struct Inner {
    /// All messages, ordered by insertion
    records: Vec<StoredMessage>,
    /// Next identity to assign
    next_id: u64,
}

/// Thread-safe in-memory message store.
pub struct MemoryPersistence {
    config: PersistenceConfig,
    inner: RwLock<Inner>,
}

impl Default for MemoryPersistence {
    fn default() -> Self {
        Self::new(PersistenceConfig::default())
    }
}

impl MemoryPersistence {
    /// Creates an empty store.
    #[must_use]
    pub fn new(config: PersistenceConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(Inner {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    /// Returns a snapshot of every stored record in insertion order.
    #[must_use]
    pub fn records(&self) -> Vec<StoredMessage> {
        self.inner.read().records.clone()
    }
}

impl Persistence for MemoryPersistence {
    #[allow(clippy::significant_drop_tightening)]
    fn save(&self, messages: Vec<LogMessage>) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let count = messages.len();
        let mut inner = self.inner.write();

        for message in messages {
            let id = inner.next_id;
            inner.next_id += 1;
            inner.records.push(StoredMessage::new(id, message, now));
        }

        if let Some(max) = self.config.max_entries {
            let excess = inner.records.len().saturating_sub(max);
            if excess > 0 {
                inner.records.drain(..excess);
                debug!(evicted = excess, "evicted oldest log messages");
            }
        }

        debug!(count, total = inner.records.len(), "stored log messages");
        Ok(())
    }

    fn get_page_by_filter(
        &self,
        filter: &FilterParams,
        paging: &PagingParams,
    ) -> Result<DataPage<LogMessage>> {
        let window = paging.resolve(
            self.config.effective_page_size(),
            self.config.effective_max_page_size(),
        )?;
        let inner = self.inner.read();
        Ok(select_page(&inner.records, filter, window))
    }

    fn clear(&self, correlation_id: Option<&str>) -> Result<()> {
        let mut inner = self.inner.write();
        match correlation_id {
            None => inner.records.clear(),
            Some(id) => inner
                .records
                .retain(|r| r.message.correlation_id.as_deref() != Some(id)),
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.inner.read().records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use plog_proto::LogLevel;
    use std::sync::Arc;

    fn make_message(level: LogLevel, message: &str) -> LogMessage {
        LogMessage::new(level, message).with_time(Utc::now())
    }

    #[test]
    fn save_assigns_increasing_ids() {
        let store = MemoryPersistence::default();
        store
            .save(vec![
                make_message(LogLevel::Info, "first"),
                make_message(LogLevel::Info, "second"),
            ])
            .unwrap();
        store.save(vec![make_message(LogLevel::Info, "third")]).unwrap();

        let ids: Vec<u64> = store.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn save_stamps_missing_time() {
        let store = MemoryPersistence::default();
        store
            .save(vec![LogMessage::new(LogLevel::Info, "untimed")])
            .unwrap();
        assert!(store.records()[0].message.time.is_some());
    }

    #[test]
    fn save_does_not_deduplicate() {
        let store = MemoryPersistence::default();
        let msg = make_message(LogLevel::Info, "same");
        store.save(vec![msg.clone(), msg]).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn query_returns_newest_first() {
        let store = MemoryPersistence::default();
        let base = Utc::now();
        store
            .save(vec![
                LogMessage::new(LogLevel::Info, "first").with_time(base),
                LogMessage::new(LogLevel::Info, "third").with_time(base + Duration::seconds(2)),
                LogMessage::new(LogLevel::Info, "second").with_time(base + Duration::seconds(1)),
            ])
            .unwrap();

        let page = store
            .get_page_by_filter(&FilterParams::new(), &PagingParams::default())
            .unwrap();

        assert_eq!(page.data.len(), 3);
        assert_eq!(page.data[0].message, "third");
        assert_eq!(page.data[1].message, "second");
        assert_eq!(page.data[2].message, "first");
    }

    #[test]
    fn query_default_take_is_page_size() {
        let store = MemoryPersistence::new(PersistenceConfig::default().with_page_size(4));
        let batch = (0..10)
            .map(|i| make_message(LogLevel::Info, &format!("message {i}")))
            .collect();
        store.save(batch).unwrap();

        let page = store
            .get_page_by_filter(&FilterParams::new(), &PagingParams::default().with_count(true))
            .unwrap();
        assert_eq!(page.data.len(), 4);
        assert_eq!(page.total, Some(10));
    }

    #[test]
    fn query_with_filter() {
        let store = MemoryPersistence::default();
        store
            .save(vec![
                make_message(LogLevel::Info, "info message"),
                make_message(LogLevel::Error, "error message"),
                make_message(LogLevel::Warn, "warn message"),
            ])
            .unwrap();

        let filter = FilterParams::new().with_level(LogLevel::Error);
        let page = store
            .get_page_by_filter(&filter, &PagingParams::default())
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].level, LogLevel::Error);
    }

    #[test]
    fn query_rejects_negative_skip() {
        let store = MemoryPersistence::default();
        let result = store.get_page_by_filter(&FilterParams::new(), &PagingParams::new(-1, 5));
        assert!(result.is_err());
    }

    #[test]
    fn clear_all_is_idempotent() {
        let store = MemoryPersistence::default();
        store.save(vec![make_message(LogLevel::Info, "test")]).unwrap();

        store.clear(None).unwrap();
        assert!(store.is_empty());
        store.clear(None).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn clear_scoped_by_correlation_id() {
        let store = MemoryPersistence::default();
        store
            .save(vec![
                make_message(LogLevel::Info, "a").with_correlation_id("keep"),
                make_message(LogLevel::Info, "b").with_correlation_id("drop"),
                make_message(LogLevel::Info, "c"),
            ])
            .unwrap();

        store.clear(Some("drop")).unwrap();

        let remaining: Vec<String> = store.records().into_iter().map(|r| r.message.message).collect();
        assert_eq!(remaining, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn enforces_max_entries() {
        let store = MemoryPersistence::new(PersistenceConfig::default().with_max_entries(5));
        for i in 0..10 {
            store
                .save(vec![make_message(LogLevel::Info, &format!("message {i}"))])
                .unwrap();
        }

        assert_eq!(store.len(), 5);
        let records = store.records();
        assert_eq!(records[0].message.message, "message 5");
        assert_eq!(records[4].message.message, "message 9");
    }

    #[test]
    fn ids_keep_increasing_after_clear() {
        let store = MemoryPersistence::default();
        store.save(vec![make_message(LogLevel::Info, "a")]).unwrap();
        store.clear(None).unwrap();
        store.save(vec![make_message(LogLevel::Info, "b")]).unwrap();
        assert_eq!(store.records()[0].id, 2);
    }

    #[test]
    fn concurrent_batches_are_never_split() {
        let store = Arc::new(MemoryPersistence::default());
        let writers: Vec<_> = (0..8)
            .map(|w| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for b in 0..20 {
                        let batch = (0..5)
                            .map(|i| make_message(LogLevel::Info, &format!("w{w}-b{b}-{i}")))
                            .collect();
                        store.save(batch).unwrap();
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            assert_eq!(store.len() % 5, 0);
        }
        for writer in writers {
            writer.join().unwrap();
        }
        assert_eq!(store.len(), 8 * 20 * 5);
    }
}
