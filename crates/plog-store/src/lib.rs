//! # plog-store
//!
//! Persistence backends for plog log messages.
//!
//! This crate provides:
//!
//! - [`Persistence`] - Abstract trait every backend implements
//! - [`MemoryPersistence`] - Reference in-memory backend
//! - [`FilePersistence`] - Durable JSON-lines backend
//! - [`PersistenceConfig`] - Page sizes and backend selection
//!
//! Both backends share the same filter, ordering and paging rules: matches are
//! sorted newest first by time, ties broken by insertion order (newest first),
//! then `skip` and `take` are applied.
//!
//! ## Example
//!
//! ```rust
//! use plog_proto::{FilterParams, LogLevel, LogMessage, PagingParams};
//! use plog_store::{MemoryPersistence, Persistence};
//!
//! let store = MemoryPersistence::default();
//! store.save(vec![LogMessage::new(LogLevel::Info, "started")])?;
//!
//! let page = store.get_page_by_filter(&FilterParams::new(), &PagingParams::default())?;
//! assert_eq!(page.data.len(), 1);
//! # Ok::<(), plog_proto::LoggingError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod file_store;
pub mod memory;
pub mod page;
pub mod traits;

pub use config::PersistenceConfig;
pub use file_store::FilePersistence;
pub use memory::MemoryPersistence;
pub use page::StoredMessage;
pub use traits::{open_persistence, Persistence, SharedPersistence};
