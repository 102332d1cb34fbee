//! # plog-proto
//!
//! Shared contract between plog clients and the plog logging service.
//!
//! This crate provides:
//!
//! - [`LogLevel`] - Severity levels (Nothing, Fatal, Error, Warn, Info, Debug, Trace)
//! - [`LogMessage`] - A single structured log entry
//! - [`ErrorDescription`] - Structured error attached to a log entry
//! - [`FilterParams`] / [`PagingParams`] - Query criteria and paging window
//! - [`DataPage`] - One page of query results
//! - [`wire`] - Request/response bodies exchanged over HTTP
//! - [`LoggingError`] - Error kinds shared by every transport
//!
//! ## Example
//!
//! ```rust
//! use plog_proto::{FilterParams, LogLevel, LogMessage};
//!
//! let message = LogMessage::new(LogLevel::Warn, "disk space low")
//!     .with_source("storage")
//!     .with_correlation_id("req-42");
//!
//! let filter = FilterParams::new().with_max_level(LogLevel::Warn);
//! assert!(message.matches(&filter));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod level;
pub mod message;
pub mod query;
pub mod wire;

pub use error::{BoxError, LoggingError, Result};
pub use level::{deserialize_lenient, LogLevel};
pub use message::{ErrorDescription, LogMessage};
pub use query::{DataPage, FilterParams, PageWindow, PagingParams, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use wire::{ClearRequest, ErrorBody, ReadRequest};
