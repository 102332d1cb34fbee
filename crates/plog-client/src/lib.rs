//! # plog-client
//!
//! Client side of plog: a severity-gated buffering [`Logger`] over any
//! [`LoggingClient`] transport.
//!
//! Two transports are provided:
//!
//! - [`DirectLoggingClient`] calls a [`plog_service::LoggingController`] in-process
//! - [`HttpLoggingClient`] talks to a remote `plogd` over HTTP
//!
//! Both observe the same behavior; the HTTP client can additionally fail with
//! connectivity or serialization errors.
//!
//! ## Example
//!
//! ```rust,no_run
//! use plog_client::{ConnectionConfig, HttpLoggingClient, Logger, LoggingClient};
//! use plog_proto::LogLevel;
//!
//! #[tokio::main]
//! async fn main() -> plog_proto::Result<()> {
//!     let client = HttpLoggingClient::new(ConnectionConfig::new("localhost", 8080))?;
//!     let logger = Logger::new(client);
//!     logger.set_level(LogLevel::Debug);
//!
//!     logger.info(Some("req-1"), None, "user signed in");
//!     logger.dump().await?;
//!
//!     let page = logger.client().get_page_by_filter(None, None, None).await?;
//!     println!("{} entries", page.len());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod direct;
pub mod http;
pub mod logger;

pub use client::LoggingClient;
pub use config::{ClientConfig, ConfigError, ConnectionConfig, LoggerConfig, DEFAULT_MAX_BUFFER_SIZE};
pub use direct::DirectLoggingClient;
pub use http::HttpLoggingClient;
pub use logger::{DumpTask, Logger};
