//! # plog-service
//!
//! Logging controller and HTTP service.
//!
//! The [`LoggingController`] validates, timestamps and forwards log batches to
//! a [`plog_store::Persistence`] backend. [`LoggingHttpService`] exposes the
//! controller over HTTP using axum; the `plogd` binary wires both together
//! from a TOML configuration.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use plog_service::{LoggingController, LoggingHttpService, ServiceConfig};
//! use plog_store::MemoryPersistence;
//!
//! #[tokio::main]
//! async fn main() {
//!     let controller = Arc::new(LoggingController::new(Arc::new(MemoryPersistence::default())));
//!     let service = LoggingHttpService::new(ServiceConfig::default(), controller);
//!     // service.serve().await.unwrap();
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/v1/logging/save` | POST | Persist a JSON array of messages |
//! | `/v1/logging/read` | POST | Filtered, paged read |
//! | `/v1/logging/clear` | POST | Remove all or correlation-scoped messages |
//! | `/health` | GET | Liveness probe |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use config::{PlogdConfig, ServiceConfig};
pub use controller::LoggingController;
pub use error::{ServiceError, ServiceResult};
pub use routes::create_router;
pub use server::{bind, LoggingHttpService};
