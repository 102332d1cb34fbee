//! Test helpers for E2E tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use plog_client::{ConnectionConfig, DirectLoggingClient, HttpLoggingClient, Logger, LoggerConfig};
use plog_proto::{LogLevel, LogMessage};
use plog_service::{bind, LoggingController, LoggingHttpService, ServiceConfig};
use plog_store::{MemoryPersistence, SharedPersistence};

/// Default request timeout for test clients.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Logging service on an ephemeral port that manages its own lifecycle.
pub struct TestService {
    pub addr: SocketAddr,
    pub controller: Arc<LoggingController>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestService {
    /// Start a service over a fresh in-memory store.
    pub async fn start() -> Self {
        Self::start_with(Arc::new(MemoryPersistence::default())).await
    }

    /// Start a service over the given store.
    pub async fn start_with(persistence: SharedPersistence) -> Self {
        Self::start_at(SocketAddr::from(([127, 0, 0, 1], 0)), persistence).await
    }

    /// Start a service on a specific address over the given store.
    pub async fn start_at(addr: SocketAddr, persistence: SharedPersistence) -> Self {
        let (listener, addr) = bind(addr).await.unwrap();
        let controller = Arc::new(LoggingController::new(persistence));
        let service = LoggingHttpService::new(ServiceConfig::new(addr), controller.clone());

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = service.serve_listener(listener, shutdown).await {
                eprintln!("Service error: {e}");
            }
        });

        Self {
            addr,
            controller,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// HTTP client pointed at this service.
    pub fn http_client(&self) -> HttpLoggingClient {
        HttpLoggingClient::new(
            ConnectionConfig::new("127.0.0.1", self.addr.port())
                .with_timeout_ms(TEST_TIMEOUT.as_millis() as u64),
        )
        .unwrap()
    }

    /// Direct client sharing this service's controller.
    pub fn direct_client(&self) -> DirectLoggingClient {
        DirectLoggingClient::new(self.controller.clone())
    }

    /// Shut the service down and wait for it to stop.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = tokio::time::timeout(TEST_TIMEOUT, handle).await;
        }
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Direct client over its own fresh in-memory store.
pub fn standalone_direct_client() -> DirectLoggingClient {
    let store = Arc::new(MemoryPersistence::default());
    DirectLoggingClient::new(Arc::new(LoggingController::new(store)))
}

/// Logger admitting every level, tagged with a test source.
pub fn trace_logger<C>(client: C) -> Logger<C> {
    Logger::with_config(
        client,
        LoggerConfig::default()
            .with_log_level(LogLevel::Trace)
            .with_source("e2e"),
    )
}

/// Fixed timestamp `minutes` after a reference instant.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

/// A deterministic batch with explicit times, sources and correlation ids.
pub fn sample_batch() -> Vec<LogMessage> {
    vec![
        LogMessage::new(LogLevel::Fatal, "process exiting")
            .with_time(at(0))
            .with_source("worker")
            .with_correlation_id("job-1"),
        LogMessage::new(LogLevel::Error, "payment declined")
            .with_time(at(1))
            .with_source("billing")
            .with_correlation_id("req-1")
            .with_error(plog_proto::ErrorDescription::new("CardError", "insufficient funds").with_code("402")),
        LogMessage::new(LogLevel::Warn, "slow query")
            .with_time(at(2))
            .with_source("db")
            .with_correlation_id("req-1"),
        LogMessage::new(LogLevel::Info, "user signed in")
            .with_time(at(3))
            .with_source("auth"),
        LogMessage::new(LogLevel::Debug, "cache miss")
            .with_time(at(3))
            .with_source("cache"),
        LogMessage::new(LogLevel::Trace, "entering handler")
            .with_time(at(4))
            .with_source("billing")
            .with_correlation_id("req-2"),
    ]
}
