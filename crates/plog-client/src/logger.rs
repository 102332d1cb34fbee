//! Severity-gated buffering logger.
//!
//! [`Logger`] collects entries in memory and hands them to a
//! [`LoggingClient`] in batches when [`Logger::dump`] is called, either by
//! the application or by the background task started with
//! [`Logger::spawn_dump_task`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use plog_proto::{ErrorDescription, LogLevel, LogMessage, Result};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::LoggingClient;
use crate::config::LoggerConfig;

/// Buffering front end over any [`LoggingClient`].
///
/// `log` never fails and never blocks on the network. Entries are kept in
/// order until `dump` forwards them. A failed dump puts the batch back at the
/// front of the buffer, bounded by `max_buffer_size`.
pub struct Logger<C> {
    client: C,
    level: AtomicU8,
    source: Option<String>,
    max_buffer_size: usize,
    buffer: Mutex<VecDeque<LogMessage>>,
}

impl<C> std::fmt::Debug for Logger<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("source", &self.source)
            .field("buffered", &self.buffered())
            .finish_non_exhaustive()
    }
}

impl<C> Logger<C> {
    /// Create a logger with default settings.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self::with_config(client, LoggerConfig::default())
    }

    /// Create a logger from explicit settings.
    #[must_use]
    pub fn with_config(client: C, config: LoggerConfig) -> Self {
        Self {
            client,
            level: AtomicU8::new(config.log_level.code()),
            source: config.source,
            max_buffer_size: config.max_buffer_size.max(1),
            buffer: Mutex::new(VecDeque::new()),
        }
    }

    /// Get the client batches are sent to.
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Source attached to every entry.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Current severity threshold.
    pub fn level(&self) -> LogLevel {
        LogLevel::from_code(self.level.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Change the severity threshold; takes effect for subsequent calls.
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level.code(), Ordering::Relaxed);
    }

    /// Number of entries waiting for the next dump.
    pub fn buffered(&self) -> usize {
        self.buffer.lock().len()
    }

    /// Buffer an entry if `level` passes the threshold.
    ///
    /// Entries at `Nothing` or more verbose than the threshold are discarded.
    pub fn log(
        &self,
        level: LogLevel,
        correlation_id: Option<&str>,
        error: Option<ErrorDescription>,
        message: impl Into<String>,
    ) {
        if !self.level().admits(level) {
            return;
        }

        let mut entry = LogMessage::new(level, message).with_time(Utc::now());
        entry.source.clone_from(&self.source);
        entry.correlation_id = correlation_id.map(str::to_string);
        entry.error = error;

        let mut buffer = self.buffer.lock();
        buffer.push_back(entry);
        let dropped = trim_front(&mut buffer, self.max_buffer_size);
        drop(buffer);

        if dropped > 0 {
            warn!(dropped, "log buffer full, dropped oldest entries");
        }
    }

    /// Log at `Fatal`.
    pub fn fatal(
        &self,
        correlation_id: Option<&str>,
        error: Option<ErrorDescription>,
        message: impl Into<String>,
    ) {
        self.log(LogLevel::Fatal, correlation_id, error, message);
    }

    /// Log at `Error`.
    pub fn error(
        &self,
        correlation_id: Option<&str>,
        error: Option<ErrorDescription>,
        message: impl Into<String>,
    ) {
        self.log(LogLevel::Error, correlation_id, error, message);
    }

    /// Log at `Warn`.
    pub fn warn(
        &self,
        correlation_id: Option<&str>,
        error: Option<ErrorDescription>,
        message: impl Into<String>,
    ) {
        self.log(LogLevel::Warn, correlation_id, error, message);
    }

    /// Log at `Info`.
    pub fn info(
        &self,
        correlation_id: Option<&str>,
        error: Option<ErrorDescription>,
        message: impl Into<String>,
    ) {
        self.log(LogLevel::Info, correlation_id, error, message);
    }

    /// Log at `Debug`.
    pub fn debug(
        &self,
        correlation_id: Option<&str>,
        error: Option<ErrorDescription>,
        message: impl Into<String>,
    ) {
        self.log(LogLevel::Debug, correlation_id, error, message);
    }

    /// Log at `Trace`.
    pub fn trace(
        &self,
        correlation_id: Option<&str>,
        error: Option<ErrorDescription>,
        message: impl Into<String>,
    ) {
        self.log(LogLevel::Trace, correlation_id, error, message);
    }

    fn requeue(&self, batch: Vec<LogMessage>) -> usize {
        let mut buffer = self.buffer.lock();
        for entry in batch.into_iter().rev() {
            buffer.push_front(entry);
        }
        trim_front(&mut buffer, self.max_buffer_size)
    }
}

impl<C: LoggingClient> Logger<C> {
    /// Send everything buffered so far to the client as one batch.
    ///
    /// Entries logged while the batch is in flight stay buffered for the next
    /// dump. On failure the batch is put back ahead of them and the error is
    /// returned. If the returned future is dropped before the client answers,
    /// for example by a timeout or an aborted task, the batch is put back too.
    pub async fn dump(&self) -> Result<()> {
        let batch: Vec<LogMessage> = std::mem::take(&mut *self.buffer.lock()).into();
        if batch.is_empty() {
            return Ok(());
        }

        let count = batch.len();
        let in_flight = InFlight {
            logger: self,
            batch: Some(batch.clone()),
        };
        match self.client.save(None, batch).await {
            Ok(()) => {
                in_flight.delivered();
                debug!(count, "dumped log buffer");
                Ok(())
            }
            Err(e) => {
                let dropped = in_flight.requeue();
                warn!(count, dropped, error = %e, "failed to dump log buffer, entries re-queued");
                Err(e)
            }
        }
    }

    /// Final dump before the logger goes away.
    pub async fn close(&self) -> Result<()> {
        self.dump().await
    }
}

impl<C: LoggingClient + 'static> Logger<C> {
    /// Dump the buffer every `period` on a background task.
    ///
    /// Failed dumps are logged and retried on the next tick. The task stops
    /// when the returned handle is dropped or [`DumpTask::stop`] is called; a
    /// batch that was in flight at that moment goes back into the buffer.
    pub fn spawn_dump_task(self: &Arc<Self>, period: Duration) -> DumpTask {
        let logger = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = logger.dump().await {
                    debug!(error = %e, "background dump failed");
                }
            }
        });
        DumpTask { handle }
    }
}

/// Handle of a background dump task.
#[derive(Debug)]
pub struct DumpTask {
    handle: JoinHandle<()>,
}

impl DumpTask {
    /// Stop the task.
    pub fn stop(self) {
        self.handle.abort();
    }

    /// Whether the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DumpTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A batch handed to the client, put back into the buffer unless delivered.
struct InFlight<'a, C> {
    logger: &'a Logger<C>,
    batch: Option<Vec<LogMessage>>,
}

impl<C> InFlight<'_, C> {
    fn delivered(mut self) {
        self.batch = None;
    }

    fn requeue(mut self) -> usize {
        self.batch
            .take()
            .map_or(0, |batch| self.logger.requeue(batch))
    }
}

impl<C> Drop for InFlight<'_, C> {
    fn drop(&mut self) {
        if let Some(batch) = self.batch.take() {
            let count = batch.len();
            let dropped = self.logger.requeue(batch);
            warn!(count, dropped, "log dump interrupted, entries re-queued");
        }
    }
}

fn trim_front(buffer: &mut VecDeque<LogMessage>, max: usize) -> usize {
    let excess = buffer.len().saturating_sub(max);
    buffer.drain(..excess);
    excess
}
