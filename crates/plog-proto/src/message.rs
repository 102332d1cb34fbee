//! Structured log messages.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::level::LogLevel;
use crate::query::FilterParams;

/// Structured description of an error attached to a log message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescription {
    /// Error type or category
    #[serde(rename = "type")]
    pub kind: String,
    /// Application-specific error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable error message
    pub message: String,
    /// Chain of underlying causes, outermost first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    /// Captured stack trace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

impl ErrorDescription {
    /// Creates a description with the given type and message.
    #[must_use]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            code: None,
            message: message.into(),
            cause: None,
            stack_trace: None,
        }
    }

    /// Describes a Rust error, walking its `source()` chain into `cause`.
    ///
    /// A stack trace is attached when backtraces are enabled for the process.
    #[must_use]
    pub fn from_error<E: StdError>(err: &E) -> Self {
        let full_name = std::any::type_name::<E>();
        let base = full_name.split('<').next().unwrap_or(full_name);
        let kind = base.rsplit("::").next().unwrap_or(base);

        let mut causes = Vec::new();
        let mut current = err.source();
        while let Some(source) = current {
            causes.push(source.to_string());
            current = source.source();
        }

        let backtrace = Backtrace::capture();
        let stack_trace =
            (backtrace.status() == BacktraceStatus::Captured).then(|| backtrace.to_string());

        Self {
            kind: kind.to_string(),
            code: None,
            message: err.to_string(),
            cause: (!causes.is_empty()).then(|| causes.join(": ")),
            stack_trace,
        }
    }

    /// Sets the error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the cause description.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    fn contains_lowercase(&self, needle: &str) -> bool {
        self.kind.to_lowercase().contains(needle)
            || self.message.to_lowercase().contains(needle)
            || self
                .cause
                .as_ref()
                .is_some_and(|c| c.to_lowercase().contains(needle))
    }
}

/// One log entry.
///
/// Messages are immutable once persisted: the service only appends, queries
/// and clears them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    /// When the entry was created; assigned by the service when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    /// Component or service that produced the entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Severity level
    pub level: LogLevel,
    /// Request or trace identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Structured error, usually on Fatal and Error entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDescription>,
    /// The log message
    pub message: String,
}

impl LogMessage {
    /// Creates a message with the given level and text and no other fields.
    #[must_use]
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            time: None,
            source: None,
            level,
            correlation_id: None,
            error: None,
            message: message.into(),
        }
    }

    /// Sets the timestamp.
    #[must_use]
    pub const fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the correlation ID.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Attaches an error description.
    #[must_use]
    pub fn with_error(mut self, error: ErrorDescription) -> Self {
        self.error = Some(error);
        self
    }

    /// Checks if this message satisfies every criterion present in the filter.
    #[must_use]
    pub fn matches(&self, filter: &FilterParams) -> bool {
        if let Some(level) = filter.level {
            if self.level != level {
                return false;
            }
        }
        if let Some(min) = filter.min_level {
            if self.level < min {
                return false;
            }
        }
        if let Some(max) = filter.max_level {
            if self.level > max {
                return false;
            }
        }
        if filter.errors_only == Some(true)
            && (self.level == LogLevel::Nothing || self.level > LogLevel::Error)
        {
            return false;
        }

        if let Some(ref wanted) = filter.source {
            let wanted = wanted.to_lowercase();
            let found = self
                .source
                .as_ref()
                .is_some_and(|s| s.to_lowercase().contains(&wanted));
            if !found {
                return false;
            }
        }

        if let Some(ref wanted) = filter.correlation_id {
            if self.correlation_id.as_deref() != Some(wanted.as_str()) {
                return false;
            }
        }

        // Time bounds are inclusive; an untimed message never satisfies a bound.
        if filter.from_time.is_some() || filter.to_time.is_some() {
            let Some(time) = self.time else {
                return false;
            };
            if filter.from_time.is_some_and(|from| time < from) {
                return false;
            }
            if filter.to_time.is_some_and(|to| time > to) {
                return false;
            }
        }

        if let Some(ref search) = filter.search {
            let needle = search.to_lowercase();
            let hit = self.message.to_lowercase().contains(&needle)
                || self
                    .source
                    .as_ref()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
                || self
                    .correlation_id
                    .as_ref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
                || self
                    .error
                    .as_ref()
                    .is_some_and(|e| e.contains_lowercase(&needle));
            if !hit {
                return false;
            }
        }

        true
    }
}
