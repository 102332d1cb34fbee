//! Client configuration.
//!
//! Configuration for a logging client process, loaded from TOML:
//!
//! ```toml
//! log_level = "debug"
//! source = "billing-api"
//! max_buffer_size = 5000
//!
//! [connection]
//! host = "logs.internal"
//! port = 8080
//! timeout_ms = 2000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use plog_proto::LogLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of entries a logger keeps buffered.
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 10_000;

/// Errors raised while loading client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML could not be parsed.
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where the remote logging service lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Service host name or IP address (default `localhost`).
    pub host: String,
    /// Service port (default 8080).
    pub port: u16,
    /// Per-request timeout in milliseconds (default 5000).
    pub timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            timeout_ms: 5_000,
        }
    }
}

impl ConnectionConfig {
    /// Create a connection config for `host:port` with the default timeout.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base URL of the service, e.g. `http://localhost:8080`.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    /// Validate the connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is empty or the timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("connection.host must not be empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "connection.timeout_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings of a [`crate::Logger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Initial severity threshold (default `Info`). Names are matched
    /// case-insensitively and the codes `0..=6` are accepted.
    #[serde(deserialize_with = "plog_proto::deserialize_lenient")]
    pub log_level: LogLevel,
    /// Source attached to every message this logger creates.
    pub source: Option<String>,
    /// Maximum number of buffered entries; the oldest are dropped beyond it.
    pub max_buffer_size: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            source: None,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }
}

impl LoggerConfig {
    /// Set the initial threshold.
    #[must_use]
    pub const fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Set the message source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the buffer bound.
    #[must_use]
    pub const fn with_max_buffer_size(mut self, size: usize) -> Self {
        self.max_buffer_size = size;
        self
    }

    /// Validate the logger settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer bound is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "max_buffer_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete client configuration: logger settings plus remote connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Logger settings, flattened at the top level.
    #[serde(flatten)]
    pub logger: LoggerConfig,
    /// Remote service connection.
    #[serde(default)]
    pub connection: ConnectionConfig,
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a value is out of range.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.connection.validate()
    }
}
