//! Service configuration.
//!
//! Configuration for the `plogd` process, loaded from TOML:
//!
//! ```toml
//! log_filter = "plog_service=info,tower_http=info"
//!
//! [service]
//! bind_addr = "0.0.0.0:8080"
//!
//! [persistence]
//! page_size = 10
//! max_page_size = 100
//! path = "/var/lib/plog/messages.jsonl"
//! ```

use std::net::SocketAddr;
use std::path::Path;

use plog_store::PersistenceConfig;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Configuration for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address to bind the HTTP server to (default `0.0.0.0:8080`).
    pub bind_addr: SocketAddr,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl ServiceConfig {
    /// Create a new configuration with the specified bind address.
    #[must_use]
    pub const fn new(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }
}

/// Complete configuration of the `plogd` process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlogdConfig {
    /// `tracing` filter directives used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Emit logs as JSON lines instead of text.
    pub json_logs: bool,
    /// HTTP service settings.
    pub service: ServiceConfig,
    /// Persistence settings.
    pub persistence: PersistenceConfig,
}

impl Default for PlogdConfig {
    fn default() -> Self {
        Self {
            log_filter: "plog_service=info,plog_store=info,tower_http=info".to_string(),
            json_logs: false,
            service: ServiceConfig::default(),
            persistence: PersistenceConfig::default(),
        }
    }
}

impl PlogdConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ServiceError::Config(format!(
                "failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, ServiceError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ServiceError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.persistence.page_size == 0 {
            return Err(ServiceError::Config(
                "persistence.page_size must be at least 1".to_string(),
            ));
        }
        if self.persistence.max_page_size < self.persistence.page_size {
            return Err(ServiceError::Config(format!(
                "persistence.max_page_size ({}) must not be below page_size ({})",
                self.persistence.max_page_size, self.persistence.page_size
            )));
        }
        if self.persistence.max_entries == Some(0) {
            return Err(ServiceError::Config(
                "persistence.max_entries must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}
