//! Persistence configuration.

use std::path::PathBuf;

use plog_proto::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// Configuration shared by every persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Page size used when a query omits `take` (default 10, at least 1).
    pub page_size: usize,
    /// Largest `take` honored; larger values are clamped (default 100).
    pub max_page_size: usize,
    /// Oldest entries are evicted beyond this many (default unbounded).
    pub max_entries: Option<usize>,
    /// JSON-lines file for durable storage; in-memory when absent.
    pub path: Option<PathBuf>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            max_entries: None,
            path: None,
        }
    }
}

impl PersistenceConfig {
    /// Sets the default page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the maximum page size.
    #[must_use]
    pub const fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Caps the number of retained entries.
    #[must_use]
    pub const fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Stores messages durably in the given file.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Default page size, never zero and never above the maximum.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1).min(self.effective_max_page_size())
    }

    /// Maximum page size, never zero.
    #[must_use]
    pub fn effective_max_page_size(&self) -> usize {
        self.max_page_size.max(1)
    }
}
