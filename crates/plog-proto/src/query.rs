//! Query criteria, paging and result pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LoggingError, Result};
use crate::level::LogLevel;

/// Page size used when a query does not specify `take`.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Upper bound applied to `take`.
pub const MAX_PAGE_SIZE: usize = 100;

/// Filter criteria for querying log messages.
///
/// Every criterion is optional; present criteria are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Case-insensitive text search over message, source, correlation ID and error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    /// Least verbose level admitted (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<LogLevel>,
    /// Most verbose level admitted (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_level: Option<LogLevel>,
    /// Only Fatal and Error entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors_only: Option<bool>,
    /// Case-insensitive substring of the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Exact correlation ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Earliest time (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_time: Option<DateTime<Utc>>,
    /// Latest time (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_time: Option<DateTime<Utc>>,
}

impl FilterParams {
    /// Creates a new empty filter that matches all messages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text search.
    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Requires an exact level.
    #[must_use]
    pub const fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the least verbose level admitted.
    #[must_use]
    pub const fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Sets the most verbose level admitted.
    #[must_use]
    pub const fn with_max_level(mut self, level: LogLevel) -> Self {
        self.max_level = Some(level);
        self
    }

    /// Restricts results to Fatal and Error entries.
    #[must_use]
    pub const fn with_errors_only(mut self, errors_only: bool) -> Self {
        self.errors_only = Some(errors_only);
        self
    }

    /// Adds a source filter.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a correlation ID filter.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Adds inclusive time bounds.
    #[must_use]
    pub const fn with_time_range(
        mut self,
        from_time: Option<DateTime<Utc>>,
        to_time: Option<DateTime<Utc>>,
    ) -> Self {
        self.from_time = from_time;
        self.to_time = to_time;
        self
    }
}

/// Paging requested by a caller.
///
/// Values are kept signed so that out-of-range input from the wire can be
/// validated rather than failing to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingParams {
    /// Number of matching entries to skip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<i64>,
    /// Maximum number of entries to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<i64>,
    /// Whether to compute the total number of matches
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub count: bool,
}

/// Validated paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Entries to skip
    pub skip: usize,
    /// Entries to return
    pub take: usize,
    /// Whether to compute the total
    pub count: bool,
}

impl PagingParams {
    /// Creates paging with explicit skip and take.
    #[must_use]
    pub const fn new(skip: i64, take: i64) -> Self {
        Self {
            skip: Some(skip),
            take: Some(take),
            count: false,
        }
    }

    /// Requests the total match count.
    #[must_use]
    pub const fn with_count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    /// Validates the paging values against the given page sizes.
    ///
    /// An absent `take` becomes `default_take`. A negative `take` is clamped to
    /// zero and a `take` above `max_take` to `max_take`. A negative `skip` is
    /// rejected since there is no safe default for it.
    pub fn resolve(&self, default_take: usize, max_take: usize) -> Result<PageWindow> {
        let skip = match self.skip {
            None => 0,
            Some(skip) if skip < 0 => {
                return Err(LoggingError::Validation(format!(
                    "skip must not be negative, got {skip}"
                )));
            }
            Some(skip) => usize::try_from(skip).unwrap_or(usize::MAX),
        };

        let take = match self.take {
            None => default_take,
            Some(take) if take < 0 => 0,
            Some(take) => usize::try_from(take).unwrap_or(usize::MAX),
        };

        Ok(PageWindow {
            skip,
            take: take.min(max_take),
            count: self.count,
        })
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPage<T> {
    /// Entries in the page, newest first
    pub data: Vec<T>,
    /// Total number of matches, present only when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl<T> DataPage<T> {
    /// Creates a page.
    #[must_use]
    pub const fn new(data: Vec<T>, total: Option<u64>) -> Self {
        Self { data, total }
    }

    /// Number of entries in the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the page holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Default for DataPage<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total: None,
        }
    }
}
