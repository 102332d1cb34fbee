//! Filtering, ordering and paging shared by every backend.

use chrono::{DateTime, Utc};
use plog_proto::{DataPage, FilterParams, LogMessage, PageWindow};
use serde::{Deserialize, Serialize};

/// A persisted message with its store-assigned identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Monotonically increasing identity, used to break time ties
    pub id: u64,
    /// The message itself
    #[serde(flatten)]
    pub message: LogMessage,
}

impl StoredMessage {
    /// Wraps a message, stamping it with `now` if it has no time yet.
    #[must_use]
    pub fn new(id: u64, mut message: LogMessage, now: DateTime<Utc>) -> Self {
        message.time.get_or_insert(now);
        Self { id, message }
    }
}

/// Selects one page of matching messages.
///
/// Matches are ordered by time descending, then by identity descending, so
/// the most recently inserted of two equally timed messages comes first.
pub fn select_page<'a, I>(records: I, filter: &FilterParams, window: PageWindow) -> DataPage<LogMessage>
where
    I: IntoIterator<Item = &'a StoredMessage>,
{
    let mut matches: Vec<&StoredMessage> = records
        .into_iter()
        .filter(|r| r.message.matches(filter))
        .collect();

    matches.sort_unstable_by(|a, b| {
        b.message
            .time
            .cmp(&a.message.time)
            .then_with(|| b.id.cmp(&a.id))
    });

    let total = window.count.then_some(matches.len() as u64);
    let data = matches
        .into_iter()
        .skip(window.skip)
        .take(window.take)
        .map(|r| r.message.clone())
        .collect();

    DataPage::new(data, total)
}
