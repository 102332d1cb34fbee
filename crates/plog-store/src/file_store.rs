//! File-based log message storage.
//!
//! Messages are appended to a JSON-lines file, one [`StoredMessage`] per line,
//! and mirrored in memory for queries. Whenever the file is rewritten it
//! starts with a sequence record holding the next identity, so identities keep
//! increasing across restarts even after everything was cleared.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::RwLock;
use plog_proto::{DataPage, FilterParams, LogMessage, LoggingError, PagingParams, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::PersistenceConfig;
use crate::page::{select_page, StoredMessage};
use crate::traits::Persistence;

/// First line of a rewritten file.
#[derive(Debug, Serialize, Deserialize)]
struct SequenceRecord {
    next_id: u64,
}

struct FileState {
    records: Vec<StoredMessage>,
    next_id: u64,
}

/// Durable JSON-lines message store.
pub struct FilePersistence {
    config: PersistenceConfig,
    path: PathBuf,
    state: RwLock<FileState>,
}

impl FilePersistence {
    /// Opens (or creates) the store at `config.path`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if no path is configured or the file cannot be
    /// read. Lines that fail to parse are skipped with a warning.
    pub fn open(config: PersistenceConfig) -> Result<Self> {
        let path = config.path.clone().ok_or_else(|| LoggingError::Storage {
            message: "file persistence requires a path".to_string(),
            source: None,
        })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let (records, persisted_next) = if path.exists() {
            Self::load(&path)?
        } else {
            (Vec::new(), 1)
        };
        let next_id = records
            .iter()
            .map(|r| r.id + 1)
            .max()
            .unwrap_or(1)
            .max(persisted_next);

        info!(path = %path.display(), records = records.len(), next_id, "opened file persistence");

        let mut store = Self {
            config,
            path,
            state: RwLock::new(FileState { records, next_id }),
        };
        store.trim_loaded();
        Ok(store)
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<(Vec<StoredMessage>, u64)> {
        let reader = BufReader::new(File::open(path)?);
        let mut records = Vec::new();
        let mut next_id = 1;

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredMessage>(&line) {
                Ok(record) => records.push(record),
                Err(e) => match serde_json::from_str::<SequenceRecord>(&line) {
                    Ok(sequence) => next_id = next_id.max(sequence.next_id),
                    Err(_) => warn!(line = number + 1, error = %e, "skipping unreadable log record"),
                },
            }
        }

        Ok((records, next_id))
    }

    fn trim_loaded(&mut self) {
        let state = self.state.get_mut();
        Self::evict(&self.config, &self.path, state);
    }

    /// Drops the oldest records beyond `max_entries`.
    ///
    /// The mirror only changes once the file has been rewritten. A failed
    /// rewrite keeps every record and is retried on the next eviction.
    fn evict(config: &PersistenceConfig, path: &Path, state: &mut FileState) {
        let Some(max) = config.max_entries else {
            return;
        };
        let excess = state.records.len().saturating_sub(max);
        if excess == 0 {
            return;
        }

        let kept = state.records[excess..].to_vec();
        match Self::rewrite(path, state.next_id, &kept) {
            Ok(()) => {
                state.records = kept;
                debug!(evicted = excess, "evicted oldest log records");
            }
            Err(e) => warn!(error = %e, excess, "failed to evict old log records"),
        }
    }

    fn append_lines(&self, records: &[StoredMessage]) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        writer.get_ref().sync_data()?;
        Ok(())
    }

    /// Replaces the file contents through a temp file and rename.
    fn rewrite(path: &Path, next_id: u64, records: &[StoredMessage]) -> Result<()> {
        let tmp = path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, &SequenceRecord { next_id })?;
            writer.write_all(b"\n")?;
            for record in records {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
            writer.get_ref().sync_data()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl Persistence for FilePersistence {
    #[allow(clippy::significant_drop_tightening)]
    fn save(&self, messages: Vec<LogMessage>) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let mut state = self.state.write();

        let first_id = state.next_id;
        let batch: Vec<StoredMessage> = messages
            .into_iter()
            .enumerate()
            .map(|(i, m)| StoredMessage::new(first_id + i as u64, m, now))
            .collect();

        // The in-memory mirror is only updated once the batch is on disk.
        // From here on the batch is durable, so the save succeeds.
        self.append_lines(&batch)?;
        state.next_id = first_id + batch.len() as u64;
        state.records.extend(batch);
        Self::evict(&self.config, &self.path, &mut state);

        debug!(total = state.records.len(), "stored log messages to file");
        Ok(())
    }

    fn get_page_by_filter(
        &self,
        filter: &FilterParams,
        paging: &PagingParams,
    ) -> Result<DataPage<LogMessage>> {
        let window = paging.resolve(
            self.config.effective_page_size(),
            self.config.effective_max_page_size(),
        )?;
        let state = self.state.read();
        Ok(select_page(&state.records, filter, window))
    }

    #[allow(clippy::significant_drop_tightening)]
    fn clear(&self, correlation_id: Option<&str>) -> Result<()> {
        let mut state = self.state.write();
        let kept: Vec<StoredMessage> = match correlation_id {
            None => Vec::new(),
            Some(id) => state
                .records
                .iter()
                .filter(|r| r.message.correlation_id.as_deref() != Some(id))
                .cloned()
                .collect(),
        };

        Self::rewrite(&self.path, state.next_id, &kept)?;
        state.records = kept;
        Ok(())
    }

    fn len(&self) -> usize {
        self.state.read().records.len()
    }
}
