//! Serialized, coalescing persistence of the stroke collection.
//!
//! Every mutation submits the whole collection. Submissions replace any
//! payload that has not been written yet, and [`PersistQueue::flush`] writes
//! one payload at a time, so the last submitted state is always the last
//! one applied to storage.

use crate::history::Snapshot;
use crate::page::PageKey;
use crate::storage::{Storage, StorageError, StorageResult};
use crate::stroke::Stroke;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default number of retries for a failed write.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistConfig {
    /// Extra attempts after a failed write before the payload is dropped.
    pub max_retries: u32,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Outcome of a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was pending.
    Idle,
    /// The pending payload was written.
    Written,
    /// The payload could not be written and was dropped.
    Dropped,
}

/// Write queue for one page.
pub struct PersistQueue<S: Storage> {
    storage: Arc<S>,
    key: PageKey,
    config: PersistConfig,
    pending: Option<Snapshot>,
    submitted: u64,
    writes_completed: u64,
    writes_failed: u64,
}

fn encode(strokes: &[Stroke]) -> StorageResult<String> {
    serde_json::to_string(strokes).map_err(|e| StorageError::Serialization(e.to_string()))
}

impl<S: Storage> PersistQueue<S> {
    pub fn new(storage: Arc<S>, key: PageKey, config: PersistConfig) -> Self {
        Self {
            storage,
            key,
            config,
            pending: None,
            submitted: 0,
            writes_completed: 0,
            writes_failed: 0,
        }
    }

    /// Queue a full collection, superseding anything not yet written.
    pub fn submit(&mut self, strokes: Snapshot) {
        if self.pending.replace(strokes).is_some() {
            log::trace!("Coalesced pending write for {}", self.key);
        }
        self.submitted += 1;
    }

    /// Whether a payload is waiting to be written.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Write the pending payload, retrying a bounded number of times.
    ///
    /// Failures are logged and the payload is dropped; they never surface to
    /// the caller as errors.
    pub async fn flush(&mut self) -> FlushOutcome {
        let Some(strokes) = self.pending.take() else {
            return FlushOutcome::Idle;
        };

        // An empty page drops its record; a missing record loads as empty.
        let payload = if strokes.is_empty() {
            None
        } else {
            match encode(&strokes) {
                Ok(payload) => Some(payload),
                Err(e) => {
                    log::error!("Dropping write for {}: {}", self.key, e);
                    self.writes_failed += 1;
                    return FlushOutcome::Dropped;
                }
            }
        };

        let mut attempt = 0;
        loop {
            match self.write(payload.clone()).await {
                Ok(()) => {
                    self.writes_completed += 1;
                    log::debug!("Saved {} strokes for {}", strokes.len(), self.key);
                    return FlushOutcome::Written;
                }
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    log::warn!(
                        "Write for {} failed (attempt {}): {}",
                        self.key,
                        attempt,
                        e
                    );
                }
                Err(e) => {
                    self.writes_failed += 1;
                    log::error!("Giving up on write for {}: {}", self.key, e);
                    return FlushOutcome::Dropped;
                }
            }
        }
    }

    async fn write(&self, payload: Option<String>) -> StorageResult<()> {
        match payload {
            Some(payload) => self.storage.set(self.key.as_str(), payload).await,
            None => self.storage.remove(self.key.as_str()).await,
        }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn key(&self) -> &PageKey {
        &self.key
    }

    /// Number of submissions since creation.
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    pub fn writes_completed(&self) -> u64 {
        self.writes_completed
    }

    pub fn writes_failed(&self) -> u64 {
        self.writes_failed
    }
}
