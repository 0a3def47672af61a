//! Canonical stroke collection for the current page.

use crate::history::Snapshot;
use crate::page::PageKey;
use crate::persist::PersistQueue;
use crate::storage::Storage;
use crate::stroke::{Stroke, sanitize_strokes};
use std::sync::Arc;

/// Owns the current stroke collection.
///
/// The collection is shared copy-on-write with history snapshots and the
/// persistence queue: handing out a [`Snapshot`] is a reference-count bump,
/// and the first edit after that clones the list.
#[derive(Debug, Clone, Default)]
pub struct StrokeStore {
    strokes: Snapshot,
}

impl StrokeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `strokes`.
    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        Self {
            strokes: Arc::new(strokes),
        }
    }

    /// Load the persisted collection for `key`.
    ///
    /// Absent records, unreadable storage and values that are not a stroke
    /// array all resolve to an empty collection.
    pub async fn load<S: Storage + ?Sized>(
        storage: &S,
        key: &PageKey,
        default_width: f64,
    ) -> Vec<Stroke> {
        let raw = match storage.get(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("No annotations stored for {}", key);
                return Vec::new();
            }
            Err(e) => {
                log::warn!("Failed to read annotations for {}: {}", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Stroke>>(&raw) {
            Ok(strokes) => sanitize_strokes(strokes, default_width),
            Err(e) => {
                log::warn!("Ignoring malformed annotations for {}: {}", key, e);
                Vec::new()
            }
        }
    }

    /// Strokes in z-order (back to front).
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Immutable handle to the current collection.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.strokes)
    }

    /// Swap in a new collection. Returns true if the content changed.
    pub fn replace(&mut self, strokes: Snapshot) -> bool {
        let changed = !Arc::ptr_eq(&self.strokes, &strokes) && *self.strokes != *strokes;
        self.strokes = strokes;
        changed
    }

    /// Add a finished stroke on top.
    pub fn append(&mut self, stroke: Stroke) {
        Arc::make_mut(&mut self.strokes).push(stroke);
    }

    /// Queue the whole collection for writing.
    pub fn persist<S: Storage>(&self, queue: &mut PersistQueue<S>) {
        queue.submit(self.snapshot());
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total number of sample points across all strokes.
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }
}
