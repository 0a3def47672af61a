//! Linear undo/redo over whole-collection snapshots.

use crate::stroke::Stroke;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// Default number of undo states to keep.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// An immutable copy of the stroke collection.
///
/// The canonical collection is copy-on-write (see [`crate::store::StrokeStore`]),
/// so holding a snapshot never observes later edits.
pub type Snapshot = Arc<Vec<Stroke>>;

/// History configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo states; the oldest is dropped beyond this.
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_HISTORY,
        }
    }
}

/// Undo and redo stacks.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(&HistoryConfig::default())
    }
}

impl HistoryManager {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: config.max_depth.max(1),
        }
    }

    /// Record the state before a user action. Call once per action,
    /// before its first mutation.
    pub fn snapshot_before_action(&mut self, current: Snapshot) {
        self.push_undo(current);
        // A new action invalidates everything that was undone.
        self.redo_stack.clear();
    }

    /// Step back one action.
    ///
    /// Returns the collection to restore, or `None` if there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward one undone action.
    ///
    /// Returns the collection to restore, or `None` if there is nothing to redo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.push_undo(current);
        Some(next)
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
