//! Undo/redo functionality

use std::collections::VecDeque;

use super::{SceneStore, Snapshot};

/// Default number of undo steps kept
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Bounded undo/redo stacks of whole scene snapshots
#[derive(Debug, Clone)]
pub struct History {
    /// Oldest first; newest at the back
    past: VecDeque<Snapshot>,
    /// Most recently undone at the front
    future: VecDeque<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create a history keeping at most `limit` undo steps
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Record the pre-mutation state; a new branch invalidates redo
    pub fn snapshot(&mut self, current: Snapshot) {
        self.past.push_back(current);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Step back, returning the state to restore
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop_back()?;
        self.future.push_front(current);
        Some(previous)
    }

    /// Step forward, returning the state to restore.
    ///
    /// The bound is not re-applied here; only `snapshot` trims `past`.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop_front()?;
        self.past.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of entries in (past, future)
    pub fn len(&self) -> (usize, usize) {
        (self.past.len(), self.future.len())
    }

    pub fn is_empty(&self) -> bool {
        self.past.is_empty() && self.future.is_empty()
    }

    pub fn past(&self) -> impl Iterator<Item = &Snapshot> {
        self.past.iter()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

impl SceneStore {
    /// Save the current state once at the beginning of a continuous edit
    /// (drag, push/pull). Subsequent `update_shape` calls are then undone together.
    pub fn begin_gesture(&mut self) {
        self.save_undo();
    }

    /// Undo last change
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(self.shapes.clone()) else {
            return false;
        };
        self.shapes = previous;
        self.selection.clear();
        self.version += 1;
        tracing::debug!(shapes = self.shapes.len(), "undo");
        true
    }

    /// Redo last undone change
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(self.shapes.clone()) else {
            return false;
        };
        self.shapes = next;
        self.selection.clear();
        self.version += 1;
        tracing::debug!(shapes = self.shapes.len(), "redo");
        true
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of undo and redo entries
    pub fn history_len(&self) -> (usize, usize) {
        self.history.len()
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}
