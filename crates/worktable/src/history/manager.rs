//! The bounded undo stack.

use crate::error::{Result, WorktableError};

use super::entry::HistoryEntry;

/// Default number of undoable operations kept per session.
pub const DEFAULT_HISTORY_LIMIT: usize = 15;

/// Bounded stack of reversible operations.
///
/// Exceeding the bound silently discards the oldest entry: that change
/// stays applied but can no longer be undone.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    limit: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistoryManager {
    /// Create a manager bounded to `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    /// Push an entry, dropping the oldest when over the bound.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        if self.entries.len() > self.limit {
            self.entries.remove(0);
        }
    }

    /// Pop the most recent entry, or `NothingToUndo` when empty.
    pub fn pop(&mut self) -> Result<HistoryEntry> {
        self.entries.pop().ok_or(WorktableError::NothingToUndo)
    }

    /// Drop every entry. The record store is untouched; previous changes
    /// become permanent (consolidation).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current depth of the stack.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured bound.
    pub fn limit(&self) -> usize {
        self.limit
    }
}
