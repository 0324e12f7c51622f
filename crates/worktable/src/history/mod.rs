//! Bounded, action-typed undo history.

mod entry;
mod manager;

pub use entry::{HistoryEntry, UndoTarget};
pub use manager::{HistoryManager, DEFAULT_HISTORY_LIMIT};
