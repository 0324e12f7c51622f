//! Error types for the Worktable library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Worktable operations.
#[derive(Debug, Error)]
pub enum WorktableError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty file or no records to work on.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// The request carried a dataset id that does not match the session.
    ///
    /// The whole session is considered stale; callers must discard it
    /// and reload data.
    #[error("Session invalid: {0}")]
    SessionInvalid(String),

    /// A referenced row does not exist in the record store.
    #[error("Row {0} not found")]
    RowNotFound(u64),

    /// A referenced column does not exist in the dataset.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// No column suitable as a duplicate key could be identified.
    #[error("No duplicate key column found: {0}")]
    KeyColumnNotFound(String),

    /// The undo history is empty. Recoverable.
    #[error("Nothing to undo")]
    NothingToUndo,

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error persisting or loading the rule store.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result type alias for Worktable operations.
pub type Result<T> = std::result::Result<T, WorktableError>;
