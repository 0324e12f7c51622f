//! Duplicate detection and cleanup by a configurable column subset.

mod resolver;

pub use resolver::{cleanup, detect_key_column, find, CleanupOutcome};
