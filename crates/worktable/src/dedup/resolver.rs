//! Duplicate groups keyed on one or more columns.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, WorktableError};
use crate::record::Record;

/// Header names accepted as the invoice-number-like duplicate key when
/// the caller does not name one.
const KEY_COLUMN_CANDIDATES: &[&str] = &[
    "invoice #",
    "invoice",
    "invoice number",
    "invoice no",
    "factura",
];

/// Result of a duplicate cleanup.
#[derive(Debug, Clone)]
pub struct CleanupOutcome {
    /// Records surviving the cleanup, in original order.
    pub kept: Vec<Record>,
    /// Every record after the first occurrence of its key, in original
    /// order. The caller wraps these into one bulk-delete history entry.
    pub removed: Vec<Record>,
}

/// Pick the duplicate key column from the dataset headers.
///
/// Failure is recoverable: the caller reports it and leaves the store
/// untouched.
pub fn detect_key_column(columns: &[String]) -> Result<String> {
    columns
        .iter()
        .find(|c| KEY_COLUMN_CANDIDATES.contains(&c.trim().to_lowercase().as_str()))
        .cloned()
        .ok_or_else(|| {
            WorktableError::KeyColumnNotFound(
                "no invoice-number-like column in dataset".to_string(),
            )
        })
}

/// Every member of a duplicate group - the first occurrence included,
/// so the caller can show the whole group, not just the extras.
pub fn find(records: &[Record], key_columns: &[String]) -> Vec<Record> {
    let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
    for record in records {
        *counts.entry(key_of(record, key_columns)).or_default() += 1;
    }

    records
        .iter()
        .filter(|r| counts[&key_of(r, key_columns)] > 1)
        .cloned()
        .collect()
}

/// Keep the first occurrence of each key; everything after it is removed.
pub fn cleanup(records: &[Record], key_columns: &[String]) -> CleanupOutcome {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut outcome = CleanupOutcome {
        kept: Vec::new(),
        removed: Vec::new(),
    };

    for record in records {
        let key = key_of(record, key_columns);
        if seen.insert(key) {
            outcome.kept.push(record.clone());
        } else {
            outcome.removed.push(record.clone());
        }
    }

    outcome
}

fn key_of(record: &Record, key_columns: &[String]) -> Vec<String> {
    key_columns
        .iter()
        .map(|c| record.get(c).unwrap_or("").trim().to_string())
        .collect()
}
