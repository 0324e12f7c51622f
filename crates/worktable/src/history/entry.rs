//! History entries - one reversible record per mutating operation.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::{Record, RecordStore};

/// What a caller should focus after an undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoTarget {
    /// A single row was touched.
    Row(u64),
    /// Several rows were touched.
    Bulk,
    /// Nothing specific to focus.
    None,
}

/// One reversible mutating operation.
///
/// Each variant carries exactly the state needed to invert itself;
/// nothing else is retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HistoryEntry {
    /// A single cell edit.
    Update {
        row_id: u64,
        column: String,
        old_value: String,
        new_value: String,
    },
    /// The same new value written to one column of many rows.
    BulkUpdate {
        column: String,
        new_value: String,
        changes: Vec<(u64, String)>,
    },
    /// Substring replacement over one column of a selection.
    FindReplace {
        column: String,
        replacement: String,
        changes: Vec<(u64, String)>,
    },
    /// A blank row was appended.
    Add { row_id: u64 },
    /// A single row was removed; its exact position is remembered.
    Delete {
        record: Record,
        original_index: usize,
    },
    /// Several rows were removed at once. Original positions are not
    /// tracked per row; restoration re-sorts the store by `row_id`.
    BulkDelete { records: Vec<Record> },
}

impl HistoryEntry {
    /// Short action label, used in audit entries and status messages.
    pub fn label(&self) -> &'static str {
        match self {
            HistoryEntry::Update { .. } => "update",
            HistoryEntry::BulkUpdate { .. } => "bulk_update",
            HistoryEntry::FindReplace { .. } => "find_replace",
            HistoryEntry::Add { .. } => "add",
            HistoryEntry::Delete { .. } => "delete",
            HistoryEntry::BulkDelete { .. } => "bulk_delete",
        }
    }

    /// Invert this entry against the store.
    ///
    /// The caller is responsible for running a full rule recompute
    /// afterwards; completeness of the touched rows is refreshed here.
    pub fn revert(self, store: &mut RecordStore) -> Result<UndoTarget> {
        match self {
            HistoryEntry::Update {
                row_id,
                column,
                old_value,
                ..
            } => {
                let record = store.find_mut(row_id)?;
                record.set(&column, old_value);
                record.refresh_status();
                Ok(UndoTarget::Row(row_id))
            }

            HistoryEntry::BulkUpdate {
                column, changes, ..
            }
            | HistoryEntry::FindReplace {
                column, changes, ..
            } => {
                for (row_id, old_value) in changes {
                    // Rows deleted since the bulk edit are simply gone;
                    // restoring the rest is still all-or-nothing because
                    // missing rows cannot conflict.
                    if let Ok(record) = store.find_mut(row_id) {
                        record.set(&column, old_value);
                        record.refresh_status();
                    }
                }
                Ok(UndoTarget::Bulk)
            }

            HistoryEntry::Add { row_id } => {
                store.remove(row_id)?;
                Ok(UndoTarget::None)
            }

            HistoryEntry::Delete {
                record,
                original_index,
            } => {
                let row_id = record.row_id;
                store.insert_at(original_index, record);
                Ok(UndoTarget::Row(row_id))
            }

            HistoryEntry::BulkDelete { records } => {
                for record in records {
                    store.push(record);
                }
                store.sort_by_row_id();
                Ok(UndoTarget::Bulk)
            }
        }
    }
}
