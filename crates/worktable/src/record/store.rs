//! Ordered, uniquely-identified record storage.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorktableError};

use super::row::Record;

/// The working dataset: an ordered collection of records.
///
/// Positions may change (a restore can reinsert mid-sequence) but a
/// record's `row_id` never does. The column set is fixed at load time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordStore {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl RecordStore {
    /// Create a store over the given column set and records.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// The dynamic column names, in load order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the dataset has the given dynamic column.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// All records, in current order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Mutable access to all records, in current order.
    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find a record by id.
    pub fn find(&self, row_id: u64) -> Result<&Record> {
        self.records
            .iter()
            .find(|r| r.row_id == row_id)
            .ok_or(WorktableError::RowNotFound(row_id))
    }

    /// Find a record by id, mutably.
    pub fn find_mut(&mut self, row_id: u64) -> Result<&mut Record> {
        self.records
            .iter_mut()
            .find(|r| r.row_id == row_id)
            .ok_or(WorktableError::RowNotFound(row_id))
    }

    /// Current position of a record in the sequence.
    pub fn position(&self, row_id: u64) -> Option<usize> {
        self.records.iter().position(|r| r.row_id == row_id)
    }

    /// Replace the whole record sequence. The column set is unchanged.
    pub fn replace_all(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    /// Next free row id: `max(existing) + 1`, or 1 when empty.
    pub fn next_id(&self) -> u64 {
        self.records
            .iter()
            .map(|r| r.row_id)
            .max()
            .map(|max| max + 1)
            .unwrap_or(1)
    }

    /// Append a blank record (all dynamic fields "") and return its id.
    pub fn insert_blank(&mut self) -> u64 {
        let row_id = self.next_id();
        self.records.push(Record::blank(row_id, &self.columns));
        row_id
    }

    /// Append an existing record (used when restoring bulk deletes).
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Insert a record at `index` when in bounds, else append.
    ///
    /// Undo of a single delete restores the exact original position this
    /// way; an index that drifted out of bounds degrades to an append.
    pub fn insert_at(&mut self, index: usize, record: Record) {
        if index <= self.records.len() {
            self.records.insert(index, record);
        } else {
            self.records.push(record);
        }
    }

    /// Remove a record by id, returning it together with its original
    /// index so a later undo can restore positional order.
    pub fn remove(&mut self, row_id: u64) -> Result<(Record, usize)> {
        let index = self
            .position(row_id)
            .ok_or(WorktableError::RowNotFound(row_id))?;
        Ok((self.records.remove(index), index))
    }

    /// Sort the whole sequence by `row_id` ascending.
    ///
    /// Used after restoring a bulk delete, where per-row original
    /// positions are not tracked.
    pub fn sort_by_row_id(&mut self) {
        self.records.sort_by_key(|r| r.row_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use indexmap::IndexMap;

    fn store_with_ids(ids: &[u64]) -> RecordStore {
        let columns = vec!["A".to_string()];
        let records = ids
            .iter()
            .map(|&id| {
                let mut fields = IndexMap::new();
                fields.insert("A".to_string(), format!("v{id}"));
                Record::new(id, fields)
            })
            .collect();
        RecordStore::new(columns, records)
    }

    #[test]
    fn test_next_id_empty_store() {
        let store = store_with_ids(&[]);
        assert_eq!(store.next_id(), 1);
    }

    #[test]
    fn test_next_id_is_max_plus_one() {
        let store = store_with_ids(&[0, 5, 2]);
        assert_eq!(store.next_id(), 6);
    }

    #[test]
    fn test_remove_remembers_index() {
        let mut store = store_with_ids(&[0, 1, 2]);
        let (record, index) = store.remove(1).unwrap();
        assert_eq!(record.row_id, 1);
        assert_eq!(index, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insert_at_out_of_bounds_appends() {
        let mut store = store_with_ids(&[0, 1]);
        let record = Record::blank(9, &["A".to_string()]);
        store.insert_at(10, record);
        assert_eq!(store.records()[2].row_id, 9);
    }

    #[test]
    fn test_find_missing_row() {
        let store = store_with_ids(&[0]);
        assert!(matches!(
            store.find(42),
            Err(crate::WorktableError::RowNotFound(42))
        ));
    }
}
