//! A single row of the working dataset.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Completeness status of a row, derived from its dynamic fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// Every dynamic field is filled in.
    Complete,
    /// At least one dynamic field is empty or the literal "0".
    Incomplete,
}

impl RowStatus {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            RowStatus::Complete => "Complete",
            RowStatus::Incomplete => "Incomplete",
        }
    }
}

/// Classification assigned by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the working dataset.
///
/// Reserved fields (`row_id`, `row_status`, `priority`, `priority_reason`)
/// are typed; the spreadsheet columns themselves are only known at load
/// time and live in an ordered string map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identity of the record, unique across the store at every moment
    /// and stable across edits and reorders. The next id is
    /// `max + 1`, so an id can come back once the highest row is gone.
    pub row_id: u64,

    /// Derived completeness status.
    pub row_status: RowStatus,

    /// Derived classification.
    pub priority: Priority,

    /// Human-readable explanation of the last rule that set `priority`.
    pub priority_reason: String,

    /// Dynamic spreadsheet columns, in load order.
    pub fields: IndexMap<String, String>,
}

impl Record {
    /// Create a record with the given id and dynamic fields.
    ///
    /// `row_status` is derived immediately; classification starts at the
    /// Medium default until the rule engine runs.
    pub fn new(row_id: u64, fields: IndexMap<String, String>) -> Self {
        let mut record = Self {
            row_id,
            row_status: RowStatus::Complete,
            priority: Priority::Medium,
            priority_reason: "default".to_string(),
            fields,
        };
        record.refresh_status();
        record
    }

    /// Create a blank record: every column from `columns` set to "".
    pub fn blank(row_id: u64, columns: &[String]) -> Self {
        let fields = columns
            .iter()
            .map(|c| (c.clone(), String::new()))
            .collect();
        Self::new(row_id, fields)
    }

    /// Get a dynamic field value.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(|s| s.as_str())
    }

    /// Set a dynamic field value. The column must already exist.
    pub fn set(&mut self, column: &str, value: impl Into<String>) -> bool {
        match self.fields.get_mut(column) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Re-derive `row_status` from the current field values.
    ///
    /// A row is Incomplete when any dynamic field, trimmed, is empty or
    /// the literal "0".
    pub fn refresh_status(&mut self) {
        let incomplete = self.fields.values().any(|v| {
            let trimmed = v.trim();
            trimmed.is_empty() || trimmed == "0"
        });
        self.row_status = if incomplete {
            RowStatus::Incomplete
        } else {
            RowStatus::Complete
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_status_complete() {
        let record = Record::new(0, fields(&[("Invoice #", "100"), ("Status", "Paid")]));
        assert_eq!(record.row_status, RowStatus::Complete);
    }

    #[test]
    fn test_status_incomplete_on_empty_field() {
        let record = Record::new(0, fields(&[("Invoice #", "100"), ("Status", "  ")]));
        assert_eq!(record.row_status, RowStatus::Incomplete);
    }

    #[test]
    fn test_status_incomplete_on_literal_zero() {
        let record = Record::new(0, fields(&[("Invoice #", "100"), ("Amount", "0")]));
        assert_eq!(record.row_status, RowStatus::Incomplete);
    }

    #[test]
    fn test_blank_record_defaults() {
        let columns = vec!["A".to_string(), "B".to_string()];
        let record = Record::blank(7, &columns);
        assert_eq!(record.row_id, 7);
        assert_eq!(record.row_status, RowStatus::Incomplete);
        assert_eq!(record.priority, Priority::Medium);
        assert_eq!(record.priority_reason, "default");
        assert_eq!(record.get("A"), Some(""));
    }

    #[test]
    fn test_set_unknown_column_rejected() {
        let mut record = Record::new(0, fields(&[("A", "1")]));
        assert!(!record.set("Missing", "x"));
        assert!(record.set("A", "2"));
        assert_eq!(record.get("A"), Some("2"));
    }
}
