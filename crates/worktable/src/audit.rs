//! Append-only audit trail.
//!
//! Unlike the undo history, the audit log is never rewound: undoing an
//! action appends a new `undo <action>` entry rather than removing the
//! original one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One attributable event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the event happened.
    pub at: DateTime<Utc>,

    /// Actor identity, supplied by the session collaborator.
    pub actor: String,

    /// Action label, e.g. "update" or "undo delete".
    pub action: String,

    /// Affected row, when the event targets one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_id: Option<u64>,

    /// Affected column, when the event targets one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Value before the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,

    /// Value after the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
}

/// Append-only sequence of audit entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a cell-level event.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &mut self,
        actor: &str,
        action: &str,
        row_id: Option<u64>,
        column: Option<&str>,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) {
        self.entries.push(AuditEntry {
            at: Utc::now(),
            actor: actor.to_string(),
            action: action.to_string(),
            row_id,
            column: column.map(str::to_string),
            old_value: old_value.map(str::to_string),
            new_value: new_value.map(str::to_string),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_only_grows() {
        let mut log = AuditLog::new();
        log.record("tester", "update", Some(5), Some("Status"), Some("Pending"), Some("Approved"));
        log.record("tester", "undo update", Some(5), Some("Status"), Some("Approved"), Some("Pending"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].action, "update");
        assert_eq!(log.entries()[1].action, "undo update");
        assert_eq!(log.entries()[1].old_value.as_deref(), Some("Approved"));
    }
}
