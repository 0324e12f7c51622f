//! The per-session editing state and its operation surface.
//!
//! A [`Session`] is the single logical writer over one loaded dataset:
//! record store, undo history, rule engine and audit log all live here
//! and are passed around explicitly - no ambient globals. Every mutating
//! operation is all-or-nothing, pushes exactly one history entry, runs a
//! full rule recompute and reports the new KPIs and history depth.

use serde::{Deserialize, Serialize};

use crate::audit::AuditLog;
use crate::dedup;
use crate::error::{Result, WorktableError};
use crate::export::{self, GroupRow};
use crate::filter::{self, FilterOutcome, Predicate};
use crate::history::{HistoryEntry, HistoryManager, UndoTarget};
use crate::kpi::KpiSummary;
use crate::record::{Priority, RecordStore, RowStatus};
use crate::rules::{Rule, RuleEngine, RuleStore};

/// Whether a mutating operation changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationStatus {
    /// The operation mutated the store and pushed a history entry.
    Applied,
    /// Nothing changed (new value equal to old, or an empty selection);
    /// no history entry was pushed.
    NoChange,
}

/// Result contract of every mutating operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationOutcome {
    pub status: MutationStatus,
    pub message: String,
    /// Current undo depth after the operation.
    pub history_len: usize,
    /// KPIs over the current full store.
    pub kpis: KpiSummary,
    /// Row the caller should focus, when one applies (edited, added or
    /// restored row).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_row: Option<u64>,
    /// New completeness of the affected row, for single-row edits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_status: Option<RowStatus>,
    /// New classification of the affected row, for single-row edits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// A filtered view plus its aggregates.
#[derive(Debug, Clone)]
pub struct FilterView {
    pub outcome: FilterOutcome,
    pub kpis: KpiSummary,
}

/// One editing session: the dataset, its derived state and its history.
#[derive(Debug)]
pub struct Session {
    dataset_id: String,
    actor: String,
    store: RecordStore,
    history: HistoryManager,
    engine: RuleEngine,
    rule_store: RuleStore,
    amount_column: Option<String>,
    audit: AuditLog,
}

impl Session {
    /// Assemble a session over a loaded store. Callers normally go
    /// through [`crate::input::Loader`] instead.
    pub fn new(
        dataset_id: impl Into<String>,
        store: RecordStore,
        engine: RuleEngine,
        rule_store: RuleStore,
        amount_column: Option<String>,
    ) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            actor: "operator".to_string(),
            store,
            history: HistoryManager::default(),
            engine,
            rule_store,
            amount_column,
            audit: AuditLog::new(),
        }
    }

    /// Set the actor identity recorded in audit entries.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Override the undo bound (default 15).
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = HistoryManager::new(limit);
        self
    }

    /// The session-scoped dataset identifier.
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// Reject a request whose dataset id does not match this session.
    ///
    /// On mismatch the whole session is stale; the caller must discard
    /// it and reload, rather than attempt fine-grained recovery.
    pub fn check_dataset_id(&self, request_id: &str) -> Result<()> {
        if request_id != self.dataset_id {
            return Err(WorktableError::SessionInvalid(format!(
                "dataset id '{request_id}' does not match the active session"
            )));
        }
        Ok(())
    }

    /// The record store.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The detected amount column, if any.
    pub fn amount_column(&self) -> Option<&str> {
        self.amount_column.as_deref()
    }

    /// The detected classification-source column, if any.
    pub fn classification_column(&self) -> Option<&str> {
        self.engine.classification_column()
    }

    /// Current undo depth.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The append-only audit trail.
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// The rule persistence collaborator.
    pub fn rule_store(&self) -> &RuleStore {
        &self.rule_store
    }

    /// Rules in stored order, read fresh from the rule store.
    pub fn rules(&self) -> Vec<Rule> {
        self.rule_store.load_rules()
    }

    /// KPIs over the current full store.
    pub fn kpis(&self) -> KpiSummary {
        KpiSummary::over(self.store.records(), self.amount_column.as_deref())
    }

    /// Evaluate predicates and aggregate KPIs over the visible subset.
    pub fn filter(&self, predicates: &[Predicate]) -> FilterView {
        let outcome = filter::evaluate(self.store.records(), predicates);
        let kpis = KpiSummary::over(&outcome.records, self.amount_column.as_deref());
        FilterView { outcome, kpis }
    }

    /// Group a (filtered) view by one column, aggregating the amount
    /// column per group, sorted by total descending.
    pub fn group_by(&self, column: &str, predicates: &[Predicate]) -> Result<Vec<GroupRow>> {
        let outcome = filter::evaluate(self.store.records(), predicates);
        export::group_records(
            self.store.columns(),
            &outcome.records,
            column,
            self.amount_column.as_deref(),
        )
    }

    /// Recompute derived classification for the whole store.
    ///
    /// Rule and setting state is read from the rule store on every call;
    /// it is the session-external source of truth.
    pub fn recompute(&mut self) {
        let rules = self.rule_store.load_rules();
        let settings = self.rule_store.load_settings();
        self.engine.recompute(&mut self.store, &rules, &settings);
    }

    // ------------------------------------------------------------------
    // Mutating operations
    // ------------------------------------------------------------------

    /// Edit one cell.
    pub fn update_cell(
        &mut self,
        row_id: u64,
        column: &str,
        new_value: &str,
    ) -> Result<MutationOutcome> {
        self.require_column(column)?;

        let record = self.store.find(row_id)?;
        let old_value = record.get(column).unwrap_or("").to_string();

        if old_value == new_value {
            let (row_status, priority) = (record.row_status, record.priority);
            let mut outcome = self.outcome(MutationStatus::NoChange, "value unchanged");
            outcome.affected_row = Some(row_id);
            outcome.row_status = Some(row_status);
            outcome.priority = Some(priority);
            return Ok(outcome);
        }

        let record = self.store.find_mut(row_id)?;
        record.set(column, new_value);
        record.refresh_status();

        self.history.push(HistoryEntry::Update {
            row_id,
            column: column.to_string(),
            old_value: old_value.clone(),
            new_value: new_value.to_string(),
        });
        self.recompute();
        self.audit.record(
            &self.actor,
            "update",
            Some(row_id),
            Some(column),
            Some(&old_value),
            Some(new_value),
        );

        let record = self.store.find(row_id)?;
        let (row_status, priority) = (record.row_status, record.priority);
        let mut outcome = self.outcome(
            MutationStatus::Applied,
            format!("row {row_id} updated"),
        );
        outcome.affected_row = Some(row_id);
        outcome.row_status = Some(row_status);
        outcome.priority = Some(priority);
        Ok(outcome)
    }

    /// Write the same value into one column of many rows.
    pub fn bulk_update(
        &mut self,
        row_ids: &[u64],
        column: &str,
        new_value: &str,
    ) -> Result<MutationOutcome> {
        self.require_column(column)?;
        self.require_rows(row_ids)?;

        let mut changes = Vec::new();
        for record in self.store.records_mut() {
            if !row_ids.contains(&record.row_id) {
                continue;
            }
            let old_value = record.get(column).unwrap_or("").to_string();
            if old_value == new_value {
                continue;
            }
            changes.push((record.row_id, old_value));
            record.set(column, new_value);
            record.refresh_status();
        }

        if changes.is_empty() {
            return Ok(self.outcome(MutationStatus::NoChange, "no rows changed"));
        }

        let actor = self.actor.clone();
        for (row_id, old_value) in &changes {
            self.audit.record(
                &actor,
                "bulk_update",
                Some(*row_id),
                Some(column),
                Some(old_value),
                Some(new_value),
            );
        }

        let count = changes.len();
        self.history.push(HistoryEntry::BulkUpdate {
            column: column.to_string(),
            new_value: new_value.to_string(),
            changes,
        });
        self.recompute();

        Ok(self.outcome(
            MutationStatus::Applied,
            format!("{count} rows updated"),
        ))
    }

    /// Replace every occurrence of `find` with `replace` in one column of
    /// a selection.
    pub fn find_replace(
        &mut self,
        row_ids: &[u64],
        column: &str,
        find: &str,
        replace: &str,
    ) -> Result<MutationOutcome> {
        self.require_column(column)?;
        self.require_rows(row_ids)?;

        if find.is_empty() {
            return Ok(self.outcome(MutationStatus::NoChange, "nothing to find"));
        }

        let mut changes = Vec::new();
        let mut audit_pairs = Vec::new();
        for record in self.store.records_mut() {
            if !row_ids.contains(&record.row_id) {
                continue;
            }
            let old_value = record.get(column).unwrap_or("").to_string();
            let new_value = old_value.replace(find, replace);
            if new_value == old_value {
                continue;
            }
            record.set(column, new_value.clone());
            record.refresh_status();
            audit_pairs.push((record.row_id, old_value.clone(), new_value));
            changes.push((record.row_id, old_value));
        }

        if changes.is_empty() {
            return Ok(self.outcome(MutationStatus::NoChange, "no rows changed"));
        }

        let actor = self.actor.clone();
        for (row_id, old_value, new_value) in &audit_pairs {
            self.audit.record(
                &actor,
                "find_replace",
                Some(*row_id),
                Some(column),
                Some(old_value),
                Some(new_value),
            );
        }

        let count = changes.len();
        self.history.push(HistoryEntry::FindReplace {
            column: column.to_string(),
            replacement: replace.to_string(),
            changes,
        });
        self.recompute();

        Ok(self.outcome(
            MutationStatus::Applied,
            format!("{count} rows changed"),
        ))
    }

    /// Append a blank row.
    pub fn add_row(&mut self) -> Result<MutationOutcome> {
        if self.store.columns().is_empty() {
            return Err(WorktableError::EmptyData(
                "no columns to add a row to".to_string(),
            ));
        }

        let row_id = self.store.insert_blank();
        self.history.push(HistoryEntry::Add { row_id });
        self.recompute();
        self.audit
            .record(&self.actor, "add", Some(row_id), None, None, None);

        let mut outcome = self.outcome(
            MutationStatus::Applied,
            format!("row {row_id} added"),
        );
        outcome.affected_row = Some(row_id);
        Ok(outcome)
    }

    /// Delete one row, remembering its position for undo.
    pub fn delete_row(&mut self, row_id: u64) -> Result<MutationOutcome> {
        let (record, original_index) = self.store.remove(row_id)?;
        self.history.push(HistoryEntry::Delete {
            record,
            original_index,
        });
        self.recompute();
        self.audit
            .record(&self.actor, "delete", Some(row_id), None, None, None);

        Ok(self.outcome(
            MutationStatus::Applied,
            format!("row {row_id} deleted"),
        ))
    }

    /// Delete several rows as one undoable action.
    pub fn bulk_delete(&mut self, row_ids: &[u64]) -> Result<MutationOutcome> {
        if row_ids.is_empty() {
            return Ok(self.outcome(MutationStatus::NoChange, "empty selection"));
        }
        self.require_rows(row_ids)?;

        let mut removed = Vec::new();
        let mut kept = Vec::new();
        for record in self.store.records().iter().cloned() {
            if row_ids.contains(&record.row_id) {
                removed.push(record);
            } else {
                kept.push(record);
            }
        }
        self.store.replace_all(kept);

        let actor = self.actor.clone();
        for record in &removed {
            self.audit
                .record(&actor, "bulk_delete", Some(record.row_id), None, None, None);
        }

        let count = removed.len();
        self.history.push(HistoryEntry::BulkDelete { records: removed });
        self.recompute();

        Ok(self.outcome(
            MutationStatus::Applied,
            format!("{count} rows deleted"),
        ))
    }

    /// Remove duplicate rows, keeping the first occurrence of each key.
    ///
    /// With no explicit key columns, an invoice-number-like column is
    /// detected from the headers; failing that is a recoverable
    /// `KeyColumnNotFound`. The removal is one undoable bulk delete.
    pub fn cleanup_duplicates(&mut self, key_columns: &[String]) -> Result<MutationOutcome> {
        let keys = self.resolve_key_columns(key_columns)?;
        let cleanup = dedup::cleanup(self.store.records(), &keys);

        if cleanup.removed.is_empty() {
            return Ok(self.outcome(MutationStatus::NoChange, "no duplicates found"));
        }

        self.store.replace_all(cleanup.kept);

        let actor = self.actor.clone();
        for record in &cleanup.removed {
            self.audit.record(
                &actor,
                "cleanup_duplicates",
                Some(record.row_id),
                None,
                None,
                None,
            );
        }

        let count = cleanup.removed.len();
        self.history.push(HistoryEntry::BulkDelete {
            records: cleanup.removed,
        });
        self.recompute();

        Ok(self.outcome(
            MutationStatus::Applied,
            format!("{count} duplicate rows removed"),
        ))
    }

    /// Every member of each duplicate group, first occurrences included.
    pub fn find_duplicates(&self, key_columns: &[String]) -> Result<Vec<crate::record::Record>> {
        let keys = self.resolve_key_columns(key_columns)?;
        Ok(dedup::find(self.store.records(), &keys))
    }

    /// Invert the most recent history entry.
    ///
    /// The rule engine reruns unconditionally afterwards, even when the
    /// inverted action could not have affected classification.
    pub fn undo(&mut self) -> Result<MutationOutcome> {
        let entry = self.history.pop()?;
        let label = entry.label();
        let target = entry.revert(&mut self.store)?;
        self.recompute();

        let affected_row = match target {
            UndoTarget::Row(row_id) => Some(row_id),
            UndoTarget::Bulk | UndoTarget::None => None,
        };
        self.audit.record(
            &self.actor,
            &format!("undo {label}"),
            affected_row,
            None,
            None,
            None,
        );

        let mut outcome = self.outcome(
            MutationStatus::Applied,
            format!("undid {label}"),
        );
        outcome.affected_row = affected_row;
        Ok(outcome)
    }

    /// Consolidate: clear the undo history without touching the store.
    /// Previous changes become permanent.
    pub fn commit(&mut self) -> Result<MutationOutcome> {
        self.history.clear();
        self.audit
            .record(&self.actor, "commit", None, None, None, None);
        Ok(self.outcome(MutationStatus::Applied, "changes consolidated"))
    }

    // ------------------------------------------------------------------

    fn outcome(&self, status: MutationStatus, message: impl Into<String>) -> MutationOutcome {
        MutationOutcome {
            status,
            message: message.into(),
            history_len: self.history.len(),
            kpis: self.kpis(),
            affected_row: None,
            row_status: None,
            priority: None,
        }
    }

    fn require_column(&self, column: &str) -> Result<()> {
        if !self.store.has_column(column) {
            return Err(WorktableError::ColumnNotFound(column.to_string()));
        }
        Ok(())
    }

    /// All-or-nothing guard: every referenced row must exist before any
    /// row is touched.
    fn require_rows(&self, row_ids: &[u64]) -> Result<()> {
        for &row_id in row_ids {
            self.store.find(row_id)?;
        }
        Ok(())
    }

    fn resolve_key_columns(&self, key_columns: &[String]) -> Result<Vec<String>> {
        if key_columns.is_empty() {
            return Ok(vec![dedup::detect_key_column(self.store.columns())?]);
        }
        for column in key_columns {
            self.require_column(column)?;
        }
        Ok(key_columns.to_vec())
    }
}
