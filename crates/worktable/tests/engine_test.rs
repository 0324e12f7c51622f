//! Integration tests for the editing session: filtering, rules, undo
//! history and duplicate cleanup working together.

use std::fs::File;
use std::io::Write;

use tempfile::TempDir;

use worktable::input::{Loader, LoaderConfig};
use worktable::{
    FilterOp, MutationStatus, Predicate, Priority, Rule, RowStatus, Session, Settings,
    WorktableError,
};

/// Build a session from inline CSV, with the rule document in the same
/// temp directory.
fn session_from(dir: &TempDir, content: &str) -> Session {
    let path = dir.path().join("data.csv");
    let mut file = File::create(&path).expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");

    Loader::with_config(LoaderConfig {
        rules_path: Some(dir.path().join("rules.json")),
        ..LoaderConfig::default()
    })
    .load(&path)
    .expect("Load failed")
}

fn invoice_data() -> &'static str {
    "Invoice #,Pay Group,Status,Total\n\
     100,SCF,Pending,$1,\n\
     200,Pay Group 2,Paid,\"$2,000.00\"\n\
     300,Other,Pending,$500.00\n\
     400,Other,Paid,$100.00\n\
     500,SCF,Pending,$50.00\n\
     600,Other,Pending,$75.00\n"
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn test_base_heuristic_classifies_on_load() {
    let dir = TempDir::new().unwrap();
    let session = session_from(&dir, "Invoice #,Pay Group\n1,SCF\n2,Pay Group 2\n3,Other\n");

    let priorities: Vec<Priority> = session
        .store()
        .records()
        .iter()
        .map(|r| r.priority)
        .collect();
    assert_eq!(
        priorities,
        vec![Priority::High, Priority::Low, Priority::Medium]
    );
}

#[test]
fn test_vip_rule_overrides_base_classification() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, "Invoice #,Pay Group\n1,SCF\n2,Pay Group 2\n3,Other\n");

    session
        .rule_store()
        .save_rule(Rule::new(
            "Pay Group",
            FilterOp::Equals,
            "Other",
            Priority::High,
            "VIP",
        ))
        .unwrap();
    session.recompute();

    let third = &session.store().records()[2];
    assert_eq!(third.priority, Priority::High);
    assert_eq!(third.priority_reason, "VIP");
    // The other records keep the base classification.
    assert_eq!(session.store().records()[0].priority, Priority::High);
    assert_eq!(session.store().records()[1].priority, Priority::Low);
}

#[test]
fn test_disabling_base_heuristic_defaults_to_medium() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, "Invoice #,Pay Group\n1,SCF\n");

    session
        .rule_store()
        .save_settings(Settings {
            enable_base_heuristic: false,
        })
        .unwrap();
    session.recompute();

    assert_eq!(session.store().records()[0].priority, Priority::Medium);
}

// =============================================================================
// Update / undo round trip
// =============================================================================

#[test]
fn test_update_then_undo_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, invoice_data());

    let outcome = session.update_cell(5, "Status", "Approved").unwrap();
    assert_eq!(outcome.status, MutationStatus::Applied);
    assert_eq!(outcome.history_len, 1);
    assert_eq!(
        session.store().find(5).unwrap().get("Status"),
        Some("Approved")
    );

    let undone = session.undo().unwrap();
    assert_eq!(undone.history_len, 0);
    assert_eq!(undone.affected_row, Some(5));
    assert_eq!(
        session.store().find(5).unwrap().get("Status"),
        Some("Pending")
    );
}

#[test]
fn test_noop_update_pushes_no_history() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, invoice_data());

    let outcome = session.update_cell(2, "Status", "Pending").unwrap();
    assert_eq!(outcome.status, MutationStatus::NoChange);
    assert_eq!(outcome.history_len, 0);
    assert_eq!(outcome.kpis.record_count, 6);
}

#[test]
fn test_update_refreshes_row_status() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, "A,B\nx,y\n");

    let outcome = session.update_cell(0, "B", "").unwrap();
    assert_eq!(outcome.row_status, Some(RowStatus::Incomplete));

    session.undo().unwrap();
    assert_eq!(
        session.store().records()[0].row_status,
        RowStatus::Complete
    );
}

#[test]
fn test_update_unknown_row_or_column_aborts() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, invoice_data());

    assert!(matches!(
        session.update_cell(99, "Status", "x"),
        Err(WorktableError::RowNotFound(99))
    ));
    assert!(matches!(
        session.update_cell(0, "Nope", "x"),
        Err(WorktableError::ColumnNotFound(_))
    ));
    // Neither attempt left a history entry behind.
    assert_eq!(session.history_len(), 0);
}

// =============================================================================
// Bulk operations
// =============================================================================

#[test]
fn test_bulk_update_and_undo() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, invoice_data());

    let outcome = session.bulk_update(&[0, 2, 5], "Status", "Closed").unwrap();
    assert_eq!(outcome.status, MutationStatus::Applied);
    assert_eq!(outcome.history_len, 1);

    session.undo().unwrap();
    for id in [0u64, 2, 5] {
        assert_eq!(
            session.store().find(id).unwrap().get("Status"),
            Some("Pending")
        );
    }
}

#[test]
fn test_bulk_update_already_equal_is_noop() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, invoice_data());

    let outcome = session.bulk_update(&[0, 2], "Status", "Pending").unwrap();
    assert_eq!(outcome.status, MutationStatus::NoChange);
    assert_eq!(session.history_len(), 0);
}

#[test]
fn test_find_replace_in_selection_and_undo() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, invoice_data());

    let outcome = session
        .find_replace(&[0, 1, 2], "Status", "Pending", "On Hold")
        .unwrap();
    assert_eq!(outcome.status, MutationStatus::Applied);
    assert_eq!(
        session.store().find(0).unwrap().get("Status"),
        Some("On Hold")
    );
    // Row 1 was "Paid"; untouched.
    assert_eq!(session.store().find(1).unwrap().get("Status"), Some("Paid"));

    session.undo().unwrap();
    assert_eq!(
        session.store().find(0).unwrap().get("Status"),
        Some("Pending")
    );
}

#[test]
fn test_bulk_delete_restores_sorted_by_row_id() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, invoice_data());

    session.bulk_delete(&[1, 4]).unwrap();
    assert_eq!(session.store().len(), 4);

    session.undo().unwrap();
    let ids: Vec<u64> = session.store().records().iter().map(|r| r.row_id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
}

// =============================================================================
// Add / delete
// =============================================================================

#[test]
fn test_add_row_defaults_and_undo() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, invoice_data());

    let outcome = session.add_row().unwrap();
    let new_id = outcome.affected_row.unwrap();
    assert_eq!(new_id, 6);

    let added = session.store().find(new_id).unwrap();
    assert_eq!(added.row_status, RowStatus::Incomplete);
    assert_eq!(added.get("Invoice #"), Some(""));

    session.undo().unwrap();
    assert!(session.store().find(new_id).is_err());
}

#[test]
fn test_delete_row_undo_restores_exact_position() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, invoice_data());

    session.delete_row(2).unwrap();
    assert!(session.store().find(2).is_err());

    session.undo().unwrap();
    assert_eq!(session.store().position(2), Some(2));
}

#[test]
fn test_row_ids_stay_unique_across_add_delete_undo() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, invoice_data());

    let first = session.add_row().unwrap().affected_row.unwrap();
    session.delete_row(first).unwrap();
    let second = session.add_row().unwrap().affected_row.unwrap();
    // next_id is max+1, so the id comes back once the old row is gone.
    assert_eq!(second, first);

    session.undo().unwrap(); // remove `second`
    session.undo().unwrap(); // restore `first`
    let ids: Vec<u64> = session.store().records().iter().map(|r| r.row_id).collect();
    let unique: std::collections::HashSet<u64> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());
}

// =============================================================================
// History bound and consolidation
// =============================================================================

#[test]
fn test_history_bound_drops_oldest() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, invoice_data());

    // 18 single-cell edits against a bound of 15.
    for i in 0..18 {
        session
            .update_cell(0, "Status", &format!("v{i}"))
            .unwrap();
    }
    assert_eq!(session.history_len(), 15);

    for _ in 0..15 {
        session.undo().unwrap();
    }
    // The three oldest edits are unrecoverable; undo bottoms out at v2.
    assert_eq!(session.store().find(0).unwrap().get("Status"), Some("v2"));
    assert!(matches!(session.undo(), Err(WorktableError::NothingToUndo)));
}

#[test]
fn test_commit_clears_history_without_touching_store() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, invoice_data());

    session.update_cell(0, "Status", "Approved").unwrap();
    let outcome = session.commit().unwrap();
    assert_eq!(outcome.history_len, 0);
    assert_eq!(
        session.store().find(0).unwrap().get("Status"),
        Some("Approved")
    );
    assert!(matches!(session.undo(), Err(WorktableError::NothingToUndo)));
}

// =============================================================================
// Duplicates
// =============================================================================

#[test]
fn test_cleanup_duplicates_and_undo() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(
        &dir,
        "Invoice #,Total\n100,$1\n100,$2\n200,$3\n",
    );

    let duplicates = session.find_duplicates(&[]).unwrap();
    assert_eq!(duplicates.len(), 2);

    let outcome = session.cleanup_duplicates(&[]).unwrap();
    assert_eq!(outcome.status, MutationStatus::Applied);
    let ids: Vec<u64> = session.store().records().iter().map(|r| r.row_id).collect();
    assert_eq!(ids, vec![0, 2]);

    session.undo().unwrap();
    let ids: Vec<u64> = session.store().records().iter().map(|r| r.row_id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn test_cleanup_without_key_column_is_recoverable() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, "Vendor,Total\nacme,$1\n");

    assert!(matches!(
        session.cleanup_duplicates(&[]),
        Err(WorktableError::KeyColumnNotFound(_))
    ));
    assert_eq!(session.store().len(), 1);
    assert_eq!(session.history_len(), 0);
}

// =============================================================================
// Filtering and KPIs
// =============================================================================

#[test]
fn test_filter_view_reports_kpis_over_subset() {
    let dir = TempDir::new().unwrap();
    let session = session_from(&dir, invoice_data());

    let view = session.filter(&[Predicate::new("Status", FilterOp::Equals, "paid")]);
    assert_eq!(view.outcome.records.len(), 2);
    assert_eq!(view.kpis.record_count, 2);
    assert_eq!(view.kpis.total_amount, "$2,100.00");
    assert_eq!(view.kpis.average_amount, "$1,050.00");
}

#[test]
fn test_group_by_aggregates_amount_per_key() {
    let dir = TempDir::new().unwrap();
    let session = session_from(&dir, invoice_data());

    let groups = session.group_by("Status", &[]).unwrap();
    // Paid ($2,100) outranks Pending ($626) in the sum-descending order.
    assert_eq!(groups[0].key, "Paid");
    assert_eq!(groups[0].sum, 2100.0);
    assert_eq!(groups[0].count, 2);
    assert_eq!(groups[1].key, "Pending");
    assert_eq!(groups[1].count, 4);
}

#[test]
fn test_mutation_outcome_reports_full_store_kpis() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, "Invoice #,Total\n100,$10\n200,$30\n");

    let outcome = session.update_cell(0, "Total", "$20").unwrap();
    assert_eq!(outcome.kpis.record_count, 2);
    assert_eq!(outcome.kpis.total_amount, "$50.00");
}

// =============================================================================
// Session identity and audit
// =============================================================================

#[test]
fn test_stale_dataset_id_rejected() {
    let dir = TempDir::new().unwrap();
    let session = session_from(&dir, invoice_data());

    assert!(session.check_dataset_id(session.dataset_id()).is_ok());
    assert!(matches!(
        session.check_dataset_id("sha256:deadbeef"),
        Err(WorktableError::SessionInvalid(_))
    ));
}

#[test]
fn test_undo_appends_audit_instead_of_erasing() {
    let dir = TempDir::new().unwrap();
    let mut session = session_from(&dir, invoice_data());

    session.update_cell(0, "Status", "Approved").unwrap();
    session.undo().unwrap();

    let actions: Vec<&str> = session
        .audit()
        .entries()
        .iter()
        .map(|e| e.action.as_str())
        .collect();
    assert_eq!(actions, vec!["update", "undo update"]);
}
