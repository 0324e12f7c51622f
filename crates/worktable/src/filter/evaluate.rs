//! The filter evaluator: compiles predicates into a combined AND/OR
//! selection over a record slice.

use indexmap::IndexMap;

use crate::record::Record;

use super::predicate::Predicate;

/// Reserved column name that selects rows by identity instead of cell
/// content. User-facing values are 1-based.
pub const ROW_ID_COLUMN: &str = "row_id";

/// Result of evaluating a predicate list.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Records that passed every column group, in original order.
    pub records: Vec<Record>,
    /// Recoverable conditions hit along the way (e.g. a predicate on a
    /// column the dataset does not have).
    pub warnings: Vec<String>,
}

/// Apply a predicate list to `records`.
///
/// Predicates sharing a column are OR-combined; per-column results are
/// AND-combined across columns. Blank predicates are ignored, and an
/// empty list is the identity.
pub fn evaluate(records: &[Record], predicates: &[Predicate]) -> FilterOutcome {
    let mut outcome = FilterOutcome {
        records: records.to_vec(),
        warnings: Vec::new(),
    };

    // Group predicates by column, preserving first-appearance order.
    let mut by_column: IndexMap<&str, Vec<&Predicate>> = IndexMap::new();
    for predicate in predicates.iter().filter(|p| !p.is_blank()) {
        by_column
            .entry(predicate.column.as_str())
            .or_default()
            .push(predicate);
    }

    for (column, group) in by_column {
        if column == ROW_ID_COLUMN {
            apply_row_id_group(&mut outcome.records, &group);
            continue;
        }

        let column_exists = outcome
            .records
            .first()
            .is_some_and(|r| r.fields.contains_key(column));
        if !column_exists && !outcome.records.is_empty() {
            outcome
                .warnings
                .push(format!("column '{column}' not in dataset; filter skipped"));
            continue;
        }

        outcome.records.retain(|record| {
            let cell = record.get(column).unwrap_or("");
            group.iter().any(|p| p.op.matches(cell, &p.value))
        });
    }

    outcome
}

/// Exact-match selection on `row_id`.
///
/// The user-facing value is 1-based; non-numeric values are dropped
/// silently, and a group with no numeric value at all is skipped
/// entirely. A numeric value below 1 maps to no row and matches
/// nothing, it does not deactivate the group.
fn apply_row_id_group(records: &mut Vec<Record>, group: &[&Predicate]) {
    let parsed: Vec<i64> = group
        .iter()
        .filter_map(|p| p.value.trim().parse::<i64>().ok())
        .collect();

    if parsed.is_empty() {
        return;
    }

    let wanted: Vec<u64> = parsed
        .into_iter()
        .filter(|v| *v >= 1)
        .map(|v| (v - 1) as u64)
        .collect();

    records.retain(|r| wanted.contains(&r.row_id));
}
