//! Priority recomputation: base heuristic, then user rules.

use indexmap::IndexMap;

use crate::filter::FilterOp;
use crate::record::{Priority, RecordStore};
use crate::value::{normalize, parse_amount};

use super::rule::Rule;
use super::store::Settings;

/// Prefix that classifies a payment group as low priority.
const LOW_PRIORITY_PREFIX: &str = "PAY GROUP";

/// Reason strings attached by the base heuristic.
const REASON_BASE_HIGH: &str = "Base priority (SCF/Intercompany)";
const REASON_BASE_MEDIUM: &str = "Base priority (standard)";
const REASON_BASE_LOW: &str = "Base priority (Pay group)";
const REASON_BASE_DISABLED: &str = "Base heuristic disabled";

/// Computes the derived `priority`/`priority_reason` fields.
///
/// The engine owns only the detected classification-source column name;
/// rules and settings are handed in by the caller on every recompute, so
/// an external rule store stays the single source of truth.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    classification_column: Option<String>,
}

impl RuleEngine {
    /// Create an engine with no detected classification column. Every
    /// record starts Medium until rules say otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine keyed on the detected classification column.
    pub fn with_classification_column(column: impl Into<String>) -> Self {
        Self {
            classification_column: Some(column.into()),
        }
    }

    /// The detected classification-source column, if any.
    pub fn classification_column(&self) -> Option<&str> {
        self.classification_column.as_deref()
    }

    /// Recompute `priority` and `priority_reason` for the whole store.
    ///
    /// Phase one applies the built-in heuristic over the classification
    /// column (when detected and enabled); phase two applies the active
    /// user rules in stored order, last write winning.
    pub fn recompute(&self, store: &mut RecordStore, rules: &[Rule], settings: &Settings) {
        self.apply_base(store, settings);
        self.apply_overrides(store, rules);
    }

    /// Classify one classification-column value.
    pub fn base_priority(value: &str) -> Priority {
        let val = value.trim().to_uppercase();
        if val == "SCF" || val == "INTERCOMPANY" {
            Priority::High
        } else if val.starts_with(LOW_PRIORITY_PREFIX) {
            Priority::Low
        } else {
            Priority::Medium
        }
    }

    fn apply_base(&self, store: &mut RecordStore, settings: &Settings) {
        let column = self
            .classification_column
            .as_deref()
            .filter(|c| store.has_column(c));

        let Some(column) = column.filter(|_| settings.enable_base_heuristic) else {
            for record in store.records_mut() {
                record.priority = Priority::Medium;
                record.priority_reason = REASON_BASE_DISABLED.to_string();
            }
            return;
        };

        let column = column.to_string();
        for record in store.records_mut() {
            let priority = Self::base_priority(record.get(&column).unwrap_or(""));
            record.priority = priority;
            record.priority_reason = match priority {
                Priority::High => REASON_BASE_HIGH,
                Priority::Medium => REASON_BASE_MEDIUM,
                Priority::Low => REASON_BASE_LOW,
            }
            .to_string();
        }
    }

    fn apply_overrides(&self, store: &mut RecordStore, rules: &[Rule]) {
        // Group active rules by column so each column is normalized once,
        // not once per rule. Groups keep first-appearance order; rules
        // keep stored order within a group.
        let mut by_column: IndexMap<&str, Vec<&Rule>> = IndexMap::new();
        for rule in rules.iter().filter(|r| r.active && !r.column.is_empty()) {
            by_column.entry(rule.column.as_str()).or_default().push(rule);
        }

        for (column, group) in by_column {
            if !store.has_column(column) {
                continue;
            }

            let text_view: Vec<String> = store
                .records()
                .iter()
                .map(|r| normalize(r.get(column).unwrap_or("")))
                .collect();

            let needs_numbers = group.iter().any(|r| r.op.is_numeric());
            let numeric_view: Option<Vec<Option<f64>>> = needs_numbers.then(|| {
                store
                    .records()
                    .iter()
                    .map(|r| parse_amount(r.get(column).unwrap_or("")))
                    .collect()
            });

            for rule in group {
                let mask = rule_mask(rule, &text_view, numeric_view.as_deref());
                let Some(mask) = mask else { continue };

                for (record, hit) in store.records_mut().iter_mut().zip(&mask) {
                    if *hit {
                        record.priority = rule.priority;
                        record.priority_reason = rule.reason.clone();
                    }
                }
            }
        }
    }
}

/// Build the boolean mask for one rule, or `None` when the rule cannot
/// apply (numeric operator with an unparsable rule value).
fn rule_mask(
    rule: &Rule,
    text_view: &[String],
    numeric_view: Option<&[Option<f64>]>,
) -> Option<Vec<bool>> {
    if rule.op.is_numeric() {
        let target = parse_amount(&rule.value)?;
        let numbers = numeric_view?;
        Some(
            numbers
                .iter()
                .map(|cell| match cell {
                    Some(n) => match rule.op {
                        FilterOp::Greater => *n > target,
                        FilterOp::Less => *n < target,
                        FilterOp::GreaterEq => *n >= target,
                        FilterOp::LessEq => *n <= target,
                        _ => false,
                    },
                    // Unparsable cells never match a numeric rule.
                    None => false,
                })
                .collect(),
        )
    } else {
        let target = normalize(&rule.value);
        Some(
            text_view
                .iter()
                .map(|cell| match rule.op {
                    FilterOp::Equals => *cell == target,
                    FilterOp::NotEquals => *cell != target,
                    FilterOp::Contains => cell.contains(&target),
                    _ => false,
                })
                .collect(),
        )
    }
}
