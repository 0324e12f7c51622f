//! Grouped aggregation of the monetary column.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorktableError};
use crate::record::Record;
use crate::value::parse_amount;

/// Aggregates for one group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    /// Value of the grouping column.
    pub key: String,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Group `records` by one column and aggregate the amount column
/// (sum/mean/min/max/count), sorted by sum descending.
///
/// Cells that fail to parse as amounts count as zero, matching the KPI
/// treatment. A missing grouping column is a `ColumnNotFound` error; a
/// missing amount column aggregates zeros.
pub fn group_records(
    columns: &[String],
    records: &[Record],
    group_column: &str,
    amount_column: Option<&str>,
) -> Result<Vec<GroupRow>> {
    if !columns.iter().any(|c| c == group_column) {
        return Err(WorktableError::ColumnNotFound(group_column.to_string()));
    }

    let mut amounts_by_key: IndexMap<String, Vec<f64>> = IndexMap::new();
    for record in records {
        let key = record.get(group_column).unwrap_or("").to_string();
        let amount = amount_column
            .and_then(|c| record.get(c))
            .and_then(parse_amount)
            .unwrap_or(0.0);
        amounts_by_key.entry(key).or_default().push(amount);
    }

    let mut groups: Vec<GroupRow> = amounts_by_key
        .into_iter()
        .map(|(key, amounts)| {
            let sum: f64 = amounts.iter().sum();
            let count = amounts.len();
            GroupRow {
                key,
                sum,
                mean: sum / count as f64,
                min: amounts.iter().copied().fold(f64::INFINITY, f64::min),
                max: amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                count,
            }
        })
        .collect();

    groups.sort_by(|a, b| b.sum.partial_cmp(&a.sum).unwrap_or(std::cmp::Ordering::Equal));
    Ok(groups)
}
