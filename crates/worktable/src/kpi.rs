//! Aggregate KPIs returned with every operation result.

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::value::{format_currency, parse_amount};

/// Record count plus monetary sum/mean over the detected amount column.
///
/// Every mutating operation and every filter call returns one of these
/// so the caller can render consistent UI state without re-fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    /// Number of records in the view.
    pub record_count: usize,
    /// Sum over the amount column, formatted as currency.
    pub total_amount: String,
    /// Mean over the amount column, formatted as currency.
    pub average_amount: String,
}

impl KpiSummary {
    /// Summarize a view. Cells that fail to parse count as zero; a
    /// missing amount column yields zero sums.
    pub fn over(records: &[Record], amount_column: Option<&str>) -> Self {
        let mut total = 0.0;
        if let Some(column) = amount_column {
            for record in records {
                total += record.get(column).and_then(parse_amount).unwrap_or(0.0);
            }
        }

        let mean = if records.is_empty() || amount_column.is_none() {
            0.0
        } else {
            total / records.len() as f64
        };

        Self {
            record_count: records.len(),
            total_amount: format_currency(total),
            average_amount: format_currency(mean),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use indexmap::IndexMap;

    fn record(id: u64, total: &str) -> Record {
        let mut fields = IndexMap::new();
        fields.insert("Total".to_string(), total.to_string());
        Record::new(id, fields)
    }

    #[test]
    fn test_kpis_clean_currency_and_skip_bad_cells() {
        let records = vec![record(0, "$1,000.00"), record(1, "500"), record(2, "n/a")];
        let kpis = KpiSummary::over(&records, Some("Total"));
        assert_eq!(kpis.record_count, 3);
        assert_eq!(kpis.total_amount, "$1,500.00");
        assert_eq!(kpis.average_amount, "$500.00");
    }

    #[test]
    fn test_kpis_without_amount_column() {
        let records = vec![record(0, "100")];
        let kpis = KpiSummary::over(&records, None);
        assert_eq!(kpis.total_amount, "$0.00");
        assert_eq!(kpis.average_amount, "$0.00");
    }

    #[test]
    fn test_kpis_empty_view() {
        let kpis = KpiSummary::over(&[], Some("Total"));
        assert_eq!(kpis.record_count, 0);
        assert_eq!(kpis.total_amount, "$0.00");
    }
}
