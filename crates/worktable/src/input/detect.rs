//! Header-name detection for the special columns the engine keys on.

/// Header names accepted as the classification-source column.
const CLASSIFICATION_CANDIDATES: &[&str] = &["pay group", "paygroup", "grupo de pago"];

/// Header names accepted as the monetary column used for KPIs and
/// grouped aggregation.
const AMOUNT_CANDIDATES: &[&str] = &["monto", "total", "amount", "total amount"];

fn find_by_name(columns: &[String], candidates: &[&str]) -> Option<String> {
    columns
        .iter()
        .find(|c| candidates.contains(&c.trim().to_lowercase().as_str()))
        .cloned()
}

/// Find the payment-group-like column driving the base heuristic.
pub fn detect_classification_column(columns: &[String]) -> Option<String> {
    find_by_name(columns, CLASSIFICATION_CANDIDATES)
}

/// Find the monetary column used for KPIs and grouping.
pub fn detect_amount_column(columns: &[String]) -> Option<String> {
    find_by_name(columns, AMOUNT_CANDIDATES)
}
