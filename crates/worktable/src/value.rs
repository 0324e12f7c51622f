//! Scalar value helpers shared by the filter evaluator, the rule engine
//! and KPI aggregation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters stripped before a cell is treated as a number.
static CURRENCY_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[$,]").expect("valid regex"));

/// Parse a cell as a monetary amount.
///
/// Strips currency symbols (`$`, `,`) and surrounding whitespace, then
/// parses as `f64`. Returns `None` when the remainder is empty or not a
/// number; callers treat that as "does not match" rather than an error.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = CURRENCY_CHARS.replace_all(raw.trim(), "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Format an amount the way the UI and exports expect: `$#,##0.00`.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-${}.{:02}", grouped, fraction)
    } else {
        format!("${}.{:02}", grouped, fraction)
    }
}

/// Normalize a cell for case-insensitive comparison: trim + lowercase.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}
