//! Filter predicates and their operator vocabulary.

use serde::{Deserialize, Serialize};

use crate::value::{normalize, parse_amount};

/// Comparison operator shared by filter predicates and priority rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Case-insensitive substring match.
    Contains,
    /// Case-insensitive full-string equality.
    Equals,
    /// Case-insensitive full-string inequality.
    NotEquals,
    Greater,
    Less,
    GreaterEq,
    LessEq,
}

impl FilterOp {
    /// Whether this operator compares numerically.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FilterOp::Greater | FilterOp::Less | FilterOp::GreaterEq | FilterOp::LessEq
        )
    }

    /// Parse the wire/CLI spelling of an operator.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "contains" => Some(FilterOp::Contains),
            "equals" | "eq" => Some(FilterOp::Equals),
            "not_equals" | "ne" => Some(FilterOp::NotEquals),
            "greater" | "gt" => Some(FilterOp::Greater),
            "less" | "lt" => Some(FilterOp::Less),
            "greater_eq" | "ge" => Some(FilterOp::GreaterEq),
            "less_eq" | "le" => Some(FilterOp::LessEq),
            _ => None,
        }
    }

    /// Get the canonical spelling.
    pub fn label(&self) -> &'static str {
        match self {
            FilterOp::Contains => "contains",
            FilterOp::Equals => "equals",
            FilterOp::NotEquals => "not_equals",
            FilterOp::Greater => "greater",
            FilterOp::Less => "less",
            FilterOp::GreaterEq => "greater_eq",
            FilterOp::LessEq => "less_eq",
        }
    }

    /// Evaluate this operator against one cell.
    ///
    /// String operators compare case-insensitively. Numeric operators
    /// clean currency symbols from both sides first; a cell or target
    /// that fails to parse never matches.
    pub fn matches(&self, cell: &str, target: &str) -> bool {
        match self {
            FilterOp::Contains => normalize(cell).contains(&normalize(target)),
            FilterOp::Equals => normalize(cell) == normalize(target),
            FilterOp::NotEquals => normalize(cell) != normalize(target),
            FilterOp::Greater | FilterOp::Less | FilterOp::GreaterEq | FilterOp::LessEq => {
                let (Some(cell_num), Some(target_num)) =
                    (parse_amount(cell), parse_amount(target))
                else {
                    return false;
                };
                match self {
                    FilterOp::Greater => cell_num > target_num,
                    FilterOp::Less => cell_num < target_num,
                    FilterOp::GreaterEq => cell_num >= target_num,
                    FilterOp::LessEq => cell_num <= target_num,
                    _ => unreachable!(),
                }
            }
        }
    }
}

impl std::fmt::Display for FilterOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single filter condition over one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    #[serde(default = "default_op")]
    pub op: FilterOp,
    pub value: String,
}

fn default_op() -> FilterOp {
    FilterOp::Contains
}

impl Predicate {
    /// Create a predicate.
    pub fn new(column: impl Into<String>, op: FilterOp, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// A predicate with an empty column or value is ignored by the
    /// evaluator.
    pub fn is_blank(&self) -> bool {
        self.column.trim().is_empty() || self.value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_case_insensitive() {
        assert!(FilterOp::Contains.matches("Pay Group 2", "group"));
        assert!(!FilterOp::Contains.matches("SCF", "group"));
    }

    #[test]
    fn test_equals_full_string() {
        assert!(FilterOp::Equals.matches(" Pending ", "pending"));
        assert!(!FilterOp::Equals.matches("Pending approval", "pending"));
        assert!(FilterOp::NotEquals.matches("Paid", "pending"));
    }

    #[test]
    fn test_numeric_operators_clean_currency() {
        assert!(FilterOp::Greater.matches("$5,000.00", "4999"));
        assert!(FilterOp::LessEq.matches("100", "$100"));
        assert!(!FilterOp::Less.matches("100", "$100"));
    }

    #[test]
    fn test_numeric_operator_non_numeric_cell_never_matches() {
        assert!(!FilterOp::Greater.matches("pending", "0"));
        assert!(!FilterOp::LessEq.matches("", "100"));
    }

    #[test]
    fn test_parse_operator_spellings() {
        assert_eq!(FilterOp::parse("greater_eq"), Some(FilterOp::GreaterEq));
        assert_eq!(FilterOp::parse("GE"), Some(FilterOp::GreaterEq));
        assert_eq!(FilterOp::parse("between"), None);
    }
}
