//! User-defined priority override rules.

use serde::{Deserialize, Serialize};

use crate::filter::FilterOp;
use crate::record::Priority;

/// A user-defined override applied after the base heuristic.
///
/// Rules share the filter operator vocabulary. They are applied in
/// stored order; when two rules match the same record, the later one
/// wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub column: String,
    #[serde(default = "default_op")]
    pub op: FilterOp,
    pub value: String,
    pub priority: Priority,
    #[serde(default)]
    pub reason: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_op() -> FilterOp {
    FilterOp::Equals
}

fn default_active() -> bool {
    true
}

impl Rule {
    /// Create an active rule.
    pub fn new(
        column: impl Into<String>,
        op: FilterOp,
        value: impl Into<String>,
        priority: Priority,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
            priority,
            reason: reason.into(),
            active: true,
        }
    }

    /// Rules are identified by their criterion, not their outcome:
    /// saving a rule with the same column/operator/value replaces the
    /// previous one.
    pub fn same_criterion(&self, column: &str, value: &str, op: FilterOp) -> bool {
        self.column == column && self.value == value && self.op == op
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_criterion_ignores_outcome() {
        let a = Rule::new("Status", FilterOp::Equals, "Other", Priority::High, "VIP");
        assert!(a.same_criterion("Status", "Other", FilterOp::Equals));
        assert!(!a.same_criterion("Status", "Other", FilterOp::Contains));
        assert!(!a.same_criterion("Vendor", "Other", FilterOp::Equals));
    }

    #[test]
    fn test_defaults_on_deserialize() {
        let rule: Rule = serde_json::from_str(
            r#"{"column":"Total","value":"5000","priority":"high"}"#,
        )
        .unwrap();
        assert_eq!(rule.op, FilterOp::Equals);
        assert!(rule.active);
        assert!(rule.reason.is_empty());
    }
}
