//! Dynamic multi-operator filtering over the record store.
//!
//! Predicates on the same column are OR-combined; the per-column results
//! are AND-combined across columns.

mod evaluate;
mod predicate;

pub use evaluate::{evaluate, FilterOutcome, ROW_ID_COLUMN};
pub use predicate::{FilterOp, Predicate};
