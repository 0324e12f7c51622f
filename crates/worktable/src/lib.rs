//! Worktable: a stateful tabular-edit engine.
//!
//! Worktable holds one spreadsheet-shaped dataset per editing session and
//! lets a caller filter it, edit single cells or whole selections, detect
//! and remove duplicates, and undo any of those changes. Every mutation is
//! reversible (bounded undo history) and attributable (append-only audit
//! log).
//!
//! # Core Principles
//!
//! - **Single writer per session**: all engine state lives in an explicit
//!   [`Session`]; there are no globals.
//! - **Reversible**: each mutating operation pushes exactly one typed
//!   inverse entry onto the history stack.
//! - **Attributable**: the audit log only ever grows; undoing an action
//!   records a new entry rather than erasing the original.
//!
//! # Example
//!
//! ```no_run
//! use worktable::input::Loader;
//!
//! let mut session = Loader::new().load("invoices.csv").unwrap();
//!
//! let outcome = session.update_cell(5, "Status", "Approved").unwrap();
//! println!("history depth: {}", outcome.history_len);
//!
//! session.undo().unwrap();
//! ```

pub mod audit;
pub mod dedup;
pub mod error;
pub mod export;
pub mod filter;
pub mod history;
pub mod input;
pub mod kpi;
pub mod record;
pub mod rules;
pub mod value;

mod session;

pub use crate::session::{FilterView, MutationOutcome, MutationStatus, Session};
pub use error::{Result, WorktableError};
pub use filter::{FilterOp, FilterOutcome, Predicate};
pub use history::{HistoryEntry, HistoryManager, UndoTarget};
pub use kpi::KpiSummary;
pub use record::{Priority, Record, RecordStore, RowStatus};
pub use rules::{Rule, RuleEngine, RuleStore, Settings};
