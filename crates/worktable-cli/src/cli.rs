//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use worktable::{FilterOp, Predicate, Priority};

/// Worktable: spreadsheet-style tabular dataset editor
#[derive(Parser)]
#[command(name = "worktable")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show KPIs, detected columns and row-status counts
    Summary {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Filter rows and show them with KPIs over the visible subset
    Filter {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Filter condition, COLUMN:OP:VALUE (repeatable). OP is one of
        /// contains, equals, not_equals, greater, less, greater_eq,
        /// less_eq; COLUMN:VALUE defaults to contains.
        #[arg(long = "where", value_name = "COND", value_parser = parse_predicate)]
        conditions: Vec<Predicate>,

        /// Maximum number of rows to print
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Aggregate the amount column per value of one grouping column
    Group {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column to group by
        #[arg(short, long, value_name = "COLUMN")]
        by: String,

        /// Filter condition applied before grouping (repeatable)
        #[arg(long = "where", value_name = "COND", value_parser = parse_predicate)]
        conditions: Vec<Predicate>,
    },

    /// Find duplicate rows, optionally keeping only the first of each
    Duplicates {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Key column (repeatable; default: detected invoice-number column)
        #[arg(short, long, value_name = "COLUMN")]
        key: Vec<String>,

        /// Remove duplicates instead of only listing them
        #[arg(long, requires = "output")]
        cleanup: bool,

        /// Where to write the cleaned dataset
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage the priority-rule document
    Rules {
        /// Path to the rules JSON file
        #[arg(short, long, default_value = "priority_rules.json")]
        file: PathBuf,

        #[command(subcommand)]
        action: RulesAction,
    },

    /// Export rows (optionally filtered and projected) as CSV
    Export {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the exported CSV
        #[arg(short, long)]
        output: PathBuf,

        /// Filter condition applied before exporting (repeatable)
        #[arg(long = "where", value_name = "COND", value_parser = parse_predicate)]
        conditions: Vec<Predicate>,

        /// Columns to keep (repeatable; default: all)
        #[arg(short, long, value_name = "COLUMN")]
        columns: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum RulesAction {
    /// List rules and settings
    List,

    /// Add a rule, replacing any rule with the same column/operator/value
    Add {
        /// Column the rule matches against
        column: String,

        /// Value to compare with
        value: String,

        /// Priority to assign (high, medium, low)
        #[arg(value_parser = parse_priority)]
        priority: Priority,

        /// Comparison operator
        #[arg(long, default_value = "equals", value_parser = parse_op)]
        op: FilterOp,

        /// Explanation recorded as the priority reason
        #[arg(long, default_value = "")]
        reason: String,
    },

    /// Remove the rule with the given column/operator/value
    Remove {
        column: String,
        value: String,

        #[arg(long, default_value = "equals", value_parser = parse_op)]
        op: FilterOp,
    },

    /// Enable or disable a rule without removing it
    Toggle {
        column: String,
        value: String,

        #[arg(long, default_value = "equals", value_parser = parse_op)]
        op: FilterOp,

        /// Disable instead of enable
        #[arg(long)]
        off: bool,
    },
}

/// Parse a `COLUMN:OP:VALUE` (or `COLUMN:VALUE`) filter condition.
fn parse_predicate(raw: &str) -> Result<Predicate, String> {
    let mut parts = raw.splitn(3, ':');
    let column = parts.next().unwrap_or("").trim();
    let second = parts.next();
    let third = parts.next();

    if column.is_empty() {
        return Err(format!(
            "Invalid condition: {}. Use COLUMN:OP:VALUE or COLUMN:VALUE.",
            raw
        ));
    }

    match (second, third) {
        (Some(op_raw), Some(value)) => {
            let op = FilterOp::parse(op_raw).ok_or_else(|| {
                format!(
                    "Unknown operator: {}. Use contains, equals, not_equals, greater, less, greater_eq, or less_eq.",
                    op_raw
                )
            })?;
            Ok(Predicate::new(column, op, value))
        }
        (Some(value), None) => Ok(Predicate::new(column, FilterOp::Contains, value)),
        _ => Err(format!(
            "Invalid condition: {}. Use COLUMN:OP:VALUE or COLUMN:VALUE.",
            raw
        )),
    }
}

fn parse_op(raw: &str) -> Result<FilterOp, String> {
    FilterOp::parse(raw).ok_or_else(|| {
        format!(
            "Unknown operator: {}. Use contains, equals, not_equals, greater, less, greater_eq, or less_eq.",
            raw
        )
    })
}

fn parse_priority(raw: &str) -> Result<Priority, String> {
    match raw.trim().to_lowercase().as_str() {
        "high" => Ok(Priority::High),
        "medium" => Ok(Priority::Medium),
        "low" => Ok(Priority::Low),
        _ => Err(format!("Unknown priority: {}. Use high, medium, or low.", raw)),
    }
}
