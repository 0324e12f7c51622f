//! Summary command - KPIs, detected columns and row-status counts.

use std::path::PathBuf;

use colored::Colorize;
use worktable::input::Loader;
use worktable::{Priority, RowStatus};

pub fn run(
    file: PathBuf,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Loader::new().load(&file)?;
    let store = session.store();
    let kpis = session.kpis();

    let complete = store
        .records()
        .iter()
        .filter(|r| r.row_status == RowStatus::Complete)
        .count();
    let incomplete = store.len() - complete;

    let count_priority = |p: Priority| store.records().iter().filter(|r| r.priority == p).count();
    let high = count_priority(Priority::High);
    let medium = count_priority(Priority::Medium);
    let low = count_priority(Priority::Low);

    if json_output {
        let summary = serde_json::json!({
            "file": file.display().to_string(),
            "dataset_id": session.dataset_id(),
            "columns": store.columns(),
            "classification_column": session.classification_column(),
            "amount_column": session.amount_column(),
            "kpis": kpis,
            "row_status": { "complete": complete, "incomplete": incomplete },
            "priority": { "high": high, "medium": medium, "low": low },
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Summary for".cyan().bold(),
        file.display().to_string().white()
    );
    if verbose {
        println!("Dataset id: {}", session.dataset_id());
    }
    println!();

    println!("{}", "Columns:".yellow().bold());
    for column in store.columns() {
        let marker = if Some(column.as_str()) == session.amount_column() {
            " (amount)"
        } else if Some(column.as_str()) == session.classification_column() {
            " (classification)"
        } else {
            ""
        };
        println!("  {}{}", column, marker.dimmed());
    }
    println!();

    println!("{}", "KPIs:".yellow().bold());
    println!("  Records: {}", kpis.record_count.to_string().white().bold());
    println!("  Total:   {}", kpis.total_amount.green());
    println!("  Average: {}", kpis.average_amount.green());
    println!();

    println!("{}", "Rows:".yellow().bold());
    println!("  Complete:   {}", complete.to_string().green());
    println!("  Incomplete: {}", incomplete.to_string().red());
    println!();

    println!("{}", "Priority:".yellow().bold());
    println!("  High:   {}", high.to_string().red());
    println!("  Medium: {}", medium.to_string().yellow());
    println!("  Low:    {}", low.to_string().blue());

    Ok(())
}
