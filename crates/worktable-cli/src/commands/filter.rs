//! Filter command - filtered rows plus KPIs over the visible subset.

use std::path::PathBuf;

use colored::Colorize;
use worktable::Predicate;
use worktable::input::Loader;

pub fn run(
    file: PathBuf,
    conditions: Vec<Predicate>,
    limit: usize,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Loader::new().load(&file)?;
    let view = session.filter(&conditions);

    for warning in &view.outcome.warnings {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning);
    }

    super::print_rows(session.store().columns(), &view.outcome.records, limit);

    println!();
    println!(
        "{} rows, total {}, average {}",
        view.kpis.record_count.to_string().white().bold(),
        view.kpis.total_amount.green(),
        view.kpis.average_amount.green()
    );

    Ok(())
}
