//! Export command - write a filtered, projected view as CSV.

use std::fs::File;
use std::path::PathBuf;

use colored::Colorize;
use worktable::Predicate;
use worktable::export::write_records;
use worktable::input::Loader;

pub fn run(
    file: PathBuf,
    output: PathBuf,
    conditions: Vec<Predicate>,
    columns: Vec<String>,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Loader::new().load(&file)?;
    let view = session.filter(&conditions);

    for warning in &view.outcome.warnings {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning);
    }

    let visible = if columns.is_empty() {
        None
    } else {
        Some(columns.as_slice())
    };

    let out = File::create(&output)?;
    write_records(out, session.store().columns(), &view.outcome.records, visible)?;

    println!(
        "{} {} rows to {}",
        "Exported".green().bold(),
        view.outcome.records.len(),
        output.display().to_string().white()
    );

    Ok(())
}
