//! Group command - aggregate the amount column per grouping value.

use std::path::PathBuf;

use colored::Colorize;
use worktable::Predicate;
use worktable::input::Loader;

pub fn run(
    file: PathBuf,
    by: String,
    conditions: Vec<Predicate>,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Loader::new().load(&file)?;
    let view = session.filter(&conditions);

    for warning in &view.outcome.warnings {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning);
    }

    let groups = session.group_by(&by, &conditions)?;

    println!("{} {}", "Grouped by".cyan().bold(), by.white());
    println!();

    let header = format!(
        "{:<24} {:>14} {:>14} {:>12} {:>12} {:>7}",
        "Key", "Total", "Average", "Min", "Max", "Count"
    );
    println!("{}", header.bold());

    for group in &groups {
        println!(
            "{:<24} {:>14.2} {:>14.2} {:>12.2} {:>12.2} {:>7}",
            group.key, group.sum, group.mean, group.min, group.max, group.count
        );
    }

    Ok(())
}
