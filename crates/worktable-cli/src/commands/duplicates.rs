//! Duplicates command - list duplicate rows or keep only first occurrences.

use std::fs::File;
use std::path::PathBuf;

use colored::Colorize;
use worktable::export::write_records;
use worktable::input::Loader;

pub fn run(
    file: PathBuf,
    key: Vec<String>,
    cleanup: bool,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Loader::new().load(&file)?;
    let columns = session.store().columns().to_vec();

    let duplicates = session.find_duplicates(&key)?;
    if duplicates.is_empty() {
        println!("{}", "No duplicates found.".green());
        return Ok(());
    }

    super::print_rows(&columns, &duplicates, usize::MAX);
    println!();
    println!(
        "{} {}",
        duplicates.len().to_string().red().bold(),
        "rows belong to duplicate groups".red()
    );

    if !cleanup {
        return Ok(());
    }

    let outcome = session.cleanup_duplicates(&key)?;
    if verbose {
        println!("{}", outcome.message);
    }

    if let Some(path) = output {
        let out = File::create(&path)?;
        write_records(out, &columns, session.store().records(), None)?;
        println!(
            "{} {}",
            "Cleaned dataset written to".green(),
            path.display().to_string().white()
        );
    }

    Ok(())
}
