//! Worktable CLI - spreadsheet-style tabular dataset editor.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Summary { file, json } => commands::summary::run(file, json, cli.verbose),

        Commands::Filter {
            file,
            conditions,
            limit,
        } => commands::filter::run(file, conditions, limit, cli.verbose),

        Commands::Group {
            file,
            by,
            conditions,
        } => commands::group::run(file, by, conditions, cli.verbose),

        Commands::Duplicates {
            file,
            key,
            cleanup,
            output,
        } => commands::duplicates::run(file, key, cleanup, output, cli.verbose),

        Commands::Rules { file, action } => commands::rules::run(file, action, cli.verbose),

        Commands::Export {
            file,
            output,
            conditions,
            columns,
        } => commands::export::run(file, output, conditions, columns, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
