//! CLI command implementations.

pub mod duplicates;
pub mod export;
pub mod filter;
pub mod group;
pub mod rules;
pub mod summary;

use colored::Colorize;
use worktable::Record;

/// Render records as an aligned text table: `Row #` first (1-based),
/// then the dynamic columns, then the derived status and priority.
pub(crate) fn print_rows(columns: &[String], records: &[Record], limit: usize) {
    let mut headers: Vec<String> = vec!["Row #".to_string()];
    headers.extend(columns.iter().cloned());
    headers.push("Row Status".to_string());
    headers.push("Priority".to_string());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in records.iter().take(limit) {
        let mut row = vec![(record.row_id + 1).to_string()];
        for column in columns {
            row.push(record.get(column).unwrap_or("").to_string());
        }
        row.push(record.row_status.label().to_string());
        row.push(record.priority.label().to_string());
        rows.push(row);
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<width$}", h, width = *w))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header_line.bold());

    for row in &rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line);
    }

    if records.len() > limit {
        println!(
            "{}",
            format!("... {} more rows", records.len() - limit).dimmed()
        );
    }
}
