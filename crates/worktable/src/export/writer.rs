//! CSV output for filtered views and grouped aggregations.

use std::io::Write;

use crate::error::Result;
use crate::record::Record;

use super::group::GroupRow;

/// Column header for the exported row identity. Values are 1-based.
const ROW_NUMBER_HEADER: &str = "Row #";

/// Write records as CSV.
///
/// The row id goes first as a 1-based `Row #` column and survives any
/// visible-column projection. Derived fields are appended as trailing
/// `Row Status` and `Priority` columns.
pub fn write_records<W: Write>(
    writer: W,
    columns: &[String],
    records: &[Record],
    visible: Option<&[String]>,
) -> Result<()> {
    let selected: Vec<&String> = match visible {
        Some(names) => columns.iter().filter(|c| names.contains(c)).collect(),
        None => columns.iter().collect(),
    };

    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = vec![ROW_NUMBER_HEADER];
    header.extend(selected.iter().map(|c| c.as_str()));
    header.push("Row Status");
    header.push("Priority");
    csv_writer.write_record(&header)?;

    for record in records {
        let mut row: Vec<String> = vec![(record.row_id + 1).to_string()];
        for column in &selected {
            row.push(record.get(column).unwrap_or("").to_string());
        }
        row.push(record.row_status.label().to_string());
        row.push(record.priority.label().to_string());
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write a grouped aggregation as CSV.
pub fn write_groups<W: Write>(writer: W, group_column: &str, groups: &[GroupRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        group_column,
        "Total Amount",
        "Average Amount",
        "Min Amount",
        "Max Amount",
        "Invoice Count",
    ])?;

    for group in groups {
        csv_writer.write_record([
            group.key.as_str(),
            &format!("{:.2}", group.sum),
            &format!("{:.2}", group.mean),
            &format!("{:.2}", group.min),
            &format!("{:.2}", group.max),
            &group.count.to_string(),
        ])?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
