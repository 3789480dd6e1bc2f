//! CSV loading.

use std::path::Path;

use crate::error::ImportResult;
use crate::types::{Table, Value};

/// Load a CSV file into a raw [`Table`].
///
/// Rules:
///
/// - The first record is the header row; header names are trimmed.
/// - Every cell is kept as text; coercion happens during validation.
/// - Empty (or whitespace-only) cells become [`Value::Null`].
/// - Records with a different field count than the header are an error.
pub fn read_csv_from_path(path: impl AsRef<Path>) -> ImportResult<Table> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    read_csv_from_reader(&mut rdr)
}

/// Load CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> ImportResult<Table> {
    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(raw_cell).collect());
    }

    Ok(Table::new(columns, rows))
}

fn raw_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::Utf8(trimmed.to_owned())
    }
}
