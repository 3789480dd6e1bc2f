#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{ImportError, ImportResult};
use crate::registry::SheetSelector;
use crate::types::{Table, Value};

/// Load one sheet of an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) into a raw [`Table`].
///
/// Behavior:
/// - Resolves `sheet` by position or tab name
/// - Detects the first non-empty row as the header row
/// - Keeps every later non-empty row, converting cells into dynamic [`Value`]s
pub fn read_sheet_from_path(path: impl AsRef<Path>, sheet: SheetSelector) -> ImportResult<Table> {
    let mut tables = read_sheets_from_path(path, &[sheet])?;
    tables.pop().ok_or_else(|| ImportError::InvalidInput {
        message: "workbook produced no table".to_string(),
    })
}

/// Load several sheets from one workbook, one [`Table`] per selector, in selector order.
pub fn read_sheets_from_path(path: impl AsRef<Path>, sheets: &[SheetSelector]) -> ImportResult<Vec<Table>> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_vec();
    if names.is_empty() {
        return Err(ImportError::InvalidInput {
            message: "workbook has no sheets".to_string(),
        });
    }

    let mut tables = Vec::with_capacity(sheets.len());
    for selector in sheets {
        let name = resolve_sheet_name(&names, *selector)?;
        let range = workbook.worksheet_range(name)?;
        let table = range_to_table(&range).map_err(|e| wrap_input_err_with_sheet(name, e))?;
        tables.push(table);
    }
    Ok(tables)
}

fn resolve_sheet_name(names: &[String], selector: SheetSelector) -> ImportResult<&str> {
    let found = match selector {
        SheetSelector::Index(i) => names.get(i),
        SheetSelector::Name(wanted) => names.iter().find(|n| n.as_str() == wanted),
    };
    found.map(String::as_str).ok_or_else(|| ImportError::InvalidInput {
        message: format!("worksheet {selector} not found. sheets={names:?}"),
    })
}

fn wrap_input_err_with_sheet(sheet: &str, err: ImportError) -> ImportError {
    match err {
        ImportError::InvalidInput { message } => ImportError::InvalidInput {
            message: format!("sheet '{sheet}': {message}"),
        },
        other => other,
    }
}

fn range_to_table(range: &calamine::Range<Data>) -> ImportResult<Table> {
    let mut rows_iter = range
        .rows()
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)));

    let header = rows_iter.next().ok_or_else(|| ImportError::InvalidInput {
        message: "sheet has no non-empty rows (no header row found)".to_string(),
    })?;
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, c)| match cell_to_header_string(c).trim() {
            "" => format!("Unnamed: {idx}"),
            name => name.to_string(),
        })
        .collect();

    let rows = rows_iter
        .map(|row| {
            (0..columns.len())
                .map(|i| convert_cell(row.get(i).unwrap_or(&Data::Empty)))
                .collect()
        })
        .collect();

    Ok(Table::new(columns, rows))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::Float(f) => Value::Float64(*f),
        Data::Int(i) => Value::Int64(*i),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => Value::Utf8(c.to_string()),
        // Honors the workbook's 1900/1904 date system.
        Data::DateTime(dt) => dt.as_datetime().map_or(Value::Null, Value::DateTime),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Utf8(s.clone()),
    }
}
