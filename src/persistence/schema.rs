//! SQL text for the persistence collaborator.

use crate::registry::SheetConfig;
use crate::types::{Value, DATETIME_FORMAT};

/// Name of the surrogate key column every target table carries.
pub const ID_COLUMN: &str = "id";

/// `CREATE TABLE IF NOT EXISTS` statement for a sheet's target table.
///
/// The table gets an auto-incrementing surrogate key plus one column per configured column,
/// in config order.
pub fn create_table_sql(sheet: &SheetConfig) -> String {
    let cols: Vec<String> = sheet
        .columns
        .iter()
        .map(|(name, tag)| format!("{name} {}", tag.sql_type()))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({ID_COLUMN} INTEGER PRIMARY KEY AUTOINCREMENT, {})",
        sheet.table_name,
        cols.join(", ")
    )
}

/// `INSERT` statement appending one row (configured columns, config order).
pub fn insert_sql(sheet: &SheetConfig, row: &[Value]) -> String {
    let names: Vec<&str> = sheet.columns.iter().map(|(name, _)| *name).collect();
    let values: Vec<String> = row.iter().map(sql_literal).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        sheet.table_name,
        names.join(", "),
        values.join(", ")
    )
}

/// Render a cell as a SQL literal.
pub fn sql_literal(v: &Value) -> String {
    match v {
        Value::Null => "NULL".to_string(),
        Value::Int64(i) => i.to_string(),
        Value::Float64(f) if f.is_finite() => format!("{f:?}"),
        Value::Float64(_) => "NULL".to_string(),
        Value::Bool(b) => u8::from(*b).to_string(),
        Value::Utf8(s) => quote(s),
        Value::DateTime(dt) => quote(&dt.format(DATETIME_FORMAT).to_string()),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
