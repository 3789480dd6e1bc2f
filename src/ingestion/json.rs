//! JSON loading.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Columns are the union of object keys in first-seen order; a key absent from an object
//! is an empty cell.

use std::fs;
use std::path::Path;

use crate::error::{ImportError, ImportResult};
use crate::types::{Table, Value};

/// Load JSON from a file into a raw [`Table`].
pub fn read_json_from_path(path: impl AsRef<Path>) -> ImportResult<Table> {
    let text = fs::read_to_string(path)?;
    read_json_from_str(&text)
}

/// Load JSON from an in-memory string into a raw [`Table`].
pub fn read_json_from_str(input: &str) -> ImportResult<Table> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ImportError::InvalidInput {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => json_values_to_table(&items),
            serde_json::Value::Object(_) => json_values_to_table(std::slice::from_ref(&v)),
            _ => Err(ImportError::InvalidInput {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| ImportError::InvalidInput {
                message: format!("invalid ndjson at line {}: {}", i + 1, e),
            })?;
            values.push(v);
        }
        json_values_to_table(&values)
    }
}

fn json_values_to_table(values: &[serde_json::Value]) -> ImportResult<Table> {
    let mut objects = Vec::with_capacity(values.len());
    let mut columns: Vec<String> = Vec::new();

    for (idx0, v) in values.iter().enumerate() {
        let obj = v.as_object().ok_or_else(|| ImportError::InvalidInput {
            message: format!("row {idx0} is not a json object"),
        })?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            columns
                .iter()
                .map(|c| obj.get(c).map_or(Value::Null, convert_json_value))
                .collect()
        })
        .collect();

    Ok(Table::new(columns, rows))
}

fn convert_json_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map_or(Value::Null, Value::Float64),
        },
        serde_json::Value::String(s) if s.trim().is_empty() => Value::Null,
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        // Nested structures are kept as their JSON text.
        other => Value::Utf8(other.to_string()),
    }
}
