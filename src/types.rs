//! Core data model types.
//!
//! A [`Table`] is what a parse step hands to the validator: ordered column names and
//! row-major cells of dynamic [`Value`] type. Validation rewrites cells in place into the
//! [`TypeTag`] declared for their column.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{ImportError, ImportResult};

/// Display/serialization format for [`Value::DateTime`] cells.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Declared type of a configured column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Calendar date-time.
    DateTime,
    /// 64-bit floating point number.
    Float,
    /// Free text.
    String,
}

impl TypeTag {
    /// Lowercase tag name (`datetime`, `float`, `string`).
    pub fn name(self) -> &'static str {
        match self {
            Self::DateTime => "datetime",
            Self::Float => "float",
            Self::String => "string",
        }
    }

    /// Column type used in `CREATE TABLE` statements.
    ///
    /// Date-times are stored as `DATE`; every other tag uses its uppercase name.
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::DateTime => "DATE",
            Self::Float => "FLOAT",
            Self::String => "STRING",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "datetime" => Ok(Self::DateTime),
            "float" => Ok(Self::Float),
            "string" | "str" => Ok(Self::String),
            other => Err(ImportError::InvalidInput {
                message: format!("unknown type tag '{other}' (expected datetime/float/string)"),
            }),
        }
    }
}

/// A single cell.
///
/// Before validation a cell holds whatever the parser produced; after validation every
/// configured column holds only its declared variant or [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value, also the marker for cells that failed coercion.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Calendar date-time without zone.
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(i) => write!(f, "{i}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Utf8(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Utf8(s)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

/// In-memory table.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as [`Table::columns`]. A row's
/// position is its identifier in validation reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// Column names, in header order.
    pub columns: Vec<String>,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from column names and rows.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows,
        }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the table.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Cell at `(row, column)`, if both exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.index_of(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Check that column names are unique and every row has one cell per column.
    pub fn check_shape(&self) -> ImportResult<()> {
        for (i, name) in self.columns.iter().enumerate() {
            if self.columns[..i].contains(name) {
                return Err(ImportError::InvalidInput {
                    message: format!("duplicate column header '{name}'"),
                });
            }
        }
        let width = self.columns.len();
        if let Some((row, cells)) = self.rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(ImportError::InvalidInput {
                message: format!("row {row} has {} cells but the header has {width} columns", cells.len()),
            });
        }
        Ok(())
    }
}
