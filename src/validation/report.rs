//! Validation report types and their display rendering.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// The four validation rules, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CheckKind {
    /// Required columns are present.
    Columns,
    /// Configured columns coerce to their declared type.
    DataTypes,
    /// Required columns have no empty cells.
    MissingValues,
    /// Numeric columns of every row sum to a positive value.
    Checksum,
}

impl CheckKind {
    /// Human-readable check name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Columns => "Columns Check",
            Self::DataTypes => "Data Types Check",
            Self::MissingValues => "Missing Values Check",
            Self::Checksum => "Checksum Check",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one rule on one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub check: CheckKind,
    pub passed: bool,
    pub message: String,
}

impl CheckResult {
    pub fn pass(check: CheckKind, message: impl Into<String>) -> Self {
        Self {
            check,
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(check: CheckKind, message: impl Into<String>) -> Self {
        Self {
            check,
            passed: false,
            message: message.into(),
        }
    }

    /// `✅` for a passing check, `❌` otherwise.
    pub fn icon(&self) -> &'static str {
        if self.passed { "✅" } else { "❌" }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.check, self.icon(), self.message)
    }
}

/// One invalid cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ErrorLocation {
    /// 0-based row position.
    pub row: usize,
    pub column: String,
}

impl ErrorLocation {
    pub fn new(row: usize, column: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
        }
    }
}

/// Every invalid cell of a table, ordered by row then column name.
pub type ErrorMap = BTreeSet<ErrorLocation>;

/// Format per-column offending rows as `col: [r1, r2]; col2: [r3]`.
pub(crate) fn format_rows_by_column(by_column: &[(&str, Vec<usize>)]) -> String {
    by_column
        .iter()
        .map(|(col, rows)| format!("{col}: {rows:?}"))
        .collect::<Vec<_>>()
        .join("; ")
}
