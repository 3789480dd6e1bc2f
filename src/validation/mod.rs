//! Validation of loaded tables against their [`SheetConfig`].
//!
//! [`validate`] runs four rules in a fixed order. None of them short-circuits, so one run
//! gives the complete picture:
//!
//! 1. **Columns Check**: every required column is present.
//! 2. **Data Types Check**: configured columns are coerced to their declared type; cells that
//!    cannot be coerced become [`Value::Null`](crate::types::Value::Null). Empty cells in
//!    `datetime` and `float` columns fail this check as well.
//! 3. **Missing Values Check**: required columns hold no nulls (including coercion nulls).
//! 4. **Checksum Check**: the numeric columns of every row sum to a strictly positive value.
//!    Skipped when the sheet has no numeric columns.
//!
//! Data-quality problems never produce an `Err`; they show up as failing [`CheckResult`]s
//! and as cells in the [`ErrorMap`].
//!
//! ```rust
//! use sheet_import::registry::get_config;
//! use sheet_import::types::{Table, Value};
//! use sheet_import::validation::validate;
//!
//! # fn main() -> Result<(), sheet_import::ImportError> {
//! let sheet = &get_config("Valuations")?.sheets[0];
//! let table = Table::new(
//!     ["date", "asset", "value"],
//!     vec![vec![Value::from("bad-date"), Value::from("AAPL"), Value::from("100")]],
//! );
//!
//! let result = validate(table, sheet)?;
//! assert!(!result.is_valid());
//! assert_eq!(result.errors.len(), 1);
//! # Ok(())
//! # }
//! ```

mod checks;
mod coerce;
mod report;

use std::fmt::Write as _;

use serde::Serialize;

use crate::error::{ImportError, ImportResult};
use crate::registry::{DatasetConfig, SheetConfig};
use crate::types::Table;

pub use report::{CheckKind, CheckResult, ErrorLocation, ErrorMap};

/// Result of validating one sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetValidation {
    /// Config the table was checked against.
    pub sheet: SheetConfig,
    /// Table with configured columns coerced to their declared types.
    pub table: Table,
    /// One result per rule, in run order.
    pub checks: Vec<CheckResult>,
    /// Every invalid cell.
    pub errors: ErrorMap,
}

impl SheetValidation {
    /// `true` when every check passed.
    pub fn is_valid(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Failing checks, in run order.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }

    /// Row × column grid, `true` where the cell is in [`Self::errors`].
    pub fn highlight_mask(&self) -> Vec<Vec<bool>> {
        let mut mask = vec![vec![false; self.table.column_count()]; self.table.row_count()];
        for loc in &self.errors {
            if let (Some(row), Some(col)) = (mask.get_mut(loc.row), self.table.index_of(&loc.column)) {
                row[col] = true;
            }
        }
        mask
    }

    /// Plain-text preview of the table with invalid cells wrapped in `[! ]`.
    pub fn render_preview(&self) -> String {
        let mask = self.highlight_mask();
        let mut out = String::new();
        let _ = writeln!(out, "row\t{}", self.table.columns.join("\t"));
        for (row_idx, (row, flags)) in self.table.rows.iter().zip(&mask).enumerate() {
            let cells: Vec<String> = row
                .iter()
                .zip(flags)
                .map(|(v, &bad)| if bad { format!("[!{v}]") } else { v.to_string() })
                .collect();
            let _ = writeln!(out, "{row_idx}\t{}", cells.join("\t"));
        }
        out
    }
}

/// Result of validating every sheet of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetValidation {
    pub dataset: &'static str,
    /// One entry per sheet, in the dataset's sheet order.
    pub sheets: Vec<SheetValidation>,
}

impl DatasetValidation {
    /// `true` when every sheet passed every check.
    pub fn is_valid(&self) -> bool {
        self.sheets.iter().all(SheetValidation::is_valid)
    }

    /// Messages of all failing checks, in sheet then check order.
    pub fn failure_messages(&self) -> Vec<String> {
        self.sheets
            .iter()
            .flat_map(|s| s.failures().map(|c| c.message.clone()))
            .collect()
    }

    pub fn failed_check_count(&self) -> usize {
        self.sheets.iter().map(|s| s.failures().count()).sum()
    }

    pub fn error_cell_count(&self) -> usize {
        self.sheets.iter().map(|s| s.errors.len()).sum()
    }

    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|s| s.table.row_count()).sum()
    }

    /// Human-readable summary: one line per check (grouped by sheet when the dataset has
    /// more than one) followed by the overall verdict.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let multi = self.sheets.len() > 1;
        for sheet in &self.sheets {
            if multi {
                let _ = writeln!(out, "Sheet: {}", sheet.sheet.label());
            }
            for check in &sheet.checks {
                let _ = writeln!(out, "{check}");
            }
        }
        if self.is_valid() {
            out.push_str("All Validations Passed!\n");
        } else {
            out.push_str("Validation Errors Found - Fix issues before publishing.\n");
        }
        out
    }
}

/// Validate one table against its sheet config.
///
/// Returns `Err` only for faults that make checking meaningless:
///
/// - [`ImportError::ConfigMismatch`] when the config violates its own invariants, the table
///   has no columns, or a numeric column that is not required is absent from the table
/// - [`ImportError::InvalidInput`] when column names repeat or rows are ragged
pub fn validate(mut table: Table, sheet: &SheetConfig) -> ImportResult<SheetValidation> {
    sheet.check_invariants()?;
    if table.column_count() == 0 {
        return Err(sheet.mismatch("table has no columns".to_string()));
    }
    table.check_shape()?;
    if let Some(col) = sheet
        .numeric_cols
        .iter()
        .find(|col| !sheet.is_required(col) && !table.has_column(col))
    {
        return Err(sheet.mismatch(format!("numeric column '{col}' is absent from the table")));
    }

    let mut errors = ErrorMap::new();
    let mut results = vec![
        checks::column_presence(&table, sheet),
        checks::type_coercion(&mut table, sheet, &mut errors),
        checks::missing_values(&table, sheet, &mut errors),
    ];
    if !sheet.numeric_cols.is_empty() {
        results.push(checks::checksum(&table, sheet, &mut errors));
    }

    Ok(SheetValidation {
        sheet: *sheet,
        table,
        checks: results,
        errors,
    })
}

/// Validate one table per sheet of `dataset`, sequentially and in sheet order.
///
/// `tables[i]` is checked against `dataset.sheets[i]`.
pub fn validate_dataset(dataset: &'static DatasetConfig, tables: Vec<Table>) -> ImportResult<DatasetValidation> {
    check_table_count(dataset, &tables)?;
    let sheets = dataset
        .sheets
        .iter()
        .zip(tables)
        .map(|(sheet, table)| validate(table, sheet))
        .collect::<ImportResult<Vec<_>>>()?;
    Ok(DatasetValidation {
        dataset: dataset.name,
        sheets,
    })
}

pub(crate) fn check_table_count(dataset: &DatasetConfig, tables: &[Table]) -> ImportResult<()> {
    if tables.len() == dataset.sheets.len() {
        return Ok(());
    }
    Err(ImportError::ConfigMismatch {
        table: dataset.name.to_string(),
        message: format!(
            "dataset has {} sheet(s) but {} table(s) were supplied",
            dataset.sheets.len(),
            tables.len()
        ),
    })
}
