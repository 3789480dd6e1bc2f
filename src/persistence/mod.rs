//! Handing validated tables to the persistence collaborator.
//!
//! The crate does not manage connections. A [`Store`] implementation owns them; this module
//! decides *what* is written and *when*:
//!
//! - [`bootstrap_schema`] makes sure every registered target table exists (create-if-absent,
//!   never dropped or altered)
//! - [`publish`] appends a dataset only once every sheet passed validation, sheet by sheet
//!   in dataset order
//!
//! Publishing is best-effort append: when a store call fails, tables already appended in the
//! same run stay appended, and the error names them.

pub mod memory;
pub mod schema;
pub mod script;

use crate::error::{ImportError, ImportResult};
use crate::registry::{all_sheets, SheetConfig};
use crate::types::{Table, Value};
use crate::validation::DatasetValidation;

pub use memory::MemoryStore;
pub use schema::{create_table_sql, insert_sql, ID_COLUMN};
pub use script::SqlScriptStore;

/// Persistence collaborator.
pub trait Store {
    /// Create the sheet's target table if it does not exist yet.
    fn ensure_table(&mut self, sheet: &SheetConfig) -> ImportResult<()>;

    /// Append rows (configured columns, config order) to the sheet's target table.
    ///
    /// Returns the number of rows appended.
    fn append(&mut self, sheet: &SheetConfig, rows: &[Vec<Value>]) -> ImportResult<usize>;
}

/// What a successful [`publish`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSummary {
    /// `(table_name, rows appended)` in dataset order.
    pub tables: Vec<(&'static str, usize)>,
}

impl PublishSummary {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|(_, n)| n).sum()
    }
}

/// Ensure every registered sheet's target table exists.
pub fn bootstrap_schema(store: &mut dyn Store) -> ImportResult<()> {
    for sheet in all_sheets() {
        store.ensure_table(sheet)?;
    }
    Ok(())
}

/// Append every sheet of a validated dataset to `store`.
///
/// Fails with [`ImportError::ValidationFailed`] (writing nothing) unless every check of every
/// sheet passed. A store failure part-way returns [`ImportError::PublishAborted`].
pub fn publish(validation: &DatasetValidation, store: &mut dyn Store) -> ImportResult<PublishSummary> {
    if !validation.is_valid() {
        return Err(ImportError::ValidationFailed {
            dataset: validation.dataset.to_string(),
            failed_checks: validation.failed_check_count(),
        });
    }

    let mut tables: Vec<(&'static str, usize)> = Vec::with_capacity(validation.sheets.len());
    for sheet_result in &validation.sheets {
        let sheet = &sheet_result.sheet;
        let rows = project_rows(sheet, &sheet_result.table);
        let appended = store.append(sheet, &rows).map_err(|e| ImportError::PublishAborted {
            table: sheet.table_name.to_string(),
            persisted: tables.iter().map(|(t, _)| t.to_string()).collect(),
            source: Box::new(e),
        })?;
        tables.push((sheet.table_name, appended));
    }
    Ok(PublishSummary { tables })
}

/// Rows of `table` restricted to the configured columns, in config order.
///
/// Table columns that are not configured are not persisted; configured columns absent from
/// the table are written as nulls.
pub fn project_rows(sheet: &SheetConfig, table: &Table) -> Vec<Vec<Value>> {
    let idxs: Vec<Option<usize>> = sheet.columns.iter().map(|(name, _)| table.index_of(name)).collect();
    table
        .rows
        .iter()
        .map(|row| {
            idxs.iter()
                .map(|idx| idx.and_then(|i| row.get(i)).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect()
}
