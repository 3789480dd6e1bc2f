use std::collections::HashMap;

use crate::error::{ImportError, ImportResult};
use crate::registry::SheetConfig;
use crate::types::Value;

use super::Store;

/// A target table held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredTable {
    /// Column names, excluding the surrogate key.
    pub columns: Vec<&'static str>,
    /// `(id, cells)`; ids start at 1 and increase by one per appended row.
    pub rows: Vec<(u64, Vec<Value>)>,
    next_id: u64,
}

/// In-process [`Store`], useful for previews and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: HashMap<&'static str, StoredTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&StoredTable> {
        self.tables.get(name)
    }

    /// Number of rows in `name`, or `None` if the table does not exist.
    pub fn row_count(&self, name: &str) -> Option<usize> {
        self.table(name).map(|t| t.rows.len())
    }
}

impl Store for MemoryStore {
    fn ensure_table(&mut self, sheet: &SheetConfig) -> ImportResult<()> {
        self.tables.entry(sheet.table_name).or_insert_with(|| StoredTable {
            columns: sheet.columns.iter().map(|(name, _)| *name).collect(),
            rows: Vec::new(),
            next_id: 1,
        });
        Ok(())
    }

    fn append(&mut self, sheet: &SheetConfig, rows: &[Vec<Value>]) -> ImportResult<usize> {
        let table = self.tables.get_mut(sheet.table_name).ok_or_else(|| ImportError::Persistence {
            table: sheet.table_name.to_string(),
            message: "no such table".to_string(),
        })?;
        if let Some(bad) = rows.iter().find(|r| r.len() != table.columns.len()) {
            return Err(ImportError::Persistence {
                table: sheet.table_name.to_string(),
                message: format!("row has {} values for {} columns", bad.len(), table.columns.len()),
            });
        }
        for row in rows {
            table.rows.push((table.next_id, row.clone()));
            table.next_id += 1;
        }
        Ok(rows.len())
    }
}
