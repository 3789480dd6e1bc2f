//! Dataset registry.
//!
//! Every importable dataset is a compile-time constant: a name plus one [`SheetConfig`] per
//! workbook sheet. Lookup is a pure read of [`DATASETS`]; nothing is registered at runtime.

use std::fmt;

use serde::Serialize;

use crate::error::{ImportError, ImportResult};
use crate::types::TypeTag;

/// Which sheet of an uploaded workbook a [`SheetConfig`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SheetSelector {
    /// Sheet by 0-based position.
    Index(usize),
    /// Sheet by tab name.
    Name(&'static str),
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(i) => write!(f, "#{i}"),
            SheetSelector::Name(name) => f.write_str(name),
        }
    }
}

/// Rule set for one logical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SheetConfig {
    /// Workbook sheet holding this table.
    pub sheet: SheetSelector,
    /// Target table in the store.
    pub table_name: &'static str,
    /// Column name → declared type, in store column order.
    pub columns: &'static [(&'static str, TypeTag)],
    /// Columns that must be present and fully populated.
    pub required_cols: &'static [&'static str],
    /// Columns summed by the checksum rule.
    pub numeric_cols: &'static [&'static str],
}

impl SheetConfig {
    /// Declared type of `column`, if configured.
    pub fn type_of(&self, column: &str) -> Option<TypeTag> {
        self.columns.iter().find(|(name, _)| *name == column).map(|(_, tag)| *tag)
    }

    pub fn is_required(&self, column: &str) -> bool {
        self.required_cols.contains(&column)
    }

    /// Name used in human-readable messages: the sheet tab name when there is one,
    /// otherwise the target table name.
    pub fn label(&self) -> &'static str {
        match self.sheet {
            SheetSelector::Name(name) => name,
            SheetSelector::Index(_) => self.table_name,
        }
    }

    /// Check `required_cols ⊆ columns` and `numeric_cols ⊆ columns` (declared `float`).
    pub fn check_invariants(&self) -> ImportResult<()> {
        for &col in self.required_cols {
            if self.type_of(col).is_none() {
                return Err(self.mismatch(format!("required column '{col}' is not a configured column")));
            }
        }
        for &col in self.numeric_cols {
            match self.type_of(col) {
                Some(TypeTag::Float) => {}
                Some(other) => {
                    return Err(self.mismatch(format!(
                        "numeric column '{col}' is declared as {other}, expected float"
                    )));
                }
                None => {
                    return Err(self.mismatch(format!("numeric column '{col}' is not a configured column")));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn mismatch(&self, message: String) -> ImportError {
        ImportError::ConfigMismatch {
            table: self.table_name.to_string(),
            message,
        }
    }
}

/// A named dataset and the sheets it is imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetConfig {
    pub name: &'static str,
    /// One or more sheets, validated and persisted in this order.
    pub sheets: &'static [SheetConfig],
}

/// All registered datasets, in display order.
pub static DATASETS: &[DatasetConfig] = &[
    DatasetConfig {
        name: "Valuations",
        sheets: &[SheetConfig {
            sheet: SheetSelector::Index(0),
            table_name: "valuations",
            columns: &[
                ("date", TypeTag::DateTime),
                ("asset", TypeTag::String),
                ("value", TypeTag::Float),
            ],
            required_cols: &["date", "asset", "value"],
            numeric_cols: &["value"],
        }],
    },
    DatasetConfig {
        name: "Risk",
        sheets: &[SheetConfig {
            sheet: SheetSelector::Index(0),
            table_name: "risk",
            columns: &[
                ("date", TypeTag::DateTime),
                ("risk_factor", TypeTag::String),
                ("exposure", TypeTag::Float),
            ],
            required_cols: &["date", "risk_factor", "exposure"],
            numeric_cols: &["exposure"],
        }],
    },
    DatasetConfig {
        name: "P&L",
        sheets: &[
            SheetConfig {
                sheet: SheetSelector::Name("Actuals"),
                table_name: "pnl_actuals",
                columns: &[
                    ("date", TypeTag::DateTime),
                    ("account", TypeTag::String),
                    ("profit_loss", TypeTag::Float),
                ],
                required_cols: &["date", "account", "profit_loss"],
                numeric_cols: &["profit_loss"],
            },
            SheetConfig {
                sheet: SheetSelector::Name("KPIs"),
                table_name: "pnl_kpis",
                columns: &[
                    ("date", TypeTag::DateTime),
                    ("kpi_type", TypeTag::String),
                    ("kpi_name", TypeTag::String),
                    ("kpi_value", TypeTag::Float),
                ],
                required_cols: &["date", "kpi_type", "kpi_name", "kpi_value"],
                numeric_cols: &["kpi_value"],
            },
        ],
    },
];

/// Look up a dataset by name.
pub fn get_config(name: &str) -> ImportResult<&'static DatasetConfig> {
    DATASETS
        .iter()
        .find(|d| d.name == name)
        .ok_or_else(|| ImportError::UnknownDataset {
            name: name.to_string(),
            known: dataset_names().collect::<Vec<_>>().join(", "),
        })
}

/// Registered dataset names, in registration order.
pub fn dataset_names() -> impl Iterator<Item = &'static str> {
    DATASETS.iter().map(|d| d.name)
}

/// Every sheet of every dataset, in registration order.
pub fn all_sheets() -> impl Iterator<Item = &'static SheetConfig> {
    DATASETS.iter().flat_map(|d| d.sheets.iter())
}
