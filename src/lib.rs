//! `sheet-import` validates uploaded spreadsheet data against fixed per-dataset rules and hands
//! the result to a relational store only when every rule passed.
//!
//! The primary entrypoint is [`pipeline::prepare_import`], which looks up a registered dataset,
//! loads one table per sheet from the uploaded file and validates each of them. The returned
//! [`validation::DatasetValidation`] tells the caller what to show a person and whether
//! [`persistence::publish`] may run.
//!
//! ## Datasets
//!
//! Datasets are compile-time constants in [`registry::DATASETS`]:
//!
//! - **Valuations**: `date`, `asset`, `value`
//! - **Risk**: `date`, `risk_factor`, `exposure`
//! - **P&L**: two sheets, `Actuals` (`date`, `account`, `profit_loss`) and `KPIs`
//!   (`date`, `kpi_type`, `kpi_name`, `kpi_value`)
//!
//! ## Validation rules
//!
//! Every sheet goes through the same four checks, in order, without short-circuiting:
//!
//! - **Columns Check**: required columns are present
//! - **Data Types Check**: cells are coerced to `datetime`/`float`/`string`; failures become nulls
//! - **Missing Values Check**: required columns hold no nulls
//! - **Checksum Check**: numeric columns of each row sum to a strictly positive value
//!
//! Each failing cell lands in the sheet's [`validation::ErrorMap`] for highlighting.
//!
//! ## Input formats
//!
//! - **Workbooks** (requires the Cargo feature `excel`, on by default): `.xlsx`, `.xls`,
//!   `.xlsm`, `.xlsb`, `.ods`
//! - **CSV**: `.csv` (single-sheet datasets only)
//! - **JSON**: `.json` (array-of-objects) and `.ndjson` (single-sheet datasets only)
//!
//! ## Quick example: validate an in-memory table
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
//!     vec![vec![Value::from("2024-01-01"), Value::from("AAPL"), Value::from("-5")]],
//! );
//!
//! let result = validate(table, sheet)?;
//! for check in &result.checks {
//!     println!("{check}");
//! }
//! assert!(!result.is_valid());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`registry`]: dataset and sheet configs
//! - [`types`]: cell values and tables
//! - [`validation`]: the four checks and their reports
//! - [`ingestion`]: loading tables from files, plus observer hooks
//! - [`execution`]: parallel multi-sheet validation with metrics
//! - [`persistence`]: schema bootstrap, the `Store` trait and publishing
//! - [`pipeline`]: lookup → load → validate in one call
//! - [`error`]: the crate error type

pub mod error;
pub mod execution;
pub mod ingestion;
pub mod persistence;
pub mod pipeline;
pub mod registry;
pub mod types;
pub mod validation;

pub use error::{ImportError, ImportResult};
