//! Loading raw tables from uploaded files.
//!
//! Most callers should use [`load_dataset_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - reads one raw [`crate::types::Table`] per sheet of the chosen dataset
//! - optionally reports success/failure/alerts to an [`ImportObserver`]
//!
//! Loading never validates: every cell keeps the type the file gave it, and empty cells are
//! [`crate::types::Value::Null`]. Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, ImportContext, ImportObserver, ImportSeverity, LoadStats, StdErrObserver,
    ValidationStats,
};
pub use unified::{load_dataset_from_path, IngestionFormat, IngestionOptions};
