//! Unified loading entrypoint.
//!
//! Most callers should use [`load_dataset_from_path`], which reads one raw
//! [`crate::types::Table`] per sheet of a registered dataset.
//!
//! - If [`IngestionOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`super::observability::ImportObserver`] is provided, load success/failure/alerts
//!   are reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ImportError, ImportResult};
use crate::registry::DatasetConfig;
use crate::types::Table;

use super::observability::{report_failure, ImportContext, ImportObserver, ImportSeverity, LoadStats};
use super::{csv, json};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values (one table).
    Csv,
    /// JSON array-of-objects or NDJSON (one table).
    Json,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an input format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Options controlling loading and import reporting.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ImportObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ImportSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: ImportSeverity::Critical,
        }
    }
}

impl IngestionOptions {
    /// Format used for `path`: the forced one, or the one inferred from its extension.
    pub fn resolve_format(&self, path: &Path) -> ImportResult<IngestionFormat> {
        match self.format {
            Some(f) => Ok(f),
            None => infer_format_from_path(path),
        }
    }
}

/// Read one raw table per sheet of `dataset`, in sheet order.
///
/// - Workbooks: each [`crate::registry::SheetConfig::sheet`] selects a worksheet.
/// - CSV/JSON hold a single table, so they only serve single-sheet datasets.
///
/// When an observer is configured, this function reports:
///
/// - `on_loaded` on success, with sheet/row counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use sheet_import::ingestion::{load_dataset_from_path, IngestionOptions};
/// use sheet_import::registry::get_config;
///
/// # fn main() -> Result<(), sheet_import::ImportError> {
/// let dataset = get_config("P&L")?;
/// let tables = load_dataset_from_path("pnl.xlsx", dataset, &IngestionOptions::default())?;
/// assert_eq!(tables.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn load_dataset_from_path(
    path: impl AsRef<Path>,
    dataset: &'static DatasetConfig,
    options: &IngestionOptions,
) -> ImportResult<Vec<Table>> {
    let path = path.as_ref();
    let fmt = options.resolve_format(path)?;

    let ctx = ImportContext {
        path: path.to_path_buf(),
        format: fmt,
        dataset: dataset.name,
    };

    let result = match fmt {
        IngestionFormat::Csv => single_table(dataset, fmt, || csv::read_csv_from_path(path)),
        IngestionFormat::Json => single_table(dataset, fmt, || json::read_json_from_path(path)),
        IngestionFormat::Excel => load_excel_dispatch(path, dataset),
    };

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(tables) => obs.on_loaded(
                &ctx,
                LoadStats {
                    sheets: tables.len(),
                    rows: tables.iter().map(Table::row_count).sum(),
                },
            ),
            Err(e) => report_failure(obs.as_ref(), &ctx, options.alert_at_or_above, e),
        }
    }

    result
}

fn single_table(
    dataset: &DatasetConfig,
    fmt: IngestionFormat,
    read: impl FnOnce() -> ImportResult<Table>,
) -> ImportResult<Vec<Table>> {
    if dataset.sheets.len() != 1 {
        return Err(ImportError::InvalidInput {
            message: format!(
                "dataset '{}' has {} sheets but {fmt:?} input holds a single table; upload a workbook",
                dataset.name,
                dataset.sheets.len()
            ),
        });
    }
    Ok(vec![read()?])
}

fn infer_format_from_path(path: &Path) -> ImportResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ImportError::InvalidInput {
            message: format!("cannot infer format: path has no extension ({})", path.display()),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| ImportError::InvalidInput {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

fn load_excel_dispatch(path: &Path, dataset: &DatasetConfig) -> ImportResult<Vec<Table>> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, dataset);

    #[cfg(feature = "excel")]
    {
        let selectors: Vec<_> = dataset.sheets.iter().map(|s| s.sheet).collect();
        super::excel::read_sheets_from_path(path, &selectors)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(ImportError::InvalidInput {
            message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
