//! End-to-end import preparation: registry lookup, loading, validation, reporting.
//!
//! [`prepare_import`] stops short of persistence. The caller inspects the returned
//! [`DatasetValidation`] (or shows it to a person) and only then calls
//! [`crate::persistence::publish`].

use std::path::Path;

use crate::error::ImportResult;
use crate::ingestion::observability::{report_failure, ImportContext, ValidationStats};
use crate::ingestion::{load_dataset_from_path, IngestionOptions};
use crate::registry::get_config;
use crate::validation::{validate_dataset, DatasetValidation};

/// Load `path` as dataset `dataset_name` and validate every sheet.
///
/// An unknown dataset name fails before the file is touched. Data-quality problems are not
/// errors: they are in the returned [`DatasetValidation`].
///
/// ```no_run
/// use sheet_import::ingestion::IngestionOptions;
/// use sheet_import::persistence::{bootstrap_schema, publish, MemoryStore};
/// use sheet_import::pipeline::prepare_import;
///
/// # fn main() -> Result<(), sheet_import::ImportError> {
/// let mut store = MemoryStore::new();
/// bootstrap_schema(&mut store)?;
///
/// let validation = prepare_import("valuations.xlsx", "Valuations", &IngestionOptions::default())?;
/// print!("{}", validation.summary());
/// if validation.is_valid() {
///     publish(&validation, &mut store)?;
/// }
/// # Ok(())
/// # }
/// ```
pub fn prepare_import(
    path: impl AsRef<Path>,
    dataset_name: &str,
    options: &IngestionOptions,
) -> ImportResult<DatasetValidation> {
    let dataset = get_config(dataset_name)?;
    let path = path.as_ref();
    let tables = load_dataset_from_path(path, dataset, options)?;

    let result = validate_dataset(dataset, tables);

    if let Some(obs) = options.observer.as_ref() {
        let ctx = ImportContext {
            path: path.to_path_buf(),
            format: options.resolve_format(path)?,
            dataset: dataset.name,
        };
        match &result {
            Ok(v) => obs.on_validated(
                &ctx,
                ValidationStats {
                    sheets: v.sheets.len(),
                    rows: v.row_count(),
                    failed_checks: v.failed_check_count(),
                    error_cells: v.error_cell_count(),
                },
            ),
            Err(e) => report_failure(obs.as_ref(), &ctx, options.alert_at_or_above, e),
        }
    }

    result
}
