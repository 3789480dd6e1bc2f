use thiserror::Error;

/// Convenience result type for loading, validating and publishing.
pub type ImportResult<T> = Result<T, ImportError>;

/// Error type returned by the crate.
///
/// Only system faults end up here. Data-quality problems (missing columns, bad cells,
/// failing checksums) are reported through [`crate::validation::CheckResult`] and
/// [`crate::validation::ErrorMap`] instead.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Workbook read error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV read error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON read error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dataset name is not in the registry.
    #[error("unknown dataset '{name}' (known datasets: {known})")]
    UnknownDataset { name: String, known: String },

    /// The table and its sheet config cannot be checked against each other.
    #[error("config mismatch for table '{table}': {message}")]
    ConfigMismatch { table: String, message: String },

    /// The input could not be turned into a well-formed table.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Publishing was requested for a dataset that did not pass validation.
    #[error("dataset '{dataset}' has {failed_checks} failing check(s); fix issues before publishing")]
    ValidationFailed { dataset: String, failed_checks: usize },

    /// The persistence collaborator rejected a call.
    #[error("persistence error for table '{table}': {message}")]
    Persistence { table: String, message: String },

    /// A publish run stopped part-way. Tables in `persisted` were already appended and are
    /// not rolled back.
    #[error("publishing stopped at table '{table}' (already persisted: {persisted:?}): {source}")]
    PublishAborted {
        table: String,
        persisted: Vec<String>,
        #[source]
        source: Box<ImportError>,
    },

    /// The validation thread pool could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
