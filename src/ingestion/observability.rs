use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ImportError;

use super::unified::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (I/O, persistence or other infrastructure failures).
    Critical,
}

impl ImportSeverity {
    /// Classify a failed run.
    pub fn for_error(e: &ImportError) -> Self {
        match e {
            ImportError::Io(_)
            | ImportError::Persistence { .. }
            | ImportError::PublishAborted { .. }
            | ImportError::ThreadPool(_) => Self::Critical,
            ImportError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            ImportError::Json(err) if err.is_io() => Self::Critical,
            #[cfg(feature = "excel")]
            ImportError::Excel(calamine::Error::Io(_)) => Self::Critical,
            _ => Self::Error,
        }
    }
}

/// Context about an import attempt.
#[derive(Debug, Clone)]
pub struct ImportContext {
    /// The input path.
    pub path: PathBuf,
    /// Format used to read the input.
    pub format: IngestionFormat,
    /// Dataset the input is imported as.
    pub dataset: &'static str,
}

/// Stats reported once every sheet of a dataset was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub sheets: usize,
    pub rows: usize,
}

/// Stats reported once a dataset was validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationStats {
    pub sheets: usize,
    pub rows: usize,
    pub failed_checks: usize,
    pub error_cells: usize,
}

impl ValidationStats {
    pub fn is_valid(&self) -> bool {
        self.failed_checks == 0
    }
}

/// Observer interface for import outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ImportObserver: Send + Sync {
    /// Called when every sheet of the input was read.
    fn on_loaded(&self, _ctx: &ImportContext, _stats: LoadStats) {}

    /// Called after validation, whether or not the data passed.
    fn on_validated(&self, _ctx: &ImportContext, _stats: ValidationStats) {}

    /// Called when the run fails with a system error.
    fn on_failure(&self, _ctx: &ImportContext, _severity: ImportSeverity, _error: &ImportError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Report a failed run to `observer`, alerting at or above `alert_at_or_above`.
pub(crate) fn report_failure(
    observer: &dyn ImportObserver,
    ctx: &ImportContext,
    alert_at_or_above: ImportSeverity,
    error: &ImportError,
) {
    let sev = ImportSeverity::for_error(error);
    observer.on_failure(ctx, sev, error);
    if sev >= alert_at_or_above {
        observer.on_alert(ctx, sev, error);
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ImportObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ImportObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ImportObserver for CompositeObserver {
    fn on_loaded(&self, ctx: &ImportContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_loaded(ctx, stats);
        }
    }

    fn on_validated(&self, ctx: &ImportContext, stats: ValidationStats) {
        for o in &self.observers {
            o.on_validated(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs import events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ImportObserver for StdErrObserver {
    fn on_loaded(&self, ctx: &ImportContext, stats: LoadStats) {
        eprintln!(
            "[import][loaded] dataset={} format={:?} path={} sheets={} rows={}",
            ctx.dataset,
            ctx.format,
            ctx.path.display(),
            stats.sheets,
            stats.rows
        );
    }

    fn on_validated(&self, ctx: &ImportContext, stats: ValidationStats) {
        eprintln!(
            "[import][{}] dataset={} path={} rows={} failed_checks={} error_cells={}",
            if stats.is_valid() { "valid" } else { "invalid" },
            ctx.dataset,
            ctx.path.display(),
            stats.rows,
            stats.failed_checks,
            stats.error_cells
        );
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        eprintln!(
            "[import][{:?}] dataset={} format={:?} path={} err={}",
            severity,
            ctx.dataset,
            ctx.format,
            ctx.path.display(),
            error
        );
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        eprintln!(
            "[ALERT][import][{:?}] dataset={} format={:?} path={} err={}",
            severity,
            ctx.dataset,
            ctx.format,
            ctx.path.display(),
            error
        );
    }
}

/// Appends import events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ImportObserver for FileObserver {
    fn on_loaded(&self, ctx: &ImportContext, stats: LoadStats) {
        self.append_line(&format!(
            "{} loaded dataset={} format={:?} path={} sheets={} rows={}",
            unix_ts(),
            ctx.dataset,
            ctx.format,
            ctx.path.display(),
            stats.sheets,
            stats.rows
        ));
    }

    fn on_validated(&self, ctx: &ImportContext, stats: ValidationStats) {
        self.append_line(&format!(
            "{} {} dataset={} path={} rows={} failed_checks={} error_cells={}",
            unix_ts(),
            if stats.is_valid() { "valid" } else { "invalid" },
            ctx.dataset,
            ctx.path.display(),
            stats.rows,
            stats.failed_checks,
            stats.error_cells
        ));
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.append_line(&format!(
            "{} fail severity={:?} dataset={} format={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.dataset,
            ctx.format,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} dataset={} format={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.dataset,
            ctx.format,
            ctx.path.display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::ImportSeverity;
    use crate::error::ImportError;

    #[test]
    fn io_and_persistence_failures_are_critical() {
        let io = ImportError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(ImportSeverity::for_error(&io), ImportSeverity::Critical);

        let store = ImportError::Persistence {
            table: "risk".to_string(),
            message: "disk full".to_string(),
        };
        assert_eq!(ImportSeverity::for_error(&store), ImportSeverity::Critical);
    }

    #[test]
    fn input_and_config_problems_are_errors() {
        let input = ImportError::InvalidInput {
            message: "no header".to_string(),
        };
        assert_eq!(ImportSeverity::for_error(&input), ImportSeverity::Error);

        let unknown = ImportError::UnknownDataset {
            name: "x".to_string(),
            known: String::new(),
        };
        assert_eq!(ImportSeverity::for_error(&unknown), ImportSeverity::Error);
    }
}
