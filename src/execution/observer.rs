use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Execution events emitted by the engine.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted { dataset: &'static str, sheets: usize },
    SheetStarted { table_name: &'static str, rows: usize },
    SheetFinished {
        table_name: &'static str,
        failed_checks: usize,
        error_cells: usize,
    },
    RunFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// A simple stderr logger for execution events.
#[derive(Default)]
pub struct StdErrExecutionObserver;

impl ExecutionObserver for StdErrExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        eprintln!("{event:?}");
    }
}

/// Real-time metrics for a validation run.
///
/// The engine updates these counters while sheets are validated; callers can snapshot them
/// at any time.
pub struct ExecutionMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    sheets_validated: AtomicU64,
    rows_validated: AtomicU64,
    failed_checks: AtomicU64,
    error_cells: AtomicU64,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            sheets_validated: AtomicU64::new(0),
            rows_validated: AtomicU64::new(0),
            failed_checks: AtomicU64::new(0),
            error_cells: AtomicU64::new(0),
        }
    }

    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.sheets_validated.store(0, Ordering::SeqCst);
        self.rows_validated.store(0, Ordering::SeqCst);
        self.failed_checks.store(0, Ordering::SeqCst);
        self.error_cells.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns
            .store(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::SeqCst);
    }

    pub fn on_sheet_validated(&self, rows: usize, failed_checks: usize, error_cells: usize) {
        let _ = self.sheets_validated.fetch_add(1, Ordering::SeqCst);
        let _ = self.rows_validated.fetch_add(rows as u64, Ordering::SeqCst);
        let _ = self.failed_checks.fetch_add(failed_checks as u64, Ordering::SeqCst);
        let _ = self.error_cells.fetch_add(error_cells as u64, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        let elapsed = if elapsed_ns > 0 {
            Some(Duration::from_nanos(elapsed_ns))
        } else {
            None
        };

        ExecutionMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed,
            sheets_validated: self.sheets_validated.load(Ordering::SeqCst),
            rows_validated: self.rows_validated.load(Ordering::SeqCst),
            failed_checks: self.failed_checks.load(Ordering::SeqCst),
            error_cells: self.error_cells.load(Ordering::SeqCst),
        }
    }
}

impl Default for ExecutionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub sheets_validated: u64,
    pub rows_validated: u64,
    pub failed_checks: u64,
    pub error_cells: u64,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, sheets={}, rows={}, failed_checks={}, error_cells={}, elapsed={:?}",
            self.run_id,
            self.sheets_validated,
            self.rows_validated,
            self.failed_checks,
            self.error_cells,
            self.elapsed
        )
    }
}
