//! Parallel validation of multi-sheet datasets.
//!
//! Sheets of one dataset are independent: each run owns its table and reads only its own
//! `'static` config. [`ValidationEngine`] validates them on a rayon pool and returns the
//! results in sheet order, exactly as [`crate::validation::validate_dataset`] would.
//!
//! The engine also provides real-time metrics and observer hooks for monitoring.

mod observer;

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::ImportResult;
use crate::registry::{DatasetConfig, SheetConfig};
use crate::types::Table;
use crate::validation::{check_table_count, validate, DatasetValidation, SheetValidation};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, StdErrExecutionObserver,
};

/// Configuration for the [`ValidationEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self { num_threads: Some(n) }
    }
}

/// Validates the sheets of a dataset concurrently.
pub struct ValidationEngine {
    pool: ThreadPool,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ValidationEngine {
    /// Create a new engine with the given options.
    ///
    /// `num_threads == Some(0)` is treated as one thread.
    pub fn new(opts: ExecutionOptions) -> ImportResult<Self> {
        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);

        let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;

        Ok(Self {
            pool,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Validate `tables[i]` against `dataset.sheets[i]` for every sheet, in parallel.
    ///
    /// Results keep sheet order. The first fault (in sheet order) is returned as the error.
    pub fn validate_dataset(
        &self,
        dataset: &'static DatasetConfig,
        tables: Vec<Table>,
    ) -> ImportResult<DatasetValidation> {
        check_table_count(dataset, &tables)?;

        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted {
            dataset: dataset.name,
            sheets: dataset.sheets.len(),
        });

        let work: Vec<(&'static SheetConfig, Table)> = dataset.sheets.iter().zip(tables).collect();
        let results: Vec<ImportResult<SheetValidation>> = self.pool.install(|| {
            work.into_par_iter()
                .map(|(sheet, table)| self.validate_one(sheet, table))
                .collect()
        });
        let sheets = results.into_iter().collect::<ImportResult<Vec<_>>>();

        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });

        Ok(DatasetValidation {
            dataset: dataset.name,
            sheets: sheets?,
        })
    }

    fn validate_one(&self, sheet: &'static SheetConfig, table: Table) -> ImportResult<SheetValidation> {
        self.emit(ExecutionEvent::SheetStarted {
            table_name: sheet.table_name,
            rows: table.row_count(),
        });

        let result = validate(table, sheet)?;
        let failed_checks = result.failures().count();
        self.metrics
            .on_sheet_validated(result.table.row_count(), failed_checks, result.errors.len());
        self.emit(ExecutionEvent::SheetFinished {
            table_name: sheet.table_name,
            failed_checks,
            error_cells: result.errors.len(),
        });
        Ok(result)
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}
