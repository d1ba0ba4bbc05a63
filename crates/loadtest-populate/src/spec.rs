//! Immutable description of a run.

use crate::error::PopulateError;
use loadtest_generator::RowSchema;
use std::time::Duration;

/// Index of a worker in `[0, concurrency)`.
pub type WorkerId = usize;

/// Default number of attempts between counter publications.
pub const DEFAULT_REPORT_EVERY: u64 = 10;

/// Default interval between progress reports.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Longest accepted interval between progress reports.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(24 * 3600);

/// Everything a run needs, fixed at startup.
///
/// Each worker receives its own clone, so nothing here is shared mutably.
#[derive(Debug, Clone)]
pub struct RunSpec {
    /// Keyspace containing the table (optional).
    pub keyspace: Option<String>,
    /// Target table.
    pub table: String,
    /// Ordered columns to generate.
    pub schema: RowSchema,
    /// Rows per worker; `None` runs until cancelled.
    pub row_count: Option<u64>,
    /// Number of workers.
    pub concurrency: usize,
    /// Inclusive lower id bound.
    pub min_id: i64,
    /// Inclusive upper id bound.
    pub max_id: i64,
    /// Attempts between publications of each counter.
    pub report_every: u64,
    /// Interval between progress reports.
    pub poll_interval: Duration,
    /// Base seed; worker N uses `seed + N`.
    pub seed: Option<u64>,
}

impl RunSpec {
    /// Create a single-worker, unbounded spec over the full `int` id range.
    pub fn new(table: impl Into<String>, schema: RowSchema) -> Self {
        Self {
            keyspace: None,
            table: table.into(),
            schema,
            row_count: None,
            concurrency: 1,
            min_id: 0,
            max_id: i32::MAX as i64,
            report_every: DEFAULT_REPORT_EVERY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            seed: None,
        }
    }

    pub fn with_keyspace(mut self, keyspace: Option<String>) -> Self {
        self.keyspace = keyspace;
        self
    }

    pub fn with_row_count(mut self, row_count: Option<u64>) -> Self {
        self.row_count = row_count;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_id_range(mut self, min_id: i64, max_id: i64) -> Self {
        self.min_id = min_id;
        self.max_id = max_id;
        self
    }

    pub fn with_report_every(mut self, report_every: u64) -> Self {
        self.report_every = report_every;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Seed for one worker, if the run is seeded.
    pub fn worker_seed(&self, worker_id: WorkerId) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(worker_id as u64))
    }

    /// Total attempts across all workers for a bounded run.
    pub fn total_rows(&self) -> Option<u64> {
        self.row_count.map(|n| n * self.concurrency as u64)
    }

    /// `keyspace.table`, or just the table.
    pub fn qualified_table(&self) -> String {
        match &self.keyspace {
            Some(keyspace) => format!("{keyspace}.{}", self.table),
            None => self.table.clone(),
        }
    }

    /// Check the spec before any worker is spawned.
    pub fn validate(&self) -> Result<(), PopulateError> {
        if self.table.trim().is_empty() {
            return Err(PopulateError::Config("Table name must not be empty".into()));
        }
        if self.min_id > self.max_id {
            return Err(PopulateError::Config(format!(
                "Minimum id {} is greater than maximum id {}",
                self.min_id, self.max_id
            )));
        }
        if self.concurrency == 0 {
            return Err(PopulateError::Config(
                "Count of parallel clients must be at least 1".into(),
            ));
        }
        if self.report_every == 0 {
            return Err(PopulateError::Config(
                "Report interval must be at least 1 attempt".into(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(PopulateError::Config(
                "Poll interval must be greater than zero".into(),
            ));
        }
        if self.poll_interval > MAX_POLL_INTERVAL {
            return Err(PopulateError::Config(format!(
                "Poll interval must not exceed {}s",
                MAX_POLL_INTERVAL.as_secs()
            )));
        }
        if self.schema.is_empty() {
            return Err(PopulateError::Config(format!(
                "Schema for table '{}' has no columns",
                self.table
            )));
        }
        Ok(())
    }
}
