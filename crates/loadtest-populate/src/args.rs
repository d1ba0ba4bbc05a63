//! Common CLI argument definitions shared by all populators.

use crate::error::PopulateError;
use clap::Args;
use loadtest_generator::{RowSchema, TableSchemas};
use std::path::PathBuf;

/// Common arguments shared by all populators.
///
/// Store-specific argument structs flatten this one so every backend exposes
/// the same run shape (table, row count, parallelism, id range).
#[derive(Args, Clone, Debug)]
pub struct CommonPopulateArgs {
    /// Table to insert rows into
    #[arg(value_name = "TABLE_NAME")]
    pub table_name: String,

    /// Keyspace containing the table
    #[arg(long, short = 'k')]
    pub keyspace: Option<String>,

    /// Count of rows to insert per client (omit to insert until interrupted)
    #[arg(long, short = 'c')]
    pub count: Option<u64>,

    /// Count of clients working in parallel
    #[arg(long, short = 'p', default_value = "1")]
    pub parallel: usize,

    /// Minimum allowed row id (inclusive)
    #[arg(long, alias = "min-int", default_value = "0", allow_negative_numbers = true)]
    pub min_id: i64,

    /// Maximum allowed row id (inclusive)
    #[arg(
        long,
        alias = "max-int",
        default_value = "2147483647",
        allow_negative_numbers = true
    )]
    pub max_id: i64,

    /// Table schema file (YAML or JSON); defaults to `id int, name string`
    #[arg(long, short = 's')]
    pub schema: Option<PathBuf>,

    /// Publish each client's counters every N attempts
    #[arg(long, default_value = "10")]
    pub report_every: u64,

    /// Interval between progress reports (e.g. "3", "3s", "1m")
    #[arg(long, default_value = "3s")]
    pub poll_interval: String,

    /// Random seed; client N uses seed + N (omit for non-deterministic rows)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Dry-run mode: validate configuration and run clients against a writer
    /// that accepts every row without contacting the store
    #[arg(long)]
    pub dry_run: bool,
}

impl CommonPopulateArgs {
    /// Resolve the row schema for the target table.
    ///
    /// Without a schema file the legacy `id int, name string` schema is used.
    /// With one, the `<keyspace>.<table>` (or bare `<table>`) entry must exist.
    pub fn row_schema(&self) -> Result<RowSchema, PopulateError> {
        let Some(path) = &self.schema else {
            return Ok(RowSchema::legacy());
        };

        let schemas = TableSchemas::from_file(path).map_err(|e| {
            PopulateError::Config(format!("Failed to load schema from {path:?}: {e}"))
        })?;
        Ok(schemas.resolve(self.keyspace.as_deref(), &self.table_name)?)
    }
}
