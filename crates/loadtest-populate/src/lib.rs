//! Concurrent write load engine.
//!
//! This crate drives parallel write traffic against a single table:
//!
//! 1. [`Orchestrator`] validates a [`RunSpec`] and spawns `W` workers
//! 2. Each [`Worker`] loops: generate a row, write it, count the attempt
//! 3. Workers publish their counters into the [`SharedMetricStore`] every
//!    `D` attempts
//! 4. The orchestrator polls the store on a fixed interval, logs progress and
//!    waits until every worker has exited (or the run is cancelled)
//!
//! The store itself is reached through the [`RowWriter`] / [`WriterFactory`]
//! traits, so the engine knows nothing about the wire protocol.
//!
//! ```text
//!                 ┌──────────────┐
//!                 │ Orchestrator │── poll every interval ──┐
//!                 └──────┬───────┘                         │
//!          spawn W ┌─────┼──────────┐                      ▼
//!                  ▼     ▼          ▼            ┌───────────────────┐
//!             Worker 0  Worker 1 … Worker W-1 ──▶│ SharedMetricStore │
//!                  │     │          │  every D   └───────────────────┘
//!                  ▼     ▼          ▼
//!             RowWriter (one session per worker)
//! ```

pub mod args;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod report;
pub mod spec;
pub mod worker;
pub mod writer;

pub use args::CommonPopulateArgs;
pub use error::{PopulateError, WorkerError};
pub use metrics::{AggregateSnapshot, CounterKey, LocalCounters, SharedMetricStore};
pub use orchestrator::{EscalationState, Orchestrator, RunSummary, WorkerOutcome};
pub use spec::{
    RunSpec, WorkerId, DEFAULT_POLL_INTERVAL, DEFAULT_REPORT_EVERY, MAX_POLL_INTERVAL,
};
pub use worker::{Worker, WorkerReport};
pub use writer::{ConnectError, NullWriterFactory, RowWriter, WriteError, WriterFactory};
