//! Per-worker write loop.

use crate::error::WorkerError;
use crate::metrics::{CounterKey, LocalCounters, SharedMetricStore};
use crate::spec::{RunSpec, WorkerId};
use crate::writer::{RowWriter, WriterFactory};
use loadtest_generator::RowGenerator;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Result of a worker that ran its loop to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker_id: WorkerId,
    /// Exact counts, including attempts never published to the store.
    pub counters: LocalCounters,
    /// The loop stopped because the run was cancelled.
    pub cancelled: bool,
}

/// A single sequential writer.
///
/// Writes from one worker never overlap; the loop awaits each write before
/// generating the next row.
pub struct Worker {
    id: WorkerId,
    spec: RunSpec,
    writer: Box<dyn RowWriter>,
    generator: RowGenerator,
    store: Arc<SharedMetricStore>,
    cancel: CancellationToken,
    counters: LocalCounters,
}

impl Worker {
    pub fn new(
        id: WorkerId,
        spec: RunSpec,
        writer: Box<dyn RowWriter>,
        store: Arc<SharedMetricStore>,
        cancel: CancellationToken,
    ) -> Self {
        let generator = match spec.worker_seed(id) {
            Some(seed) => RowGenerator::seeded(seed, spec.min_id, spec.max_id),
            None => RowGenerator::new(spec.min_id, spec.max_id),
        };

        Self {
            id,
            spec,
            writer,
            generator,
            store,
            cancel,
            counters: LocalCounters::default(),
        }
    }

    /// Open a session through `factory` and run the loop.
    pub async fn connect_and_run(
        id: WorkerId,
        spec: RunSpec,
        factory: Arc<dyn WriterFactory>,
        store: Arc<SharedMetricStore>,
        cancel: CancellationToken,
    ) -> Result<WorkerReport, WorkerError> {
        info!("Trying to connect to the store");
        let writer = factory.connect(id).await.inspect_err(|e| {
            error!("Failed to connect: {}", e);
        })?;
        warn!("Connection established");

        Self::new(id, spec, writer, store, cancel).run().await
    }

    /// Run the loop until the row count is reached or the run is cancelled.
    ///
    /// Counters are published every `report_every` attempts and never at the
    /// end, so up to `report_every - 1` attempts per counter stay unpublished.
    pub async fn run(mut self) -> Result<WorkerReport, WorkerError> {
        let rows = self
            .spec
            .row_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "infinite".to_string());
        info!(
            "Inserting {} rows into table {}",
            rows,
            self.spec.qualified_table()
        );

        let mut cancelled = false;
        while self
            .spec
            .row_count
            .map_or(true, |n| self.counters.inserted < n)
        {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            self.attempt().await.inspect_err(|e| {
                error!("Stopping: {}", e);
            })?;
        }

        if cancelled {
            warn!(
                "Cancelled after {} attempts ({} failed)",
                self.counters.inserted, self.counters.failed
            );
        } else {
            warn!("Finished");
        }

        Ok(WorkerReport {
            worker_id: self.id,
            counters: self.counters,
            cancelled,
        })
    }

    /// Generate and write one row, then update counters.
    async fn attempt(&mut self) -> Result<(), WorkerError> {
        let values = self.generator.generate(&self.spec.schema)?;

        let failed = match self.writer.write(&self.spec.table, &values).await {
            Ok(()) => false,
            Err(e) => {
                debug!("Write failed: {}", e);
                true
            }
        };

        let every = self.spec.report_every;

        if failed {
            self.counters.failed += 1;
            if self.counters.failed % every == 0 {
                self.store
                    .publish(CounterKey::Failed(self.id), self.counters.failed);
            }
        }

        self.counters.inserted += 1;
        if self.counters.inserted % every == 0 {
            self.store
                .publish(CounterKey::Inserted(self.id), self.counters.inserted);
        }

        Ok(())
    }
}
