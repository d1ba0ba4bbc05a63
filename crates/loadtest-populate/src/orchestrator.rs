//! Run lifecycle: spawn workers, report progress, wait for completion.

use crate::error::{PopulateError, WorkerError};
use crate::metrics::{AggregateSnapshot, LocalCounters, SharedMetricStore};
use crate::spec::{RunSpec, WorkerId};
use crate::worker::{Worker, WorkerReport};
use crate::writer::WriterFactory;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{self, JoinError, JoinSet};
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;
use tracing::{error, info, info_span, warn, Dispatch, Instrument};

/// Failures per escalation bucket.
pub const ESCALATION_BUCKET: u64 = 1000;

/// Tracks which failure bucket was last reported at warning level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EscalationState {
    last_escalated_bucket: u64,
}

impl EscalationState {
    /// Record a failure total; returns true when it entered a new bucket.
    pub fn observe(&mut self, total_failed: u64) -> bool {
        let bucket = total_failed / ESCALATION_BUCKET;
        if bucket > self.last_escalated_bucket {
            self.last_escalated_bucket = bucket;
            true
        } else {
            false
        }
    }
}

/// How a worker ended.
#[derive(Debug)]
pub enum WorkerOutcome {
    Finished(WorkerReport),
    Failed { worker_id: WorkerId, error: String },
}

/// Result of a whole run.
#[derive(Debug)]
pub struct RunSummary {
    pub table: String,
    pub concurrency: usize,
    /// Aggregate read from the shared store after every worker exited.
    pub reported: AggregateSnapshot,
    /// One entry per worker, ordered by worker id.
    pub workers: Vec<WorkerOutcome>,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Exact totals from the workers that finished.
    pub fn totals(&self) -> LocalCounters {
        self.finished()
            .fold(LocalCounters::default(), |mut acc, report| {
                acc.inserted += report.counters.inserted;
                acc.failed += report.counters.failed;
                acc
            })
    }

    pub fn finished(&self) -> impl Iterator<Item = &WorkerReport> {
        self.workers.iter().filter_map(|w| match w {
            WorkerOutcome::Finished(report) => Some(report),
            WorkerOutcome::Failed { .. } => None,
        })
    }

    pub fn workers_failed(&self) -> usize {
        self.workers
            .iter()
            .filter(|w| matches!(w, WorkerOutcome::Failed { .. }))
            .count()
    }

    pub fn was_cancelled(&self) -> bool {
        self.finished().any(|report| report.cancelled)
    }

    /// Attempts per second across all workers.
    pub fn rows_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.totals().inserted as f64 / secs
        } else {
            0.0
        }
    }
}

/// Owns one run end to end.
pub struct Orchestrator {
    spec: RunSpec,
    factory: Arc<dyn WriterFactory>,
    store: Arc<SharedMetricStore>,
    cancel: CancellationToken,
    dispatch: Dispatch,
}

impl Orchestrator {
    /// Validate the spec and prepare a run.
    ///
    /// `dispatch` receives every event of the run, including the workers'.
    pub fn new(
        spec: RunSpec,
        factory: Arc<dyn WriterFactory>,
        dispatch: Dispatch,
    ) -> Result<Self, PopulateError> {
        spec.validate()?;
        Ok(Self {
            spec,
            factory,
            store: Arc::new(SharedMetricStore::new()),
            cancel: CancellationToken::new(),
            dispatch,
        })
    }

    /// Token that stops every worker at its next iteration.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn store(&self) -> Arc<SharedMetricStore> {
        Arc::clone(&self.store)
    }

    /// Run until every worker has exited.
    ///
    /// Unbounded runs only end after the cancellation token fires.
    pub async fn run(self) -> RunSummary {
        let dispatch = self.dispatch.clone();
        self.run_workers().with_subscriber(dispatch).await
    }

    async fn run_workers(self) -> RunSummary {
        let started = Instant::now();
        let table = self.spec.qualified_table();

        info!(
            "Starting {} clients against table {} ({} rows in total, ids in [{}, {}])",
            self.spec.concurrency,
            table,
            self.spec
                .total_rows()
                .map(|n| n.to_string())
                .unwrap_or_else(|| "infinite".to_string()),
            self.spec.min_id,
            self.spec.max_id
        );

        let mut workers = JoinSet::new();
        let mut task_ids = HashMap::with_capacity(self.spec.concurrency);
        for id in 0..self.spec.concurrency {
            let task = Worker::connect_and_run(
                id,
                self.spec.clone(),
                Arc::clone(&self.factory),
                Arc::clone(&self.store),
                self.cancel.clone(),
            );
            let span = info_span!("client", id);
            let handle = workers.spawn(
                async move { (id, task.await) }
                    .instrument(span)
                    .with_subscriber(self.dispatch.clone()),
            );
            task_ids.insert(handle.id(), id);
        }

        let mut ticker = progress_ticker(self.spec.poll_interval);
        let mut escalation = EscalationState::default();
        let mut outcomes = Vec::with_capacity(self.spec.concurrency);

        while !workers.is_empty() {
            tokio::select! {
                _ = ticker.tick() => {
                    log_progress(&mut escalation, self.store.snapshot());
                }
                Some(joined) = workers.join_next_with_id() => {
                    outcomes.push(outcome(joined, &task_ids));
                }
            }
        }

        let reported = self.store.snapshot();
        log_progress(&mut escalation, reported);

        outcomes.sort_by_key(|o| match o {
            WorkerOutcome::Finished(report) => report.worker_id,
            WorkerOutcome::Failed { worker_id, .. } => *worker_id,
        });

        let summary = RunSummary {
            table,
            concurrency: self.spec.concurrency,
            reported,
            workers: outcomes,
            elapsed: started.elapsed(),
        };

        let failed_workers = summary.workers_failed();
        if failed_workers > 0 {
            error!(
                "{} of {} clients stopped on a fatal error",
                failed_workers, summary.concurrency
            );
        }
        if summary.was_cancelled() {
            warn!("Run against table {} was cancelled", summary.table);
        } else if failed_workers < summary.concurrency {
            info!("Successfully inserted into table {}", summary.table);
        }

        summary
    }
}

/// Poll timer whose first tick is one period after start.
///
/// Ticks missed while the loop was busy are not replayed back to back.
fn progress_ticker(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

type JoinedWorker =
    Result<(task::Id, (WorkerId, Result<WorkerReport, WorkerError>)), JoinError>;

fn outcome(joined: JoinedWorker, task_ids: &HashMap<task::Id, WorkerId>) -> WorkerOutcome {
    match joined {
        Ok((_, (_, Ok(report)))) => WorkerOutcome::Finished(report),
        Ok((_, (worker_id, Err(e)))) => {
            error!("Client {} failed: {}", worker_id, e);
            WorkerOutcome::Failed {
                worker_id,
                error: e.to_string(),
            }
        }
        Err(e) => {
            // Every task id is recorded right after spawning, before any join.
            let worker_id = task_ids[&e.id()];
            error!("Client {} task aborted: {}", worker_id, e);
            WorkerOutcome::Failed {
                worker_id,
                error: e.to_string(),
            }
        }
    }
}

fn log_progress(escalation: &mut EscalationState, snapshot: AggregateSnapshot) {
    if escalation.observe(snapshot.total_failed) {
        warn!(
            "Inserted {} rows, failed to insert {} rows",
            snapshot.total_inserted, snapshot.total_failed
        );
    } else {
        info!(
            "Inserted {} rows, failed to insert {} rows",
            snapshot.total_inserted, snapshot.total_failed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalation_starts_quiet() {
        let mut state = EscalationState::default();
        assert!(!state.observe(0));
        assert!(!state.observe(999));
        assert_eq!(state.last_escalated_bucket, 0);
    }

    #[test]
    fn test_escalation_once_per_bucket() {
        let mut state = EscalationState::default();
        assert!(state.observe(1000));
        assert!(!state.observe(1500));
        assert!(!state.observe(1999));
        assert!(state.observe(2000));
        assert_eq!(state.last_escalated_bucket, 2);
    }

    #[test]
    fn test_escalation_skipping_buckets() {
        let mut state = EscalationState::default();
        assert!(state.observe(5400));
        assert_eq!(state.last_escalated_bucket, 5);
        assert!(!state.observe(5999));
        assert!(state.observe(6000));
    }

    #[test]
    fn test_escalation_ignores_lower_totals() {
        let mut state = EscalationState::default();
        assert!(state.observe(3000));
        assert!(!state.observe(1000));
        assert_eq!(state.last_escalated_bucket, 3);
    }

    #[test]
    fn test_summary_totals() {
        let report = |worker_id, inserted, failed| {
            WorkerOutcome::Finished(WorkerReport {
                worker_id,
                counters: LocalCounters { inserted, failed },
                cancelled: false,
            })
        };
        let summary = RunSummary {
            table: "users".into(),
            concurrency: 3,
            reported: AggregateSnapshot {
                total_inserted: 40,
                total_failed: 0,
            },
            workers: vec![
                report(0, 25, 2),
                report(1, 25, 3),
                WorkerOutcome::Failed {
                    worker_id: 2,
                    error: "boom".into(),
                },
            ],
            elapsed: Duration::from_secs(10),
        };

        assert_eq!(summary.totals(), LocalCounters { inserted: 50, failed: 5 });
        assert_eq!(summary.workers_failed(), 1);
        assert!(!summary.was_cancelled());
        assert_eq!(summary.rows_per_second(), 5.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_ticker_skips_missed_ticks() {
        let period = Duration::from_secs(3);
        let start = tokio::time::Instant::now();
        let mut ticker = progress_ticker(period);

        assert_eq!(ticker.missed_tick_behavior(), MissedTickBehavior::Delay);

        // Stall the loop for several periods.
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(ticker.tick().await, start + period);
        let next = ticker.tick().await;
        assert!(next - start >= Duration::from_secs(13));
    }
}
