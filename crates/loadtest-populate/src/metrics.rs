//! Counters shared between workers and the orchestrator.

use crate::spec::WorkerId;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Key of one published counter.
///
/// Renders as `inserted_<id>` / `failed_<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKey {
    Inserted(WorkerId),
    Failed(WorkerId),
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterKey::Inserted(id) => write!(f, "inserted_{id}"),
            CounterKey::Failed(id) => write!(f, "failed_{id}"),
        }
    }
}

/// A worker's private counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalCounters {
    /// Rows attempted, whether or not the write succeeded.
    pub inserted: u64,
    /// Rows whose write failed.
    pub failed: u64,
}

impl LocalCounters {
    /// Rows whose write succeeded.
    pub fn succeeded(&self) -> u64 {
        self.inserted.saturating_sub(self.failed)
    }
}

/// Sum of every worker's last published counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateSnapshot {
    pub total_inserted: u64,
    pub total_failed: u64,
}

impl AggregateSnapshot {
    pub fn total_succeeded(&self) -> u64 {
        self.total_inserted.saturating_sub(self.total_failed)
    }
}

/// Counter map written by workers and read by the orchestrator.
///
/// Every key has a single writer (the worker it names), so values need no
/// lock beyond an atomic store. The write lock is only taken the first time a
/// key is published.
#[derive(Debug, Default)]
pub struct SharedMetricStore {
    counters: RwLock<HashMap<CounterKey, AtomicU64>>,
}

impl SharedMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the current value of a counter.
    pub fn publish(&self, key: CounterKey, value: u64) {
        {
            let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(counter) = counters.get(&key) {
                counter.store(value, Ordering::Release);
                return;
            }
        }

        let mut counters = self
            .counters
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        counters
            .entry(key)
            .or_insert_with(|| AtomicU64::new(0))
            .store(value, Ordering::Release);
    }

    /// Last published value, `None` before the first publication.
    pub fn get(&self, key: CounterKey) -> Option<u64> {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        counters.get(&key).map(|c| c.load(Ordering::Acquire))
    }

    /// Number of published keys.
    pub fn len(&self) -> usize {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum all published counters.
    ///
    /// Each value is read atomically; there is no ordering across keys.
    pub fn snapshot(&self) -> AggregateSnapshot {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        counters
            .iter()
            .fold(AggregateSnapshot::default(), |mut acc, (key, value)| {
                let value = value.load(Ordering::Acquire);
                match key {
                    CounterKey::Inserted(_) => acc.total_inserted += value,
                    CounterKey::Failed(_) => acc.total_failed += value,
                }
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counter_key_names() {
        assert_eq!(CounterKey::Inserted(0).to_string(), "inserted_0");
        assert_eq!(CounterKey::Failed(12).to_string(), "failed_12");
    }

    #[test]
    fn test_absent_until_published() {
        let store = SharedMetricStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get(CounterKey::Inserted(0)), None);
        assert_eq!(store.snapshot(), AggregateSnapshot::default());

        store.publish(CounterKey::Inserted(0), 10);
        assert_eq!(store.get(CounterKey::Inserted(0)), Some(10));
        assert_eq!(store.get(CounterKey::Failed(0)), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_publish_overwrites() {
        let store = SharedMetricStore::new();
        store.publish(CounterKey::Inserted(3), 10);
        store.publish(CounterKey::Inserted(3), 20);
        assert_eq!(store.get(CounterKey::Inserted(3)), Some(20));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_snapshot_sums_by_kind() {
        let store = SharedMetricStore::new();
        store.publish(CounterKey::Inserted(0), 20);
        store.publish(CounterKey::Inserted(1), 30);
        store.publish(CounterKey::Failed(0), 10);
        store.publish(CounterKey::Failed(2), 5);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.total_inserted, 50);
        assert_eq!(snapshot.total_failed, 15);
        assert_eq!(snapshot.total_succeeded(), 35);
    }

    #[test]
    fn test_concurrent_single_writer_keys() {
        let store = Arc::new(SharedMetricStore::new());
        let handles: Vec<_> = (0..8)
            .map(|id| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for value in 1..=1000u64 {
                        store.publish(CounterKey::Inserted(id), value);
                        if value % 2 == 0 {
                            store.publish(CounterKey::Failed(id), value / 2);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.total_inserted, 8 * 1000);
        assert_eq!(snapshot.total_failed, 8 * 500);
        assert_eq!(store.len(), 16);
    }

    #[test]
    fn test_local_counters_succeeded() {
        let counters = LocalCounters {
            inserted: 25,
            failed: 5,
        };
        assert_eq!(counters.succeeded(), 20);
    }
}
