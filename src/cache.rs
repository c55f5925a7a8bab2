//! Result cache for computed category-count tables.
//!
//! One logical table per dataset, keyed by filter value. A key is populated
//! exactly once, on first successful computation, and served verbatim for the
//! remainder of the process. There is no eviction, no TTL, and no size bound;
//! the key space is bounded in practice by the small set of meaningful filter
//! tokens per dataset.
//!
//! # Concurrency
//!
//! Concurrent misses for the same (dataset, filter) key coalesce: the per-key
//! slot is a `tokio::sync::OnceCell`, so exactly one caller runs the
//! computation and every waiter receives the winner's table. A failed
//! computation leaves the slot empty, so the next request retries the
//! warehouse.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::queries::Dataset;

/// The externally visible result shape: category label to occurrence count.
///
/// A `BTreeMap` keeps JSON serialization order deterministic.
pub type CategoryCounts = BTreeMap<String, i64>;

type Slot = Arc<OnceCell<CategoryCounts>>;

/// Per-process cache of computed aggregate results.
///
/// Owned by the application state and injected into handlers; the lifecycle
/// is tied to process start and stop.
#[derive(Default)]
pub struct ResultCache {
    slots: Mutex<HashMap<(Dataset, String), Slot>>,
}

impl ResultCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the slot for a key, creating an empty one on first sight.
    fn slot(&self, dataset: Dataset, filter: &str) -> Slot {
        let mut slots = self.slots.lock();
        Arc::clone(slots.entry((dataset, filter.to_string())).or_default())
    }

    /// Return the cached table for a key, or compute and store it.
    ///
    /// On a hit the stored table is returned as-is, with no staleness check.
    /// On a miss, `compute` runs at most once across all concurrent callers
    /// for this key; its error (if any) propagates to the caller that ran it
    /// and the slot stays empty.
    pub async fn get_or_compute<E, F, Fut>(
        &self,
        dataset: Dataset,
        filter: &str,
        compute: F,
    ) -> Result<CategoryCounts, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CategoryCounts, E>>,
    {
        let slot = self.slot(dataset, filter);

        if let Some(table) = slot.get() {
            debug!(%dataset, filter, "cache hit");
            return Ok(table.clone());
        }

        debug!(%dataset, filter, "cache miss");
        let table = slot.get_or_try_init(compute).await?;
        Ok(table.clone())
    }

    /// Inspect a key without computing anything.
    pub fn peek(&self, dataset: Dataset, filter: &str) -> Option<CategoryCounts> {
        let slot = {
            let slots = self.slots.lock();
            slots.get(&(dataset, filter.to_string())).cloned()
        };
        slot.and_then(|slot| slot.get().cloned())
    }

    /// Number of populated entries across all datasets.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Whether no entry has been populated yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn table(entries: &[(&str, i64)]) -> CategoryCounts {
        entries
            .iter()
            .map(|(label, count)| (label.to_string(), *count))
            .collect()
    }

    #[tokio::test]
    async fn test_second_lookup_does_not_recompute() {
        let cache = ResultCache::new();
        let computations = AtomicUsize::new(0);
        let counter = &computations;

        for _ in 0..2 {
            let result: Result<_, Infallible> = cache
                .get_or_compute(Dataset::DiabetesAge, "all", move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(table(&[("Male", 3)]))
                })
                .await;
            assert_eq!(result.unwrap(), table(&[("Male", 3)]));
        }

        assert_eq!(computations.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_are_independent() {
        let cache = ResultCache::new();

        let under30: Result<_, Infallible> = cache
            .get_or_compute(Dataset::HeartGender, "under30", || async {
                Ok(table(&[("Male", 2)]))
            })
            .await;
        let over60: Result<_, Infallible> = cache
            .get_or_compute(Dataset::HeartGender, "over60", || async {
                Ok(table(&[("Female", 5)]))
            })
            .await;

        assert_eq!(under30.unwrap(), table(&[("Male", 2)]));
        assert_eq!(over60.unwrap(), table(&[("Female", 5)]));
        assert_eq!(
            cache.peek(Dataset::HeartGender, "under30"),
            Some(table(&[("Male", 2)]))
        );
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_same_key_different_datasets_do_not_collide() {
        let cache = ResultCache::new();

        let _: Result<_, Infallible> = cache
            .get_or_compute(Dataset::DiabetesAge, "all", || async {
                Ok(table(&[("Male", 1)]))
            })
            .await;

        assert_eq!(cache.peek(Dataset::HeartGender, "all"), None);
    }

    #[tokio::test]
    async fn test_concurrent_misses_coalesce() {
        let cache = Arc::new(ResultCache::new());
        let computations = Arc::new(AtomicUsize::new(0));

        let compute = |cache: Arc<ResultCache>, counter: Arc<AtomicUsize>| async move {
            cache
                .get_or_compute(Dataset::DiabetesBmi, "all", move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                    Ok::<_, Infallible>(table(&[("Normal range", 7)]))
                })
                .await
        };

        let (a, b) = tokio::join!(
            compute(Arc::clone(&cache), Arc::clone(&computations)),
            compute(Arc::clone(&cache), Arc::clone(&computations)),
        );

        assert_eq!(a.unwrap(), table(&[("Normal range", 7)]));
        assert_eq!(b.unwrap(), table(&[("Normal range", 7)]));
        assert_eq!(computations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_leaves_key_unpopulated() {
        let cache = ResultCache::new();

        let failed: Result<CategoryCounts, &str> = cache
            .get_or_compute(Dataset::BreastCancerStage, "T2", || async { Err("down") })
            .await;
        assert!(failed.is_err());
        assert_eq!(cache.peek(Dataset::BreastCancerStage, "T2"), None);
        assert!(cache.is_empty());

        // The next request retries and can populate the key.
        let retried: Result<_, &str> = cache
            .get_or_compute(Dataset::BreastCancerStage, "T2", || async {
                Ok(table(&[("40-49", 4)]))
            })
            .await;
        assert_eq!(retried.unwrap(), table(&[("40-49", 4)]));
        assert_eq!(cache.len(), 1);
    }
}
