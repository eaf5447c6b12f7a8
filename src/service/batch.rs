//! Batch Executor
//!
//! Runs a producer over a sequence of items in capacity-bounded concurrent
//! groups. Groups execute strictly in order with an optional pause between
//! them; one item's failure never aborts its siblings, and every item ends
//! up in exactly one of the success or error lists.

use std::future::Future;
use std::time::Duration;

use futures_util::future::join_all;

use crate::cache::EstimateSize;
use crate::config::BatchConfig;
use crate::service::PerfService;

// == Batch Result Types ==
/// One successful item, tagged with its position in the input.
#[derive(Debug)]
pub struct BatchSuccess<R> {
    pub index: usize,
    pub value: R,
}

/// One failed item, tagged with its position and the input that failed.
#[derive(Debug)]
pub struct BatchFailure<T> {
    pub index: usize,
    pub item: T,
    pub error: anyhow::Error,
}

/// Outcome of a batch run.
///
/// Both lists preserve the relative input order of their items, keyed by
/// original index rather than completion order, and together account for
/// every input item.
#[derive(Debug)]
pub struct BatchOutcome<T, R> {
    pub results: Vec<BatchSuccess<R>>,
    pub errors: Vec<BatchFailure<T>>,
}

impl<T, R> BatchOutcome<T, R> {
    /// Total number of items accounted for.
    pub fn total(&self) -> usize {
        self.results.len() + self.errors.len()
    }

    /// Successful values in input order, discarding indices.
    pub fn into_values(self) -> Vec<R> {
        self.results.into_iter().map(|success| success.value).collect()
    }
}

// == Batch Runner ==
/// Processes `items` through `producer` in groups of `batch_size`.
///
/// Within a group, at most `concurrency` producer calls are in flight at
/// once (the group is sub-chunked when `concurrency < batch_size`); the
/// fan-out is cooperative, polled on the calling task. After each group
/// except the last, processing pauses for `delay_ms`.
pub async fn run_batches<T, R, F, Fut>(
    items: Vec<T>,
    options: &BatchConfig,
    producer: F,
) -> BatchOutcome<T, R>
where
    T: Clone,
    F: Fn(T) -> Fut,
    Fut: Future<Output = anyhow::Result<R>>,
{
    let batch_size = options.batch_size.max(1);
    let concurrency = options.concurrency.max(1);

    let mut outcome = BatchOutcome {
        results: Vec::with_capacity(items.len()),
        errors: Vec::new(),
    };

    let indexed: Vec<(usize, T)> = items.into_iter().enumerate().collect();
    let group_count = indexed.chunks(batch_size).len();

    for (group_index, group) in indexed.chunks(batch_size).enumerate() {
        for sub_chunk in group.chunks(concurrency) {
            let in_flight = sub_chunk.iter().map(|(index, item)| {
                let item = item.clone();
                let call = producer(item.clone());
                async move { (*index, item, call.await) }
            });

            // join_all preserves input order, so outputs stay index-stable
            for (index, item, result) in join_all(in_flight).await {
                match result {
                    Ok(value) => outcome.results.push(BatchSuccess { index, value }),
                    Err(error) => outcome.errors.push(BatchFailure { index, item, error }),
                }
            }
        }

        let is_last = group_index + 1 == group_count;
        if !is_last && options.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(options.delay_ms)).await;
        }
    }

    outcome
}

impl<V: Clone + EstimateSize> PerfService<V> {
    // == Batch Executor ==
    /// Runs `producer` over `items` with the service's configured batch
    /// defaults.
    pub async fn batch_process<T, R, F, Fut>(&self, items: Vec<T>, producer: F) -> BatchOutcome<T, R>
    where
        T: Clone,
        F: Fn(T) -> Fut,
        Fut: Future<Output = anyhow::Result<R>>,
    {
        run_batches(items, self.batch_defaults(), producer).await
    }

    /// Runs `producer` over `items` with explicit batch options.
    pub async fn batch_process_with<T, R, F, Fut>(
        &self,
        items: Vec<T>,
        options: &BatchConfig,
        producer: F,
    ) -> BatchOutcome<T, R>
    where
        T: Clone,
        F: Fn(T) -> Fut,
        Fut: Future<Output = anyhow::Result<R>>,
    {
        run_batches(items, options, producer).await
    }
}
