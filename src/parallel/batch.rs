//! Batch distribution for parallel simulation.
//!
//! Splits the trials of a batch into contiguous ranges and runs the ranges on
//! a Rayon pool. Each trial owns a generator seeded from its index, so the
//! output is identical to [crate::combat::run_batch_seeded] and independent of
//! the worker count.

use rayon::prelude::*;
use rayon::ThreadPoolBuildError;

use crate::combat::{run_batch_seeded, run_seeded_trial, BatchResult, TrialParameters};
use crate::parallel::pool::WorkerPool;

/// Ranges per worker thread; keeps the pool busy when trials vary in cost.
const RANGES_PER_THREAD: usize = 4;

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
///
/// # Example
/// ```
/// # use woundsim::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + if i < remainder { 1 } else { 0 };
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Run a seeded batch distributed across the workers of `pool`.
pub fn run_batch_parallel(
    params: &TrialParameters,
    seed: u64,
    pool: &WorkerPool,
) -> Result<BatchResult, ThreadPoolBuildError> {
    let params = *params;
    pool.install(move || {
        let ranges = batch_ranges(
            params.run_number as usize,
            rayon::current_num_threads().max(1) * RANGES_PER_THREAD,
        );
        let chunks: Vec<BatchResult> = ranges
            .into_par_iter()
            .map(|(start, end)| {
                (start..end)
                    .map(|index| run_seeded_trial(&params, seed, index as u32))
                    .collect()
            })
            .collect();
        chunks.concat()
    })
}

/// Picks sequential or parallel execution for a seeded batch. Both paths
/// produce the same outcomes; only throughput differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRunner {
    pub pool: WorkerPool,
    /// Batches with at least this many runs go to the pool. 0 disables parallelism.
    pub parallel_threshold: u32,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self {
            pool: WorkerPool::default(),
            parallel_threshold: 256,
        }
    }
}

impl BatchRunner {
    pub fn sequential() -> Self {
        Self {
            pool: WorkerPool::default(),
            parallel_threshold: 0,
        }
    }

    pub fn uses_pool(&self, params: &TrialParameters) -> bool {
        self.parallel_threshold > 0 && params.run_number >= self.parallel_threshold
    }

    pub fn run(
        &self,
        params: &TrialParameters,
        seed: u64,
    ) -> Result<BatchResult, ThreadPoolBuildError> {
        if self.uses_pool(params) {
            tracing::debug!(
                runs = params.run_number,
                workers = self.pool.workers,
                "running batch on worker pool"
            );
            run_batch_parallel(params, seed, &self.pool)
        } else {
            Ok(run_batch_seeded(params, seed))
        }
    }
}
