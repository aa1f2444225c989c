//! Rayon thread pool configuration for simulation workloads.
//!
//! Use [WorkerPool::install] to run parallel batches with a fixed number of
//! threads, or rely on Rayon's default (all CPU cores).

use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};

/// Configures how many worker threads are used for parallel batch execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use Rayon default (num_cpus).
    pub workers: usize,
}

impl WorkerPool {
    /// Use all available CPU cores (Rayon default).
    pub fn default_workers() -> Self {
        Self::default()
    }

    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run a closure on a thread pool with this worker count. If [workers](WorkerPool::workers) is 0,
    /// uses the global Rayon pool (all cores). Otherwise builds a temporary pool with that many threads.
    pub fn install<F, R>(&self, f: F) -> Result<R, ThreadPoolBuildError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return Ok(f());
        }
        let pool = ThreadPoolBuilder::new().num_threads(self.workers).build()?;
        Ok(pool.install(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_pool_runs_with_requested_threads() {
        let threads = WorkerPool::with_workers(2)
            .install(rayon::current_num_threads)
            .expect("pool should build");
        assert_eq!(threads, 2);
    }

    #[test]
    fn default_pool_uses_global_rayon_pool() {
        let pool = WorkerPool::default_workers();
        assert_eq!(pool.workers, 0);
        let value = pool.install(|| 7).expect("global pool needs no build");
        assert_eq!(value, 7);
    }
}
