pub mod batch;
pub mod pool;

pub use batch::{batch_ranges, run_batch_parallel, BatchRunner};
pub use pool::WorkerPool;
