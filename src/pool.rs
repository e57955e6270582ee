use std::panic::{self, AssertUnwindSafe};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::SortConfig;
use crate::sequential::Sequential;
use crate::task::SortTask;
use crate::SortError;

/// A bounded set of worker threads that runs one task tree at a time to completion.
///
/// Every top-level sort builds its own pool and drops it on return, unless the caller passes an
/// explicit pool to `ParallelMergeSort::sort_in`. rayon's global pool is never touched.
pub struct ForkJoinPool {
    pool: ThreadPool,
}

impl ForkJoinPool {
    /// Builds the pool from the worker settings of `config`. The threshold is checked by each
    /// `SortTask` instead.
    pub fn new(config: &SortConfig) -> Result<Self, SortError> {
        config.validate_workers()?;

        let workers = config.workers();
        let prefix = config.thread_name_prefix().to_string();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(move |idx| format!("{prefix}-{idx}"))
            .build()?;

        tracing::debug!(
            workers,
            prefix = config.thread_name_prefix(),
            "built fork-join pool"
        );

        Ok(Self { pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `task` and all of its descendants on this pool and blocks until they are done.
    ///
    /// A panic on any worker is caught once both sides of every join it passes through have
    /// finished, and comes back as `SortError::WorkerFault`.
    pub fn run<T, S>(&self, task: SortTask<'_, T, S>) -> Result<(), SortError>
    where
        T: Clone + Send,
        S: Sequential<T> + ?Sized,
    {
        let len = task.len();

        let res = self
            .pool
            .install(|| panic::catch_unwind(AssertUnwindSafe(|| task.run())))
            .unwrap_or_else(|payload| Err(SortError::from_panic(payload)));

        match &res {
            Ok(()) => tracing::debug!(len, "root task completed"),
            Err(SortError::Cancelled) => tracing::debug!(len, "sort cancelled"),
            Err(err) => tracing::warn!(len, error = %err, "sort failed"),
        }

        res
    }
}
