//! Fork/join parallel merge sort.
//!
//! The slice is split in half recursively. Halves at or above the sequential threshold are copied
//! into fresh buffers and sorted as two concurrent tasks on a dedicated worker pool; the parent
//! waits for both and merges them back into its own range. Below the threshold a task sorts its
//! buffer directly with a [`Sequential`] collaborator.
//!
//! ```ignore
//! let mut v = vec![5, 3, 8, 1, 9, 2, 7, 4, 6];
//! fork_join_sort::sort(&mut v)?;
//!
//! let sorter = ParallelMergeSort::new(SortConfig::default().with_threshold(2).with_workers(4))?;
//! sorter.sort_by(&mut v, |a, b| b.cmp(a))?;
//! ```

use std::cmp::Ordering;

pub mod config;
pub mod error;
pub mod merge;
pub mod pool;
pub mod sequential;
pub mod task;

pub use config::{CancelToken, SortConfig, DEFAULT_THRESHOLD};
pub use error::SortError;
pub use pool::ForkJoinPool;
pub use sequential::{Sequential, StableMerge};
pub use task::SortTask;

/// Sorts `v` in ascending order with the default configuration.
///
/// The sort is stable. A fresh pool with one worker per available core is built for the call and
/// shut down before returning.
#[inline]
pub fn sort<T>(v: &mut [T]) -> Result<(), SortError>
where
    T: Ord + Clone + Send,
{
    ParallelMergeSort::default().sort(v)
}

/// Like [`sort`], ordering elements with `compare`.
#[inline]
pub fn sort_by<T, F>(v: &mut [T], compare: F) -> Result<(), SortError>
where
    T: Clone + Send,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    ParallelMergeSort::default().sort_by(v, compare)
}

/// A validated [`SortConfig`], reusable across sorts.
#[derive(Clone, Debug, Default)]
pub struct ParallelMergeSort {
    config: SortConfig,
}

impl ParallelMergeSort {
    pub fn new(config: SortConfig) -> Result<Self, SortError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// See [`SortConfig::from_env`].
    pub fn from_env() -> Result<Self, SortError> {
        Ok(Self {
            config: SortConfig::from_env()?,
        })
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    pub fn sort<T>(&self, v: &mut [T]) -> Result<(), SortError>
    where
        T: Ord + Clone + Send,
    {
        self.sort_with(v, &StableMerge::natural())
    }

    pub fn sort_by<T, F>(&self, v: &mut [T], compare: F) -> Result<(), SortError>
    where
        T: Clone + Send,
        F: Fn(&T, &T) -> Ordering + Sync,
    {
        self.sort_with(v, &StableMerge::new(compare))
    }

    /// Sorts `v` on a pool built for this call, using `sequential` below the threshold and for
    /// every merge.
    #[tracing::instrument(
        skip_all,
        fields(len = v.len(), threshold = self.config.threshold(), workers = self.config.workers())
    )]
    pub fn sort_with<T, S>(&self, v: &mut [T], sequential: &S) -> Result<(), SortError>
    where
        T: Clone + Send,
        S: Sequential<T> + ?Sized,
    {
        let pool = ForkJoinPool::new(&self.config)?;
        self.sort_in(&pool, v, sequential)
    }

    /// Sorts `v` on a pool owned by the caller, which stays alive for further sorts.
    pub fn sort_in<T, S>(
        &self,
        pool: &ForkJoinPool,
        v: &mut [T],
        sequential: &S,
    ) -> Result<(), SortError>
    where
        T: Clone + Send,
        S: Sequential<T> + ?Sized,
    {
        let root = SortTask::new(v, self.config.threshold(), sequential)?
            .with_cancel_token(self.config.cancel_token());

        pool.run(root)
    }
}
