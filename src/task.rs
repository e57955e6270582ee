use std::collections::TryReserveError;

use crate::config::{check_threshold, CancelToken};
use crate::sequential::Sequential;
use crate::SortError;

/// One node of the divide and conquer tree, bound to exactly one buffer.
///
/// The root task borrows the caller's slice, every other task borrows a buffer freshly copied out
/// of its parent. A task only executes through `ForkJoinPool::run`, which consumes it, so each one
/// runs once and every fork lands on that pool.
pub struct SortTask<'a, T, S: ?Sized> {
    buf: &'a mut [T],
    threshold: usize,
    sequential: &'a S,
    cancel: Option<&'a CancelToken>,
    depth: usize,
}

impl<'a, T, S> SortTask<'a, T, S>
where
    T: Clone + Send,
    S: Sequential<T> + ?Sized,
{
    /// Root task over `buf`. Fails with `InvalidInput` if `threshold` is below
    /// [`MIN_THRESHOLD`](crate::config::MIN_THRESHOLD).
    pub fn new(buf: &'a mut [T], threshold: usize, sequential: &'a S) -> Result<Self, SortError> {
        check_threshold(threshold)?;

        Ok(Self {
            buf,
            threshold,
            sequential,
            cancel: None,
            depth: 0,
        })
    }

    pub fn with_cancel_token(mut self, cancel: Option<&'a CancelToken>) -> Self {
        self.cancel = cancel;
        self
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    /// Sorts the owned buffer, forking onto the current rayon pool when it is at least
    /// `threshold` long. Only called from inside `ForkJoinPool::run`.
    pub(crate) fn run(self) -> Result<(), SortError> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(SortError::Cancelled);
        }

        let len = self.buf.len();
        if len < self.threshold {
            self.sequential.sort(self.buf);
            return Ok(());
        }

        let mid = len / 2;
        let mut left = copy_out(&self.buf[..mid])?;
        let mut right = copy_out(&self.buf[mid..])?;

        tracing::trace!(len, mid, depth = self.depth, "fork");

        let left_task = self.child(&mut left);
        let right_task = self.child(&mut right);
        let (left_res, right_res) = rayon::join(|| left_task.run(), || right_task.run());

        // Both children are done at this point. On failure the sibling's work is dropped.
        left_res?;
        right_res?;

        self.sequential.merge(&left, &right, self.buf);
        Ok(())
    }

    fn child<'b>(&self, buf: &'b mut [T]) -> SortTask<'b, T, S>
    where
        'a: 'b,
    {
        SortTask {
            buf,
            threshold: self.threshold,
            sequential: self.sequential,
            cancel: self.cancel,
            depth: self.depth + 1,
        }
    }
}

fn copy_out<T: Clone>(src: &[T]) -> Result<Vec<T>, SortError> {
    copy_out_with(src, Vec::try_reserve_exact)
}

fn copy_out_with<T, R>(src: &[T], reserve: R) -> Result<Vec<T>, SortError>
where
    T: Clone,
    R: FnOnce(&mut Vec<T>, usize) -> Result<(), TryReserveError>,
{
    let mut dst = Vec::new();
    reserve(&mut dst, src.len())
        .map_err(|source| SortError::AllocationFailure {
            len: src.len(),
            source,
        })?;
    dst.extend_from_slice(src);

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::merge::merge_into;

    /// Counts calls so tests can observe which path a task took.
    struct Counting {
        sorts: AtomicUsize,
        merges: AtomicUsize,
        max_sorted_len: AtomicUsize,
    }

    impl Counting {
        fn new() -> Self {
            Self {
                sorts: AtomicUsize::new(0),
                merges: AtomicUsize::new(0),
                max_sorted_len: AtomicUsize::new(0),
            }
        }
    }

    impl Sequential<i32> for Counting {
        fn sort(&self, v: &mut [i32]) {
            self.sorts.fetch_add(1, Ordering::Relaxed);
            self.max_sorted_len.fetch_max(v.len(), Ordering::Relaxed);
            v.sort();
        }

        fn merge(&self, left: &[i32], right: &[i32], out: &mut [i32]) {
            self.merges.fetch_add(1, Ordering::Relaxed);
            merge_into(left, right, out, &mut |a, b| a < b);
        }
    }

    fn single_worker_pool() -> rayon::ThreadPool {
        rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap()
    }

    fn run_on_single_worker(task: SortTask<'_, i32, Counting>) -> Result<(), SortError> {
        single_worker_pool().install(|| task.run())
    }

    #[test]
    fn below_threshold_is_sequential() {
        let seq = Counting::new();
        let mut v = vec![4, 1, 3];

        run_on_single_worker(SortTask::new(&mut v, 4, &seq).unwrap()).unwrap();

        assert_eq!(v, [1, 3, 4]);
        assert_eq!(seq.sorts.load(Ordering::Relaxed), 1);
        assert_eq!(seq.merges.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn at_threshold_forks() {
        let seq = Counting::new();
        let mut v = vec![4, 1, 3, 2];

        run_on_single_worker(SortTask::new(&mut v, 4, &seq).unwrap()).unwrap();

        assert_eq!(v, [1, 2, 3, 4]);
        assert_eq!(seq.sorts.load(Ordering::Relaxed), 2);
        assert_eq!(seq.merges.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn full_tree_with_threshold_two() {
        let seq = Counting::new();
        let mut v = vec![5, 3, 8, 1, 9, 2, 7, 4, 6];

        run_on_single_worker(SortTask::new(&mut v, 2, &seq).unwrap()).unwrap();

        assert_eq!(v, [1, 2, 3, 4, 5, 6, 7, 8, 9]);
        // A binary tree with 9 leaves of length 1 has 8 inner nodes.
        assert_eq!(seq.sorts.load(Ordering::Relaxed), 9);
        assert_eq!(seq.merges.load(Ordering::Relaxed), 8);
        assert_eq!(seq.max_sorted_len.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn leaves_stay_below_threshold() {
        let seq = Counting::new();
        let mut v: Vec<i32> = (0..10_000).rev().collect();

        run_on_single_worker(SortTask::new(&mut v, 100, &seq).unwrap()).unwrap();

        assert!(v.windows(2).all(|w| w[0] <= w[1]));
        assert!(seq.max_sorted_len.load(Ordering::Relaxed) < 100);
    }

    #[test]
    fn reject_threshold_that_never_terminates() {
        let seq = Counting::new();

        for threshold in [0, 1] {
            let mut v = vec![3, 1, 2];
            let res = SortTask::new(&mut v, threshold, &seq);
            assert!(matches!(res, Err(SortError::InvalidInput(_))));
        }

        assert_eq!(seq.sorts.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn cancelled_before_start() {
        let seq = Counting::new();
        let token = CancelToken::new();
        token.cancel();
        let mut v = vec![3, 2, 1];

        let task = SortTask::new(&mut v, 2, &seq)
            .unwrap()
            .with_cancel_token(Some(&token));
        let res = run_on_single_worker(task);

        assert!(matches!(res, Err(SortError::Cancelled)));
        assert_eq!(v, [3, 2, 1]);
        assert_eq!(seq.sorts.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn copy_out_clones_range() {
        assert_eq!(copy_out(&[7, 8, 9]).unwrap(), [7, 8, 9]);
    }

    #[test]
    fn failed_reservation_is_allocation_failure() {
        let res = copy_out_with(&[1, 2, 3], |dst: &mut Vec<i32>, _| {
            dst.try_reserve_exact(usize::MAX)
        });

        assert!(matches!(res, Err(SortError::AllocationFailure { len: 3, .. })));
    }
}
