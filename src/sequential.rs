use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::merge::merge_into;

/// The single threaded half of the sort: used for buffers below the threshold and for combining
/// two sorted children.
///
/// Implementations are shared by reference between all workers. A panic in either method is
/// reported to the caller as `SortError::WorkerFault`.
pub trait Sequential<T>: Sync {
    /// Sorts `v` in place.
    fn sort(&self, v: &mut [T]);

    /// Writes the sorted runs `left` and `right` into `out`, which has exactly
    /// `left.len() + right.len()` elements.
    fn merge(&self, left: &[T], right: &[T], out: &mut [T]);
}

/// Stable sequential collaborator: the standard library stable sort for small buffers and a
/// stable two-way merge.
pub struct StableMerge<T, F> {
    compare: F,
    _marker: PhantomData<fn(&T, &T)>,
}

impl<T, F> StableMerge<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    pub fn new(compare: F) -> Self {
        Self {
            compare,
            _marker: PhantomData,
        }
    }
}

impl<T: Ord> StableMerge<T, fn(&T, &T) -> Ordering> {
    pub fn natural() -> Self {
        Self::new(T::cmp)
    }
}

impl<T, F> Sequential<T> for StableMerge<T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    #[inline]
    fn sort(&self, v: &mut [T]) {
        v.sort_by(&self.compare);
    }

    #[inline]
    fn merge(&self, left: &[T], right: &[T], out: &mut [T]) {
        merge_into(left, right, out, &mut |a, b| {
            (self.compare)(a, b) == Ordering::Less
        });
    }
}
