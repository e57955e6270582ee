use std::cmp::Ordering;

/// A sort implementation under test.
///
/// The element bounds are those a multi-threaded, copying sort needs: values are cloned into
/// per-task buffers and sent to worker threads, and the comparator is shared between them.
pub trait Sort {
    fn name() -> String;

    fn sort<T>(arr: &mut [T])
    where
        T: Ord + Clone + Send;

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        T: Clone + Send,
        F: Fn(&T, &T) -> Ordering + Sync;
}

pub mod patterns;
