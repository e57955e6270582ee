use std::cmp::Ordering;

use sort_test_tools::instantiate_sort_tests;
use sort_test_tools::Sort;

// Runs the grid against the standard library, so a failure here is a bug in the harness.
struct SortImpl {}

impl Sort for SortImpl {
    fn name() -> String {
        "rust_std_stable".into()
    }

    fn sort<T>(arr: &mut [T])
    where
        T: Ord + Clone + Send,
    {
        arr.sort();
    }

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        T: Clone + Send,
        F: Fn(&T, &T) -> Ordering + Sync,
    {
        arr.sort_by(compare);
    }
}

instantiate_sort_tests!(SortImpl);

#[test]
fn patterns_are_reproducible() {
    assert_eq!(sort_test_tools::patterns::random(64), sort_test_tools::patterns::random(64));
}

#[test]
fn pattern_shapes() {
    use sort_test_tools::patterns;

    assert_eq!(patterns::ascending(4), [0, 1, 2, 3]);
    assert_eq!(patterns::descending(4), [3, 2, 1, 0]);
    assert_eq!(patterns::all_equal(3), [66, 66, 66]);
    assert!(patterns::random_zipf(0, 1.0).is_empty());

    let organ = patterns::pipe_organ(10);
    assert!(organ[..5].windows(2).all(|w| w[0] <= w[1]));
    assert!(organ[5..].windows(2).all(|w| w[0] >= w[1]));

    let partly = patterns::random_sorted(100, 50.0);
    assert!(partly[..50].windows(2).all(|w| w[0] <= w[1]));
}
