#![no_main]

use libfuzzer_sys::fuzz_target;

use fork_join_sort::{ParallelMergeSort, SortConfig};
use fuzz_util::u8_as_i32;

fuzz_target!(|data: &[u8]| {
    let Some((&threshold, rest)) = data.split_first() else {
        return;
    };

    // Small thresholds give deep task trees even for short inputs.
    let config = SortConfig::default()
        .with_threshold(2 + (threshold as usize % 64))
        .with_workers(2);
    let Ok(sorter) = ParallelMergeSort::new(config) else {
        return;
    };

    let mut v = u8_as_i32(rest);
    let mut expected = v.clone();
    expected.sort();

    sorter.sort(&mut v).unwrap();
    assert_eq!(v, expected);
});
