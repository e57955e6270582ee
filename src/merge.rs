/// Merges the sorted runs `left` and `right` into `out`.
///
/// Stable: when the heads compare equal the element from `left` goes first. `out` must have room
/// for exactly `left.len() + right.len()` elements, its previous contents are overwritten.
pub fn merge_into<T, F>(left: &[T], right: &[T], out: &mut [T], is_less: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> bool,
{
    assert_eq!(
        out.len(),
        left.len() + right.len(),
        "merge output must hold both runs"
    );

    let mut l = 0;
    let mut r = 0;
    let mut dst = out.iter_mut();

    while l < left.len() && r < right.len() {
        // Only take from the right when it is strictly smaller, this keeps equal elements in
        // their original order.
        let take_right = is_less(&right[r], &left[l]);
        let src = if take_right {
            r += 1;
            &right[r - 1]
        } else {
            l += 1;
            &left[l - 1]
        };

        if let Some(slot) = dst.next() {
            slot.clone_from(src);
        }
    }

    for (slot, src) in dst.zip(left[l..].iter().chain(right[r..].iter())) {
        slot.clone_from(src);
    }
}
