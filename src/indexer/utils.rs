use std::{borrow::Borrow, cmp::Ordering};

use crate::metadata::PostRecord;

/// Higher `z-index` first, then newer `time` first. Posts without a usable
/// `time` are older than any dated post, pre-1970 dates included.
pub(crate) fn compare_posts<T: Borrow<PostRecord>>(a: &T, b: &T) -> Ordering {
    let (a, b) = (a.borrow(), b.borrow());
    b.z_index()
        .partial_cmp(&a.z_index())
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.time().cmp(&a.time()))
}

/// Stable: posts that tie on both keys keep their scan order.
pub(crate) fn sort_posts(posts: &mut [PostRecord]) {
    posts.sort_by(compare_posts);
}
