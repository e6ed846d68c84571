//! Linear work-item to particle-pair mapping.
//!
//! The GPU dispatches one work item per slot of the full n×n index grid and
//! keeps only the upper-triangle representative of each unordered pair.
//! These helpers express the same mapping on the host, for the CPU reference
//! pass and for tests that check the mapping itself.

/// Number of distinct unordered pairs among `n` particles: n(n−1)/2.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Split a linear id over the n×n grid into (i, j).
///
/// Precondition: `n > 0`. An empty grid has no slots to split.
#[inline]
pub fn split(id: usize, n: usize) -> (usize, usize) {
    debug_assert!(n > 0, "cannot split a pair id over an empty grid");
    (id / n, id % n)
}

/// A grid slot is a valid pair iff it is strictly above the diagonal.
///
/// This drops self-pairs (i = j) and the lower-triangle duplicates in one
/// comparison; roughly half the dispatched slots are no-ops by design.
#[inline]
pub fn is_upper(i: usize, j: usize) -> bool {
    i < j
}

/// Iterate the valid (i, j) pairs in dispatch order.
pub fn upper_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n * n)
        .map(move |id| split(id, n))
        .filter(|&(i, j)| is_upper(i, j))
}
