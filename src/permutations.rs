//! Permutation and swap tables.
//!
//! All permutations of `0..width` are generated once with Heap's algorithm,
//! together with the single transposition that turns each permutation into
//! the next. Because the algorithm finishes every permutation of the first
//! `k` positions before touching position `k`, the first `k!` permutations
//! only reorder `0..k` and the first `k! - 1` swaps enumerate exactly those.
//! One table therefore serves every length up to `width`.

/// Widest table the crate will materialise (`10!` rows of 10 bytes).
pub const MAX_PERMUTATION_WIDTH: usize = 10;

/// Returns `n!`.
pub fn factorial(n: usize) -> usize {
    (1..=n).product()
}

/// Every permutation of `0..width` plus the swaps that generate them in order.
#[derive(Clone, Debug)]
pub struct PermutationTable {
    width: usize,
    /// Flat storage, `width` entries per permutation.
    permutations: Vec<u8>,
    /// `swaps[i]` turns permutation `i` into permutation `i + 1`.
    swaps: Vec<(usize, usize)>,
}

impl PermutationTable {
    /// Builds the table for `0..width`.
    ///
    /// Callers bound `width` by [`MAX_PERMUTATION_WIDTH`].
    pub fn new(width: usize) -> Self {
        debug_assert!((1..=MAX_PERMUTATION_WIDTH).contains(&width));
        let count = factorial(width);
        let mut table = Self {
            width,
            permutations: Vec::with_capacity(count * width),
            swaps: Vec::with_capacity(count.saturating_sub(1)),
        };
        let mut working: Vec<u8> = (0..width as u8).collect();
        table.heap_permute(width, &mut working);
        table
    }

    fn heap_permute(&mut self, k: usize, working: &mut [u8]) {
        if k == 1 {
            self.permutations.extend_from_slice(working);
            return;
        }
        self.heap_permute(k - 1, working);
        for i in 0..k - 1 {
            let swap = if k % 2 == 1 { (0, k - 1) } else { (i, k - 1) };
            working.swap(swap.0, swap.1);
            self.swaps.push(swap);
            self.heap_permute(k - 1, working);
        }
    }

    /// Number of permutations (`width!`).
    pub fn len(&self) -> usize {
        self.permutations.len() / self.width
    }

    pub fn is_empty(&self) -> bool {
        self.permutations.is_empty()
    }

    /// Returns permutation `index`.
    #[inline]
    pub fn permutation(&self, index: usize) -> &[u8] {
        &self.permutations[index * self.width..(index + 1) * self.width]
    }

    /// Returns the swaps that walk a run of `length` items through all of its
    /// orderings, starting from the identity.
    #[inline]
    pub fn swaps_for(&self, length: usize) -> &[(usize, usize)] {
        &self.swaps[..factorial(length) - 1]
    }

    #[cfg(test)]
    fn swaps(&self) -> &[(usize, usize)] {
        &self.swaps
    }
}
