//! Rotating sequence of axis identifiers.
//!
//! Drives the diagonal traversal in [`crate::topology`]: at each level the
//! current axis is the one resolved next, and a reduction drops it for the
//! level below.

/// A fixed sequence of distinct axes with a "current" pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CyclicSequence {
    values: Vec<usize>,
    current_index: usize,
}

impl CyclicSequence {
    /// Creates a sequence whose current element is the first one.
    pub fn new(values: Vec<usize>) -> Self {
        Self {
            values,
            current_index: 0,
        }
    }

    /// Returns the current element.
    #[inline]
    pub fn current(&self) -> usize {
        self.values[self.current_index]
    }

    /// Moves the pointer to the next element, wrapping around.
    #[inline]
    pub fn advance(&mut self) {
        self.current_index = (self.current_index + 1) % self.values.len();
    }

    /// Returns a copy with the current element removed.
    ///
    /// The new current element is the one that followed the removed element.
    /// Reducing a single-element sequence yields an empty one.
    pub fn reduced(&self) -> Self {
        let mut values = self.values.clone();
        values.remove(self.current_index);
        let current_index = if values.is_empty() {
            0
        } else {
            self.current_index % values.len()
        };
        Self {
            values,
            current_index,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates the elements in storage order, ignoring the pointer.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.values.iter().copied()
    }
}
