//! Fixed-capacity rolling history.

use arrayvec::ArrayVec;

/// Bounded sequence that evicts its oldest entry when full.
///
/// Backed by an [`ArrayVec`], so the capacity is part of the type and no
/// allocation happens after construction.
#[derive(Clone, Debug)]
pub struct History<T, const N: usize> {
    entries: ArrayVec<T, N>,
}

impl<T, const N: usize> Default for History<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> History<T, N> {
    pub fn new() -> Self {
        Self {
            entries: ArrayVec::new(),
        }
    }

    /// Appends `item`, dropping the oldest entry if the buffer is full.
    pub fn push(&mut self, item: T) {
        if N == 0 {
            return;
        }
        if self.entries.is_full() {
            self.entries.remove(0);
        }
        self.entries.push(item);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Newest entry.
    pub fn last(&self) -> Option<&T> {
        self.entries.last()
    }

    /// Entry `n` steps back from the newest (`0` is the newest).
    pub fn back(&self, n: usize) -> Option<&T> {
        let len = self.entries.len();
        if n >= len {
            return None;
        }
        self.entries.get(len - 1 - n)
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.entries.iter()
    }
}
