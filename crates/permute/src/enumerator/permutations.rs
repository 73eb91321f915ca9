use crate::{Error, Result, factorial};
use core::iter::FusedIterator;

/// A lazy iterator over every ordering of a finite sequence.
///
/// The emission order matches the classic recursive scheme: for each index
/// `i` of the remaining sequence (left to right), emit `remaining[i]` followed
/// by every ordering of the rest. Because the remaining sequence always keeps
/// its original left-to-right order, that is exactly lexicographic order over
/// *positions*, so the recursion is replaced by a single index vector advanced
/// with the next-lexicographic step.
///
/// ## Properties
/// - ✅ Exactly `n!` items, no two equal as position sequences
/// - ✅ `O(n)` working state; the full set is never materialized
/// - ❌ Does not skip value-level duplicates (`['a', 'a']` yields `aa` twice)
///
/// # Example
/// ```
/// use permute::Permutations;
///
/// let words: Vec<String> = Permutations::new(vec!['a', 'b', 'c'])
///     .unwrap()
///     .map(|p| p.into_iter().collect())
///     .collect();
///
/// assert_eq!(words, ["abc", "acb", "bac", "bca", "cab", "cba"]);
/// ```
#[derive(Clone, Debug)]
pub struct Permutations<T> {
    symbols: Vec<T>,
    indices: Vec<usize>,
    emitted: u128,
    started: bool,
    done: bool,
}

impl<T> Permutations<T>
where
    T: Clone,
{
    /// Creates an iterator over every ordering of `symbols`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] if `symbols` is empty.
    pub fn new(symbols: Vec<T>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(Error::EmptyInput);
        }
        let indices = (0..symbols.len()).collect();
        Ok(Self {
            symbols,
            indices,
            emitted: 0,
            started: false,
            done: false,
        })
    }

    /// The input symbols, in their original order.
    pub fn symbols(&self) -> &[T] {
        &self.symbols
    }

    /// Number of orderings produced so far.
    pub const fn emitted(&self) -> u128 {
        self.emitted
    }

    /// Remaining orderings, or `None` when `n!` is not countable in a `u128`.
    pub fn remaining(&self) -> Option<u128> {
        if self.done {
            return Some(0);
        }
        factorial(self.symbols.len()).map(|total| total - self.emitted)
    }

    /// Advances `indices` to the next ordering in lexicographic order.
    ///
    /// Returns `false` once the last ordering (fully descending) was reached.
    fn advance(&mut self) -> bool {
        let indices = &mut self.indices;
        let n = indices.len();
        if n < 2 {
            return false;
        }

        // Rightmost ascent: the deepest recursion level that still has an
        // untried choice.
        let mut pivot = n - 1;
        while pivot > 0 && indices[pivot - 1] > indices[pivot] {
            pivot -= 1;
        }
        if pivot == 0 {
            return false;
        }

        // Smallest index to the right that is greater than the pivot is the
        // next choice at that level; the tail then restarts in ascending order.
        let mut successor = n - 1;
        while indices[successor] < indices[pivot - 1] {
            successor -= 1;
        }
        indices.swap(pivot - 1, successor);
        indices[pivot..].reverse();
        true
    }
}

impl<T> Iterator for Permutations<T>
where
    T: Clone,
{
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.started {
            if !self.advance() {
                self.done = true;
                return None;
            }
        } else {
            self.started = true;
        }

        self.emitted += 1;
        Some(
            self.indices
                .iter()
                .map(|&idx| self.symbols[idx].clone())
                .collect(),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining() {
            Some(remaining) => {
                let lower = usize::try_from(remaining).unwrap_or(usize::MAX);
                (lower, usize::try_from(remaining).ok())
            }
            None => (usize::MAX, None),
        }
    }
}

impl<T> FusedIterator for Permutations<T> where T: Clone {}
