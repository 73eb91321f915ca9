//! Sorted, deduplicating accumulator for permutation strings.

use crate::{Batch, Result, binary_insert, distinct_permutation_count, permutation_count};
use core::{cmp::Ordering, hash::Hash};
use std::collections::HashSet;

/// Ordering used to keep [`ValueTracker::results`] sorted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Collation {
    /// Byte-wise comparison (`str::cmp`).
    #[default]
    Ordinal,
    /// Case-insensitive comparison; strings equal up to case put lowercase
    /// first at the first differing position, so `"ab"` sorts just before
    /// `"Ab"` and both remain distinct.
    ///
    /// An approximation of locale collation: accents and other diacritics
    /// are compared by code point, not folded onto their base letters.
    CaseFolded,
}

impl Collation {
    /// Compares two strings under this collation.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Ordinal => a.cmp(b),
            Self::CaseFolded => {
                let folded = a
                    .chars()
                    .flat_map(char::to_lowercase)
                    .cmp(b.chars().flat_map(char::to_lowercase));
                folded.then_with(|| b.cmp(a))
            }
        }
    }
}

/// Accumulates emitted permutation strings.
///
/// - Deduplicates by exact string identity (`O(1)` membership via a hash set).
/// - Keeps unique results sorted at all times via binary-search insertion, so
///   [`Self::results`] can be rendered incrementally without a sort pass.
/// - Tracks `n!` ([`Self::permutations`]) and the multinomial count
///   ([`Self::permutations_without_repetitions`]) for the input handed to
///   [`Self::init`], plus how many values were offered in total.
///
/// # Example
/// ```
/// use permute::ValueTracker;
///
/// let mut tracker = ValueTracker::new();
/// tracker.init(&["a", "a", "b"]).unwrap();
/// for word in ["aab", "aba", "aab", "aba", "baa", "baa"] {
///     tracker.add(word);
/// }
///
/// assert_eq!(tracker.results(), ["aab", "aba", "baa"]);
/// assert_eq!(tracker.total_computations(), 6);
/// assert_eq!(tracker.permutations(), 6);
/// assert_eq!(tracker.permutations_without_repetitions(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValueTracker {
    seen: HashSet<String>,
    results: Vec<String>,
    total_computations: u64,
    permutations: u128,
    permutations_without_repetitions: u128,
    collation: Collation,
}

impl ValueTracker {
    /// Creates an empty tracker using [`Collation::Ordinal`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tracker using the given collation.
    pub fn with_collation(collation: Collation) -> Self {
        Self {
            collation,
            ..Self::default()
        }
    }

    /// Computes the combinatorial counters for `values`, the original input
    /// sequence. Results and `total_computations` are left as they are; call
    /// [`Self::reset`] first when starting over.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::EmptyInput`] if `values` is empty.
    /// - [`crate::Error::Overflow`] if `n!` does not fit in a `u128`.
    ///
    /// The counters are untouched on error.
    pub fn init<T>(&mut self, values: &[T]) -> Result<()>
    where
        T: Eq + Hash,
    {
        let permutations = permutation_count(values)?;
        let permutations_without_repetitions = distinct_permutation_count(values)?;
        self.permutations = permutations;
        self.permutations_without_repetitions = permutations_without_repetitions;
        Ok(())
    }

    /// Records one emitted value.
    ///
    /// Always counts towards [`Self::total_computations`]. Returns `true` if
    /// the value had not been seen before and was inserted into the results.
    pub fn add(&mut self, value: impl AsRef<str>) -> bool {
        self.total_computations += 1;
        let value = value.as_ref();
        if self.seen.contains(value) {
            return false;
        }
        self.seen.insert(value.to_owned());
        let collation = self.collation;
        binary_insert(&mut self.results, value.to_owned(), |a, b| {
            collation.compare(a, b)
        })
    }

    /// Records every value of `batch`, in order.
    ///
    /// Returns `true` if at least one value was new. The batch's `done` flag
    /// is not a value and is ignored here.
    pub fn add_all(&mut self, batch: &Batch) -> bool {
        self.add_values(&batch.values)
    }

    /// Records every value of `values`, in order. Returns `true` if at least
    /// one value was new.
    pub fn add_values<I>(&mut self, values: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        values
            .into_iter()
            .fold(false, |some_added, value| self.add(value) || some_added)
    }

    /// Clears every counter and all results. Idempotent; the collation is
    /// kept.
    pub fn reset(&mut self) {
        self.seen.clear();
        self.results.clear();
        self.total_computations = 0;
        self.permutations = 0;
        self.permutations_without_repetitions = 0;
    }

    /// Unique results in ascending order.
    pub fn results(&self) -> &[String] {
        &self.results
    }

    /// Number of values offered through [`Self::add`], duplicates included.
    pub const fn total_computations(&self) -> u64 {
        self.total_computations
    }

    /// `n!` for the input given to [`Self::init`].
    pub const fn permutations(&self) -> u128 {
        self.permutations
    }

    /// `n! / Π(multiplicity!)` for the input given to [`Self::init`].
    pub const fn permutations_without_repetitions(&self) -> u128 {
        self.permutations_without_repetitions
    }

    /// Ordering applied to [`Self::results`].
    pub const fn collation(&self) -> Collation {
        self.collation
    }

    /// Number of unique results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if nothing has been recorded since the last reset.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns `true` once every distinct ordering has been recorded.
    pub fn is_complete(&self) -> bool {
        self.permutations_without_repetitions > 0
            && self.results.len() as u128 == self.permutations_without_repetitions
    }
}
