//! Counting helpers and sorted insertion.

use crate::{Error, Result};
use core::{cmp::Ordering, hash::Hash};
use std::collections::HashMap;

/// Largest input length whose factorial fits in a `u128`.
pub const MAX_COUNTABLE_LEN: usize = 34;

/// Returns `n!`, or `None` if it overflows a `u128`.
///
/// `0!` and `1!` are both `1`.
pub const fn factorial(n: usize) -> Option<u128> {
    let mut acc: u128 = 1;
    let mut i = 2;
    while i <= n {
        acc = match acc.checked_mul(i as u128) {
            Some(v) => v,
            None => return None,
        };
        i += 1;
    }
    Some(acc)
}

/// Number of orderings of `values`, treating every position as distinct.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if `values` is empty.
/// - [`Error::Overflow`] if `values.len()!` does not fit in a `u128`.
pub fn permutation_count<T>(values: &[T]) -> Result<u128> {
    if values.is_empty() {
        return Err(Error::EmptyInput);
    }
    factorial(values.len()).ok_or(Error::Overflow { len: values.len() })
}

/// Number of distinct orderings of `values` once equal symbols are treated as
/// interchangeable: `n! / Π(multiplicity!)`.
///
/// ```
/// use permute::distinct_permutation_count;
///
/// assert_eq!(distinct_permutation_count(&["A", "A", "B"]), Ok(3));
/// ```
///
/// # Errors
///
/// Same as [`permutation_count`].
pub fn distinct_permutation_count<T>(values: &[T]) -> Result<u128>
where
    T: Eq + Hash,
{
    let total = permutation_count(values)?;
    let mut multiplicities: HashMap<&T, usize> = HashMap::with_capacity(values.len());
    for value in values {
        *multiplicities.entry(value).or_default() += 1;
    }
    // Every multiplicity is <= n, so each factorial (and their product, which
    // divides n!) fits whenever n! does.
    let divisor = multiplicities
        .values()
        .map(|&count| factorial(count).unwrap_or(1))
        .product::<u128>();
    Ok(total / divisor)
}

/// Inserts `target` into the sorted `items` at the position found by binary
/// search under `compare`.
///
/// Returns `false` and leaves `items` untouched when an element comparing
/// equal is already present.
pub fn binary_insert<T, F>(items: &mut Vec<T>, target: T, mut compare: F) -> bool
where
    F: FnMut(&T, &T) -> Ordering,
{
    match items.binary_search_by(|probe| compare(probe, &target)) {
        Ok(_) => false,
        Err(idx) => {
            items.insert(idx, target);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factorial_small_values() {
        assert_eq!(factorial(0), Some(1));
        assert_eq!(factorial(1), Some(1));
        assert_eq!(factorial(3), Some(6));
        assert_eq!(factorial(10), Some(3_628_800));
        assert_eq!(factorial(20), Some(2_432_902_008_176_640_000));
    }

    #[test]
    fn factorial_limit() {
        assert!(factorial(MAX_COUNTABLE_LEN).is_some());
        assert!(factorial(MAX_COUNTABLE_LEN + 1).is_none());
    }

    #[test]
    fn counts_reject_empty_input() {
        let empty: [char; 0] = [];
        assert_eq!(permutation_count(&empty), Err(Error::EmptyInput));
        assert_eq!(distinct_permutation_count(&empty), Err(Error::EmptyInput));
    }

    #[test]
    fn counts_reject_overflowing_input() {
        let values = vec!['x'; MAX_COUNTABLE_LEN + 1];
        assert_eq!(
            permutation_count(&values),
            Err(Error::Overflow {
                len: MAX_COUNTABLE_LEN + 1
            })
        );
    }

    #[test]
    fn distinct_count_divides_out_multiplicities() {
        assert_eq!(distinct_permutation_count(&['a', 'b', 'c']), Ok(6));
        assert_eq!(distinct_permutation_count(&['A', 'A', 'B']), Ok(3));
        assert_eq!(distinct_permutation_count(&['a', 'a', 'a']), Ok(1));
        // MISSISSIPPI: 11! / (4! 4! 2!)
        let word: Vec<char> = "MISSISSIPPI".chars().collect();
        assert_eq!(distinct_permutation_count(&word), Ok(34_650));
    }

    #[test]
    fn binary_insert_keeps_order_and_skips_matches() {
        let mut items = vec![];
        for value in [5, 1, 3, 3, 9, 0, 5] {
            binary_insert(&mut items, value, Ord::cmp);
        }
        assert_eq!(items, vec![0, 1, 3, 5, 9]);
        assert!(!binary_insert(&mut items, 3, Ord::cmp));
        assert!(binary_insert(&mut items, 4, Ord::cmp));
        assert_eq!(items, vec![0, 1, 3, 4, 5, 9]);
    }
}
