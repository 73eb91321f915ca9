//! Lazy permutation enumeration with a sorted, deduplicating result tracker.
//!
//! - [`Permutations`] walks every ordering of a finite sequence one item at a
//!   time, with `O(n)` working state.
//! - [`Enumerator`] wraps it in a restartable state machine
//!   (`Uninitialized -> Active -> Exhausted`).
//! - [`ValueTracker`] consumes emitted permutation strings, keeps the unique
//!   ones in sorted order, and tracks `n!` and the multinomial count.
//! - [`Filter`] narrows a result list by prefix, suffix, and substring rules.

mod batch;
mod combinatorics;
mod enumerator;
mod error;
mod filter;
mod status;
mod tracker;

pub use crate::batch::*;
pub use crate::combinatorics::*;
pub use crate::enumerator::*;
pub use crate::error::*;
pub use crate::filter::*;
pub use crate::status::*;
pub use crate::tracker::*;
