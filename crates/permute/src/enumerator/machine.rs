#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Permutations, Pull, Result};

/// Lifecycle of an [`Enumerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumeratorState {
    /// No input has been supplied, or the enumerator was reset.
    Uninitialized,
    /// Orderings remain to be pulled.
    Active,
    /// Every ordering has been produced.
    Exhausted,
}

#[derive(Debug)]
enum Inner<T> {
    Uninitialized,
    Active(Permutations<T>),
    Exhausted { emitted: u128 },
}

/// A restartable, pull-driven permutation enumerator.
///
/// Wraps [`Permutations`] in an explicit state machine so a producer can own
/// one long-lived value, re-initialize it with new input, and reset it without
/// reallocating the owner.
///
/// ```text
/// Uninitialized --init--> Active --pull (nothing left)--> Exhausted
///       ^                   |  ^                              |
///       +------reset--------+  +------------init--------------+
/// ```
///
/// # Example
/// ```
/// use permute::{Enumerator, EnumeratorState, Pull};
///
/// let mut enumerator = Enumerator::new();
/// assert_eq!(enumerator.state(), EnumeratorState::Uninitialized);
///
/// enumerator.init(vec!["x"]).unwrap();
/// assert_eq!(enumerator.pull(), Pull::Ready { item: vec!["x"] });
/// assert_eq!(enumerator.pull(), Pull::Exhausted);
/// assert_eq!(enumerator.state(), EnumeratorState::Exhausted);
/// ```
#[derive(Debug)]
pub struct Enumerator<T> {
    inner: Inner<T>,
}

impl<T> Default for Enumerator<T> {
    fn default() -> Self {
        Self {
            inner: Inner::Uninitialized,
        }
    }
}

impl<T> Enumerator<T>
where
    T: Clone,
{
    /// Creates an uninitialized enumerator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts enumerating `inputs`, discarding any previous state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyInput`] if `inputs` is empty. The previous
    /// state is discarded either way and the enumerator is left uninitialized.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(len = inputs.len())))]
    pub fn init(&mut self, inputs: Vec<T>) -> Result<()> {
        self.inner = Inner::Uninitialized;
        self.inner = Inner::Active(Permutations::new(inputs)?);
        Ok(())
    }

    /// Produces the next ordering.
    ///
    /// Returns [`Pull::Exhausted`] when nothing is left, including when the
    /// enumerator was never initialized; use [`Self::state`] to tell the two
    /// apart.
    pub fn pull(&mut self) -> Pull<Vec<T>> {
        let Inner::Active(perms) = &mut self.inner else {
            return Pull::Exhausted;
        };
        match perms.next() {
            Some(item) => Pull::Ready { item },
            None => {
                let emitted = perms.emitted();
                #[cfg(feature = "tracing")]
                tracing::trace!(emitted = %emitted, "enumerator exhausted");
                self.inner = Inner::Exhausted { emitted };
                Pull::Exhausted
            }
        }
    }

    /// Drops all enumeration state.
    pub fn reset(&mut self) {
        self.inner = Inner::Uninitialized;
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> EnumeratorState {
        match self.inner {
            Inner::Uninitialized => EnumeratorState::Uninitialized,
            Inner::Active(_) => EnumeratorState::Active,
            Inner::Exhausted { .. } => EnumeratorState::Exhausted,
        }
    }

    /// Number of orderings produced since the last [`Self::init`].
    pub const fn emitted(&self) -> u128 {
        match &self.inner {
            Inner::Uninitialized => 0,
            Inner::Active(perms) => perms.emitted(),
            Inner::Exhausted { emitted } => *emitted,
        }
    }
}
