use core::fmt;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors that `permute` can produce.
///
/// Exhaustion of an [`Enumerator`] is never an error; it is modeled as
/// [`Pull::Exhausted`].
///
/// [`Enumerator`]: crate::Enumerator
/// [`Pull::Exhausted`]: crate::Pull::Exhausted
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The input sequence was empty. At least one symbol is required.
    EmptyInput,

    /// The number of orderings of an input of length `len` does not fit in a
    /// `u128`.
    Overflow {
        /// Length of the offending input sequence.
        len: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(fmt, "input sequence must contain at least one symbol"),
            Self::Overflow { len } => {
                write!(fmt, "{len}! permutations exceed the counter range")
            }
        }
    }
}

impl core::error::Error for Error {}
