/// Represents the result of pulling the next item from an [`Enumerator`].
///
/// - [`Pull::Ready`] carries the next ordering.
/// - [`Pull::Exhausted`] means there is nothing left to produce. Pulling again
///   is not an error and keeps returning [`Pull::Exhausted`].
///
/// # Example
///
/// ```
/// use permute::{Enumerator, Pull};
///
/// let mut enumerator = Enumerator::new();
/// enumerator.init(vec!['a', 'b']).unwrap();
///
/// while let Pull::Ready { item } = enumerator.pull() {
///     println!("{}", item.iter().collect::<String>());
/// }
/// assert_eq!(enumerator.pull(), Pull::Exhausted);
/// ```
///
/// [`Enumerator`]: crate::Enumerator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pull<T> {
    /// The next ordering is ready.
    Ready {
        /// The produced item.
        item: T,
    },
    /// All orderings have been produced (or nothing was initialized).
    Exhausted,
}

impl<T> Pull<T> {
    /// Returns `true` if this is [`Pull::Ready`].
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Returns `true` if this is [`Pull::Exhausted`].
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Converts into an [`Option`], dropping the exhaustion marker.
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready { item } => Some(item),
            Self::Exhausted => None,
        }
    }

    /// Returns the contained item.
    ///
    /// # Panics
    ///
    /// Panics if the pull was [`Pull::Exhausted`].
    #[track_caller]
    pub fn unwrap_ready(self) -> T {
        match self {
            Self::Ready { item } => item,
            Self::Exhausted => panic!("called `Pull::unwrap_ready()` on an `Exhausted` value"),
        }
    }
}

impl<T> From<Option<T>> for Pull<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(item) => Self::Ready { item },
            None => Self::Exhausted,
        }
    }
}
