/// A bounded group of permutation strings produced by one fetch.
///
/// `done` is `true` when the producer ran out of orderings while filling this
/// batch; `values` then holds whatever came before exhaustion, possibly
/// nothing. The flag is metadata, never a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Batch {
    /// Whether the producer is exhausted.
    pub done: bool,
    /// Newly produced permutation strings, in emission order.
    pub values: Vec<String>,
}

impl Batch {
    /// Creates an empty, not-yet-done batch with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            done: false,
            values: Vec::with_capacity(capacity),
        }
    }

    /// Number of values in the batch.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the batch carries no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
