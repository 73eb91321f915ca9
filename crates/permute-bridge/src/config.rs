use crate::{Error, Result};

/// Default number of permutation strings returned per `NEXT`.
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Default capacity of the request and response channels.
///
/// One is enough: the controller never has more than one request in flight.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1;

/// Tuning for a [`Bridge`](crate::Bridge) and its producer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Maximum number of values per batch.
    pub batch_size: usize,
    /// Capacity of each direction's channel.
    pub channel_capacity: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl BridgeConfig {
    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `batch_size` or `channel_capacity`
    /// is zero.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig {
                reason: "batch_size must be greater than 0".to_string(),
            });
        }
        if self.channel_capacity == 0 {
            return Err(Error::InvalidConfig {
                reason: "channel_capacity must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
