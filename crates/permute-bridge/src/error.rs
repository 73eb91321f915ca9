//! Error types for the producer bridge.
//!
//! ## Error Cases
//! - `Uninitialized`: `NEXT` reached a producer that has not been initialized.
//! - `InvalidInput`: `INIT` was given an empty sequence.
//! - `InvalidConfig`: a [`BridgeConfig`](crate::BridgeConfig) value is out of
//!   range.
//! - `Rejected`: the producer answered `ok: false` for another reason.
//! - `ChannelError`: the producer task or one of the channels is gone.
//! - `ServiceShutdown`: a request arrived after shutdown began.
//! - `Codec`: a wire message could not be encoded or decoded.

use crate::MessageKind;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the bridge.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// `NEXT` before any `INIT` (or after `RESET`). Recover by calling `INIT`.
    #[error("Generator is not initialized")]
    Uninitialized,

    /// The input sequence was rejected before reaching the producer.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Configuration outside of the supported range.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// The producer refused a request.
    #[error("{kind} rejected: {reason}")]
    Rejected { kind: MessageKind, reason: String },

    /// Internal channel send/receive failure (e.g., the producer task exited).
    #[error("Channel error: {context}")]
    ChannelError { context: String },

    /// The bridge is in the process of shutting down.
    #[error("Service is shutting down")]
    ServiceShutdown,

    /// JSON encoding or decoding failed.
    #[error("Codec error: {context}")]
    Codec { context: String },

    /// Counting the input's permutations failed.
    #[error(transparent)]
    Permute(#[from] permute::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec {
            context: err.to_string(),
        }
    }
}
