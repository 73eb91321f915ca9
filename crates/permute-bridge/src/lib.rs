//! Background permutation producer and the foreground controller that pulls
//! bounded batches from it.
//!
//! A [`Bridge`] owns one producer task. The two sides share nothing; they
//! exchange [`Request`]s and [`Response`]s over bounded channels, and the
//! controller keeps at most one request in flight. [`Session`] layers a
//! [`permute::ValueTracker`] on top to accumulate sorted, unique results.
//!
//! ## Structure
//!
//! - [`Request`] / [`Response`] - wire messages and JSON helpers.
//! - [`Producer`] / [`producer_loop`] - background state machine and task.
//! - [`Bridge`] - controller-facing API.
//! - [`Session`] - controller loop feeding a tracker.

mod config;
mod controller;
mod error;
mod producer;
mod protocol;
mod session;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use producer::*;
pub use protocol::*;
pub use session::*;
// Public re-export so downstream crates can reach the core types via
// `permute_bridge::permute`
pub use permute;
