use crate::{Bridge, BridgeConfig, Error, Result};
use permute::{Collation, ValueTracker};

/// Outcome of a single [`Session::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Number of values in the fetched batch.
    pub fetched: usize,
    /// Whether at least one fetched value was new.
    pub added: bool,
    /// Whether the producer is exhausted.
    pub done: bool,
}

/// Controller loop: pulls batches through a [`Bridge`] and feeds them into a
/// [`ValueTracker`].
///
/// The tracker lives on the controller side only; the producer never sees it.
#[derive(Debug)]
pub struct Session {
    bridge: Bridge,
    tracker: ValueTracker,
    inputs: Vec<String>,
    done: bool,
    /// Bridge generation the current enumeration was started under.
    generation: u64,
}

impl Session {
    /// Spawns a producer with `config` and wraps it in an idle session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` does not validate.
    pub fn spawn(config: BridgeConfig, collation: Collation) -> Result<Self> {
        Ok(Self::new(Bridge::spawn(config)?, collation))
    }

    /// Wraps an existing bridge in an idle session.
    pub fn new(bridge: Bridge, collation: Collation) -> Self {
        Self {
            generation: bridge.generation(),
            bridge,
            tracker: ValueTracker::with_collation(collation),
            inputs: Vec::new(),
            done: false,
        }
    }

    /// Starts enumerating `inputs`: computes fresh counters, initializes the
    /// producer, and only then replaces the tracker.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if `inputs` is empty.
    /// - [`Error::Permute`] if the counters overflow.
    /// - Any bridge error from `INIT`.
    ///
    /// Errors raised before `INIT` is sent leave the running enumeration
    /// untouched. Once `INIT` went out, a failed (or cancelled) start leaves
    /// the session uninitialized until the next successful start.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip_all, fields(len = inputs.len())))]
    pub async fn start(&mut self, inputs: Vec<String>) -> Result<()> {
        if inputs.is_empty() {
            return Err(Error::InvalidInput {
                reason: "inputs must contain at least one symbol".to_string(),
            });
        }
        let mut tracker = ValueTracker::with_collation(self.tracker.collation());
        tracker.init(&inputs)?;
        self.bridge.init_generator(inputs.clone()).await?;
        self.tracker = tracker;
        self.inputs = inputs;
        self.done = false;
        self.generation = self.bridge.generation();

        #[cfg(feature = "tracing")]
        tracing::info!(
            permutations = %self.tracker.permutations(),
            distinct = %self.tracker.permutations_without_repetitions(),
            "Session started"
        );
        Ok(())
    }

    /// Fetches one batch and records it.
    ///
    /// Once the producer reported exhaustion this returns a `done` step
    /// without another round trip.
    ///
    /// # Errors
    ///
    /// Any bridge error from `NEXT`, including [`Error::Uninitialized`] when
    /// the session was never started or its producer was re-initialized
    /// behind its back.
    pub async fn step(&mut self) -> Result<Step> {
        if self.bridge.generation() != self.generation {
            return Err(Error::Uninitialized);
        }
        if self.done {
            return Ok(Step {
                fetched: 0,
                added: false,
                done: true,
            });
        }

        let batch = self.bridge.get_next_values().await?;
        let added = self.tracker.add_all(&batch);
        self.done = batch.done;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            fetched = batch.len(),
            unique = self.tracker.len(),
            total = self.tracker.total_computations(),
            "Batch recorded"
        );

        Ok(Step {
            fetched: batch.len(),
            added,
            done: batch.done,
        })
    }

    /// Steps until the producer is exhausted.
    ///
    /// # Errors
    ///
    /// The first error returned by [`Self::step`].
    pub async fn run_to_completion(&mut self) -> Result<()> {
        while !self.step().await?.done {}

        #[cfg(feature = "tracing")]
        tracing::info!(
            unique = self.tracker.len(),
            total = self.tracker.total_computations(),
            "Session complete"
        );
        Ok(())
    }

    /// Discards producer state and starts over with the same inputs.
    ///
    /// # Errors
    ///
    /// Same as [`Self::start`]; [`Error::InvalidInput`] if the session was
    /// never started.
    pub async fn restart(&mut self) -> Result<()> {
        self.bridge.reset_generator().await?;
        self.start(self.inputs.clone()).await
    }

    /// Discards producer state and clears the tracker.
    ///
    /// # Errors
    ///
    /// Any bridge error from `RESET`.
    pub async fn clear(&mut self) -> Result<()> {
        self.bridge.reset_generator().await?;
        self.tracker.reset();
        self.inputs.clear();
        self.done = false;
        Ok(())
    }

    pub fn tracker(&self) -> &ValueTracker {
        &self.tracker
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub const fn is_done(&self) -> bool {
        self.done
    }

    pub const fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// Stops the producer task.
    ///
    /// # Errors
    ///
    /// See [`Bridge::shutdown`].
    pub async fn shutdown(self) -> Result<()> {
        self.bridge.shutdown().await
    }
}
