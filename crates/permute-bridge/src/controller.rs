//! Foreground side of the bridge.
//!
//! [`Bridge`] spawns a producer task and exposes the three protocol
//! operations as async methods. Every method takes `&mut self`, so a caller
//! cannot issue a second request before the first completes.
//!
//! ## Abandoned requests
//!
//! A call whose future is dropped after its request was sent (for example,
//! the losing branch of a `tokio::select!`) leaves a response behind. The
//! bridge counts such requests and, before sending anything new, receives
//! their responses. A `NEXT` batch of the current generation has already
//! consumed producer progress, so it is kept and handed to the next
//! [`Bridge::get_next_values`] call instead of fetching a new one.
//!
//! Each request also carries the current *generation*, bumped on every `INIT`
//! and `RESET`. Leftover responses of an older generation, and responses
//! whose generation or type does not match the awaited request, are
//! discarded and counted in [`Bridge::stale_responses`].

use crate::{
    BridgeConfig, Error, MessageKind, Producer, Request, Response, Result,
    producer::UNINITIALIZED_REASON, producer_loop,
};
use permute::Batch;
use portable_atomic::{AtomicU64, Ordering};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(0);

/// Controller handle for one background producer.
#[derive(Debug)]
pub struct Bridge {
    session_id: u64,
    requests: mpsc::Sender<Request>,
    responses: mpsc::Receiver<Response>,
    generation: u64,
    abandoned: usize,
    stale_responses: u64,
    shutdown_token: CancellationToken,
    producer: Option<JoinHandle<()>>,
}

impl Bridge {
    /// Spawns a producer task on the current Tokio runtime and returns its
    /// controller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` does not validate.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn(config: BridgeConfig) -> Result<Self> {
        config.validate()?;

        let (request_tx, request_rx) = mpsc::channel(config.channel_capacity);
        let (response_tx, response_rx) = mpsc::channel(config.channel_capacity);
        let mut bridge = Self::connect(request_tx, response_rx);

        let handle = tokio::spawn(producer_loop(
            bridge.session_id,
            request_rx,
            response_tx,
            Producer::new(config.batch_size),
            bridge.shutdown_token.clone(),
        ));
        bridge.producer = Some(handle);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            batch_size = config.batch_size,
            "Spawned producer {}",
            bridge.session_id
        );
        Ok(bridge)
    }

    /// Builds a controller over an existing pair of channels.
    ///
    /// Whatever sits on the other end must answer each [`Request`] with
    /// exactly one [`Response`], in order.
    pub fn connect(requests: mpsc::Sender<Request>, responses: mpsc::Receiver<Response>) -> Self {
        Self {
            session_id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            requests,
            responses,
            generation: 0,
            abandoned: 0,
            stale_responses: 0,
            shutdown_token: CancellationToken::new(),
            producer: None,
        }
    }

    /// Starts a new enumeration over `inputs`, discarding any previous one.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if `inputs` is empty (nothing is sent).
    /// - [`Error::Rejected`] if the producer refuses the input.
    /// - [`Error::ChannelError`] / [`Error::ServiceShutdown`] if the producer
    ///   is unreachable.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all, fields(session = self.session_id, len = inputs.len())))]
    pub async fn init_generator(&mut self, inputs: Vec<String>) -> Result<()> {
        if inputs.is_empty() {
            return Err(Error::InvalidInput {
                reason: "inputs must contain at least one symbol".to_string(),
            });
        }
        self.generation += 1;
        let request = Request::Init {
            inputs,
            generation: self.generation,
        };
        expect_ok(self.exchange(request).await?)
    }

    /// Fetches the next batch of permutation strings.
    ///
    /// # Errors
    ///
    /// - [`Error::Uninitialized`] if no enumeration is active.
    /// - [`Error::ChannelError`] / [`Error::ServiceShutdown`] if the producer
    ///   is unreachable.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all, fields(session = self.session_id, generation = self.generation)))]
    pub async fn get_next_values(&mut self) -> Result<Batch> {
        if self.shutdown_token.is_cancelled() {
            return Err(Error::ServiceShutdown);
        }
        if let Some(batch) = self.drain_abandoned().await? {
            #[cfg(feature = "tracing")]
            tracing::trace!(values = batch.len(), "Returning batch of an abandoned fetch");
            return Ok(batch);
        }

        let request = Request::Next {
            generation: self.generation,
        };
        let response = self.exchange(request).await?;
        match response {
            Response {
                ok: true,
                results: Some(batch),
                ..
            } => Ok(batch),
            Response { ok: true, .. } => Err(Error::Rejected {
                kind: MessageKind::Next,
                reason: "response carried no results".to_string(),
            }),
            Response { error, .. } => match error.as_deref() {
                None | Some(UNINITIALIZED_REASON) => Err(Error::Uninitialized),
                Some(reason) => Err(Error::Rejected {
                    kind: MessageKind::Next,
                    reason: reason.to_string(),
                }),
            },
        }
    }

    /// Drops the producer's enumeration state.
    ///
    /// # Errors
    ///
    /// [`Error::ChannelError`] / [`Error::ServiceShutdown`] if the producer is
    /// unreachable.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all, fields(session = self.session_id)))]
    pub async fn reset_generator(&mut self) -> Result<()> {
        self.generation += 1;
        let request = Request::Reset {
            generation: self.generation,
        };
        expect_ok(self.exchange(request).await?)
    }

    /// Stops the producer task and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelError`] if the producer task panicked.
    pub async fn shutdown(mut self) -> Result<()> {
        #[cfg(feature = "tracing")]
        tracing::debug!("Shutting down producer {}", self.session_id);
        self.shutdown_token.cancel();

        if let Some(handle) = self.producer.take() {
            handle.await.map_err(|e| Error::ChannelError {
                context: format!("Producer {} task failed: {e}", self.session_id),
            })?;
        }
        Ok(())
    }

    /// Identifier of this controller/producer pair, unique per process.
    pub const fn session_id(&self) -> u64 {
        self.session_id
    }

    /// Generation stamped on the next `NEXT` request.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of responses received and discarded because nothing was
    /// waiting for them.
    pub const fn stale_responses(&self) -> u64 {
        self.stale_responses
    }

    /// Sends `request` and waits for its matching response.
    async fn exchange(&mut self, request: Request) -> Result<Response> {
        if self.shutdown_token.is_cancelled() {
            return Err(Error::ServiceShutdown);
        }
        if let Some(batch) = self.drain_abandoned().await? {
            self.discard(&Response::batch(self.generation, batch));
        }

        let kind = request.kind();
        let generation = request.generation();

        self.requests
            .send(request)
            .await
            .map_err(|_| Error::ChannelError {
                context: format!("Producer {} request channel closed", self.session_id),
            })?;
        // From here until a response arrives, dropping this future leaves the
        // response to `drain_abandoned`.
        self.abandoned += 1;

        loop {
            let response = self.recv().await?;
            if response.kind == kind && response.generation == generation {
                return Ok(response);
            }
            self.discard(&response);
        }
    }

    /// Receives the responses of abandoned requests and returns the batch of
    /// a successful `NEXT` in the current generation, if one was among them.
    /// Everything else is discarded.
    async fn drain_abandoned(&mut self) -> Result<Option<Batch>> {
        let mut kept = None;
        while self.abandoned > 0 {
            match self.recv().await? {
                Response {
                    kind: MessageKind::Next,
                    ok: true,
                    generation,
                    results: Some(batch),
                    ..
                } if generation == self.generation && kept.is_none() => {
                    kept = Some(batch);
                }
                response => self.discard(&response),
            }
        }
        Ok(kept)
    }

    async fn recv(&mut self) -> Result<Response> {
        let response = self
            .responses
            .recv()
            .await
            .ok_or_else(|| Error::ChannelError {
                context: format!("Producer {} response channel closed", self.session_id),
            })?;
        self.abandoned = self.abandoned.saturating_sub(1);
        Ok(response)
    }

    #[allow(clippy::used_underscore_binding)]
    fn discard(&mut self, _response: &Response) {
        self.stale_responses += 1;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            kind = %_response.kind,
            generation = _response.generation,
            current = self.generation,
            "Producer {} discarded stale response",
            self.session_id
        );
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
    }
}

fn expect_ok(response: Response) -> Result<()> {
    if response.ok {
        return Ok(());
    }
    let reason = response
        .error
        .unwrap_or_else(|| "no reason given".to_string());
    match response.kind {
        MessageKind::Init => Err(Error::InvalidInput { reason }),
        kind => Err(Error::Rejected { kind, reason }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    fn symbols(s: &str) -> Vec<String> {
        s.chars().map(String::from).collect()
    }

    async fn drain(bridge: &mut Bridge) -> Vec<Batch> {
        let mut batches = vec![];
        loop {
            let batch = bridge.get_next_values().await.unwrap();
            let done = batch.done;
            batches.push(batch);
            if done {
                return batches;
            }
        }
    }

    #[tokio::test]
    async fn next_before_init_is_uninitialized() {
        let mut bridge = Bridge::spawn(BridgeConfig::default()).unwrap();
        assert_eq!(bridge.get_next_values().await, Err(Error::Uninitialized));

        // Recoverable by initializing.
        bridge.init_generator(symbols("ab")).await.unwrap();
        let batch = bridge.get_next_values().await.unwrap();
        assert_eq!(batch.values, ["ab", "ba"]);
        assert!(batch.done);
        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn empty_init_is_rejected_without_a_round_trip() {
        let mut bridge = Bridge::spawn(BridgeConfig::default()).unwrap();
        let generation = bridge.generation();
        assert!(matches!(
            bridge.init_generator(vec![]).await,
            Err(Error::InvalidInput { .. })
        ));
        assert_eq!(bridge.generation(), generation);
        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn batches_respect_the_cap() {
        let mut bridge = Bridge::spawn(BridgeConfig::default()).unwrap();
        bridge.init_generator(symbols("abcdef")).await.unwrap();

        let batches = drain(&mut bridge).await;
        let sizes: Vec<usize> = batches.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![200, 200, 200, 120]);
        assert!(batches[..3].iter().all(|b| !b.done));
        assert!(batches[3].done);

        // Pulling past exhaustion keeps reporting done.
        let after = bridge.get_next_values().await.unwrap();
        assert!(after.done && after.is_empty());
        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn reset_discards_producer_state() {
        let mut bridge = Bridge::spawn(BridgeConfig::default()).unwrap();
        bridge.init_generator(symbols("abc")).await.unwrap();
        bridge.reset_generator().await.unwrap();
        assert_eq!(bridge.get_next_values().await, Err(Error::Uninitialized));
        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn abandoned_fetch_does_not_leak_into_the_next_session() {
        let config = BridgeConfig {
            batch_size: 2,
            ..BridgeConfig::default()
        };
        let mut bridge = Bridge::spawn(config).unwrap();
        bridge.init_generator(symbols("abc")).await.unwrap();

        // Send NEXT, then drop the call before the producer answers. On the
        // current-thread test runtime the producer cannot run during the poll.
        assert!(bridge.get_next_values().now_or_never().is_none());

        bridge.reset_generator().await.unwrap();
        bridge.init_generator(symbols("xy")).await.unwrap();
        let batch = bridge.get_next_values().await.unwrap();
        assert_eq!(batch.values, ["xy", "yx"]);
        assert_eq!(bridge.stale_responses(), 1);
        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn abandoned_fetch_in_the_same_generation_is_kept() {
        let config = BridgeConfig {
            batch_size: 2,
            ..BridgeConfig::default()
        };
        let mut bridge = Bridge::spawn(config).unwrap();
        bridge.init_generator(symbols("abc")).await.unwrap();

        assert!(bridge.get_next_values().now_or_never().is_none());

        let values: Vec<String> = drain(&mut bridge)
            .await
            .into_iter()
            .flat_map(|batch| batch.values)
            .collect();
        assert_eq!(values, ["abc", "acb", "bac", "bca", "cab", "cba"]);
        assert_eq!(bridge.stale_responses(), 0);
        bridge.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn mismatched_generation_is_discarded() {
        let (request_tx, mut request_rx) = mpsc::channel(4);
        let (response_tx, response_rx) = mpsc::channel(4);
        let mut bridge = Bridge::connect(request_tx, response_rx);

        let fake = tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let generation = request.generation();
                // A leftover answer from an older session arrives first.
                let stale = Response::batch(
                    generation.wrapping_sub(1),
                    Batch {
                        done: false,
                        values: vec!["stale".into()],
                    },
                );
                response_tx.send(stale).await.unwrap();
                let fresh = match request {
                    Request::Next { generation } => Response::batch(
                        generation,
                        Batch {
                            done: true,
                            values: vec!["fresh".into()],
                        },
                    ),
                    other => Response::ok(other.kind(), generation),
                };
                response_tx.send(fresh).await.unwrap();
            }
        });

        let batch = bridge.get_next_values().await.unwrap();
        assert_eq!(batch.values, ["fresh"]);
        assert_eq!(bridge.stale_responses(), 1);

        drop(bridge);
        fake.await.unwrap();
    }

    #[tokio::test]
    async fn closed_producer_is_a_channel_error() {
        let (request_tx, request_rx) = mpsc::channel(1);
        let (_response_tx, response_rx) = mpsc::channel(1);
        drop(request_rx);
        let mut bridge = Bridge::connect(request_tx, response_rx);
        assert!(matches!(
            bridge.get_next_values().await,
            Err(Error::ChannelError { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let config = BridgeConfig {
            batch_size: 0,
            ..BridgeConfig::default()
        };
        assert!(matches!(
            Bridge::spawn(config),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn sessions_are_independent() {
        let mut first = Bridge::spawn(BridgeConfig::default()).unwrap();
        let mut second = Bridge::spawn(BridgeConfig::default()).unwrap();
        assert_ne!(first.session_id(), second.session_id());

        first.init_generator(symbols("abcd")).await.unwrap();
        second.init_generator(symbols("xyz")).await.unwrap();

        let (a, b) = futures::future::join(drain(&mut first), drain(&mut second)).await;
        let a: usize = a.iter().map(Batch::len).sum();
        let b: usize = b.iter().map(Batch::len).sum();
        assert_eq!((a, b), (24, 6));

        first.shutdown().await.unwrap();
        second.shutdown().await.unwrap();
    }
}
