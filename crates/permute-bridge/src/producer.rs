//! Background side of the bridge.
//!
//! [`Producer`] is the synchronous state machine that answers each
//! [`Request`]; [`producer_loop`] drives one over channels as a Tokio task.
//! The producer owns its [`Enumerator`] outright: one instance per session,
//! never shared.

use crate::{MessageKind, Request, Response};
use permute::{Batch, Enumerator, EnumeratorState, Pull};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Reason sent with `ok: false` when `NEXT` arrives before `INIT`.
pub const UNINITIALIZED_REASON: &str = "generator is not initialized";

/// Producer state: at most one enumerator plus the batch cap.
#[derive(Debug)]
pub struct Producer {
    enumerator: Enumerator<String>,
    batch_size: usize,
}

impl Producer {
    /// Creates an uninitialized producer returning up to `batch_size` values
    /// per `NEXT`.
    pub fn new(batch_size: usize) -> Self {
        Self {
            enumerator: Enumerator::new(),
            batch_size,
        }
    }

    /// Current state of the owned enumerator.
    pub const fn state(&self) -> EnumeratorState {
        self.enumerator.state()
    }

    /// Answers one request. Never fails; refusals are `ok: false` responses.
    ///
    /// - `INIT`: replaces the enumerator. Empty inputs are refused and leave
    ///   the producer uninitialized.
    /// - `NEXT`: refused while uninitialized; otherwise pulls up to
    ///   `batch_size` orderings, setting `done` if exhaustion was hit.
    /// - `RESET`: drops the enumerator.
    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::Init { inputs, generation } => match self.enumerator.init(inputs) {
                Ok(()) => Response::ok(MessageKind::Init, generation),
                Err(e) => Response::rejected(MessageKind::Init, generation, e.to_string()),
            },
            Request::Next { generation } => {
                if self.enumerator.state() == EnumeratorState::Uninitialized {
                    return Response::rejected(MessageKind::Next, generation, UNINITIALIZED_REASON);
                }
                Response::batch(generation, self.next_batch())
            }
            Request::Reset { generation } => {
                self.enumerator.reset();
                Response::ok(MessageKind::Reset, generation)
            }
        }
    }

    fn next_batch(&mut self) -> Batch {
        let mut batch = Batch::with_capacity(self.batch_size);
        while batch.values.len() < self.batch_size {
            match self.enumerator.pull() {
                Pull::Ready { item } => batch.values.push(item.concat()),
                Pull::Exhausted => {
                    batch.done = true;
                    break;
                }
            }
        }
        batch
    }
}

/// Task that owns a [`Producer`] and answers requests until shut down.
///
/// Exits when `shutdown` is cancelled, when the request channel closes (the
/// controller was dropped), or when the response channel closes.
///
/// # Arguments
///
/// - `session_id`: identifier used in logs.
/// - `requests`: incoming [`Request`]s, one at a time.
/// - `responses`: one [`Response`] per request, in request order.
/// - `producer`: state owned by this task for its whole life.
/// - `shutdown`: cooperative stop signal.
pub async fn producer_loop(
    session_id: u64,
    mut requests: mpsc::Receiver<Request>,
    responses: mpsc::Sender<Response>,
    mut producer: Producer,
    shutdown: CancellationToken,
) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Producer {session_id} started");
    #[cfg(not(feature = "tracing"))]
    let _ = session_id;

    loop {
        let request = tokio::select! {
            biased;
            () = shutdown.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Producer {session_id} received shutdown signal");
                break;
            }
            request = requests.recv() => match request {
                Some(request) => request,
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("Producer {session_id} request channel closed");
                    break;
                }
            },
        };

        #[cfg(feature = "tracing")]
        let kind = request.kind();
        let response = producer.handle(request);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            ok = response.ok,
            values = response.results.as_ref().map_or(0, Batch::len),
            "Producer {session_id} answered {kind}"
        );

        if let Err(_e) = responses.send(response).await {
            #[cfg(feature = "tracing")]
            tracing::debug!("Producer {session_id} failed to send response: {_e}");
            break;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Producer {session_id} stopped");
}
