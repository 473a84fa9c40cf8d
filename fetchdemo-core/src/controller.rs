//! The fetch lifecycle controller.
//!
//! A [`FetchController`] keeps at most one request in flight. Observing new
//! inputs cancels the previous request before the next one starts, the
//! loading state is held for at least the request's `min_display`, and a
//! cancelled request never publishes anything.

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, debug_span, warn};

use crate::{
    model::{FetchRequest, FetchState},
    transport::{HttpTransport, JsonTransport},
};

/// The request currently owned by a controller.
#[derive(Debug)]
struct InFlight {
    token: CancellationToken,
    started_at: Instant,
    task: JoinHandle<()>,
}

#[derive(Debug)]
pub struct FetchController {
    transport: Arc<dyn JsonTransport>,
    state: Arc<watch::Sender<FetchState>>,
    current: Option<InFlight>,
    last_request: Option<FetchRequest>,
}

impl Default for FetchController {
    fn default() -> Self {
        Self::new(Arc::new(HttpTransport::new()))
    }
}

impl FetchController {
    /// Must be created inside a tokio runtime; requests are spawned onto it.
    pub fn new(transport: Arc<dyn JsonTransport>) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            transport,
            state: Arc::new(state),
            current: None,
            last_request: None,
        }
    }

    /// Receiver for every state this controller publishes.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// The last non-empty request handed to [`observe`](Self::observe).
    pub fn last_request(&self) -> Option<&FetchRequest> {
        self.last_request.as_ref()
    }

    /// When the in-flight request started, if one is still outstanding.
    pub fn in_flight_since(&self) -> Option<Instant> {
        self.current
            .as_ref()
            .filter(|c| !c.task.is_finished())
            .map(|c| c.started_at)
    }

    /// Feed the controller its current inputs.
    ///
    /// Returns `true` if a new request was started. Inputs equal to the last
    /// observed ones leave the outstanding request (or settled result) alone.
    pub fn observe(&mut self, request: FetchRequest) -> bool {
        if request.is_empty() {
            debug!("empty resource, no request issued");
            self.cancel_current();
            self.last_request = None;
            self.state.send_if_modified(|state| {
                if state.loading() {
                    *state = FetchState::Idle;
                    true
                } else {
                    false
                }
            });
            return false;
        }

        if self.last_request.as_ref() == Some(&request) {
            return false;
        }

        self.start(request);
        true
    }

    /// Re-issue the last request even though its inputs did not change.
    ///
    /// Returns `false` when nothing has been observed yet.
    pub fn refetch(&mut self) -> bool {
        match self.last_request.clone() {
            Some(request) => {
                debug!(resource = %request.resource, "manual refetch");
                self.start(request);
                true
            }
            None => false,
        }
    }

    /// Stop observing. The outstanding request is cancelled and nothing is
    /// published afterwards.
    pub fn detach(mut self) {
        self.cancel_current();
    }

    fn start(&mut self, request: FetchRequest) {
        self.cancel_current();

        let token = CancellationToken::new();
        let started_at = Instant::now();
        self.state.send_replace(FetchState::Loading);

        let span = debug_span!("fetch", resource = %request.resource);
        let task = tokio::spawn(
            run_request(
                Arc::clone(&self.transport),
                Arc::clone(&self.state),
                request.clone(),
                token.clone(),
                started_at,
            )
            .instrument(span),
        );

        self.current = Some(InFlight {
            token,
            started_at,
            task,
        });
        self.last_request = Some(request);
    }

    fn cancel_current(&mut self) {
        let Some(previous) = self.current.take() else {
            return;
        };
        if previous.task.is_finished() {
            return;
        }
        // Cancelled while holding the state lock: a racing completion has
        // either already published or will observe the token.
        self.state.send_if_modified(|_| {
            previous.token.cancel();
            false
        });
        debug!(
            elapsed = ?previous.started_at.elapsed(),
            "cancelled in-flight request"
        );
    }
}

impl Drop for FetchController {
    fn drop(&mut self) {
        self.cancel_current();
    }
}

async fn run_request(
    transport: Arc<dyn JsonTransport>,
    state: Arc<watch::Sender<FetchState>>,
    request: FetchRequest,
    token: CancellationToken,
    started_at: Instant,
) {
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => return,
        outcome = transport.fetch_json(&request.resource, &request.config) => outcome,
    };

    let elapsed = started_at.elapsed();
    if let Some(remaining) = request.min_display.checked_sub(elapsed).filter(|d| !d.is_zero()) {
        debug!(?remaining, "holding loading state");
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(remaining) => {}
        }
    }

    let next = match outcome {
        Ok(json) => FetchState::Success(json),
        Err(err) => {
            warn!(error = %err, "request failed");
            FetchState::Failure(err.to_string())
        }
    };

    let published = state.send_if_modified(|current| {
        if token.is_cancelled() {
            return false;
        }
        *current = next;
        true
    });

    if published {
        debug!(total = ?started_at.elapsed(), "published result");
    }
}
