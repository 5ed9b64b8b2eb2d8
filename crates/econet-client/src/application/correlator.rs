//! Request/response correlation by id.
//!
//! Each outstanding request holds a `oneshot` sender keyed by its id.  The
//! reader resolves it when the matching response arrives; on disconnect every
//! waiter is dropped so callers see a closed channel instead of hanging.

use std::collections::HashMap;

use econet_proto::{RequestId, Response};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Outstanding requests awaiting their response.
#[derive(Debug, Default)]
pub struct PendingRequests {
    waiters: HashMap<RequestId, oneshot::Sender<Response>>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id` and returns the receiver its response will arrive on.
    ///
    /// Registering an id that is already pending replaces the earlier waiter,
    /// whose receiver then observes a closed channel.
    pub fn register(&mut self, id: RequestId) -> oneshot::Receiver<Response> {
        let (tx, rx) = oneshot::channel();
        if self.waiters.insert(id, tx).is_some() {
            warn!("request id {id} re-registered; earlier waiter dropped");
        }
        rx
    }

    /// Completes the waiter for `response.id()`.
    ///
    /// Returns `false` when no request with that id is pending.
    pub fn resolve(&mut self, response: Response) -> bool {
        let id = response.id();
        match self.waiters.remove(&id) {
            Some(tx) => {
                if tx.send(response).is_err() {
                    debug!("caller for request {id} stopped waiting");
                }
                true
            }
            None => {
                warn!("response for unknown request id {id}");
                false
            }
        }
    }

    /// Forgets a request whose caller gave up (e.g. timed out).
    pub fn forget(&mut self, id: RequestId) {
        self.waiters.remove(&id);
    }

    /// Drops every waiter.
    pub fn cancel_all(&mut self) {
        if !self.waiters.is_empty() {
            debug!("cancelling {} pending request(s)", self.waiters.len());
        }
        self.waiters.clear();
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
