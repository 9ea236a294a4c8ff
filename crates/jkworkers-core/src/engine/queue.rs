//! Single-slot pass queue.
//!
//! At most one pass is pending at any time. Submitting while a pass is
//! already pending merges the two requests instead of queueing a second pass,
//! so a burst of events costs one registry fetch.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// What caused a pass to be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    Startup,
    Start,
    Die,
    Stop,
    Kill,
}

impl fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Startup => "startup",
            Self::Start => "start",
            Self::Die => "die",
            Self::Stop => "stop",
            Self::Kill => "kill",
        };
        f.write_str(s)
    }
}

/// A request for one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassRequest {
    /// Most recent trigger folded into this request
    pub reason: TriggerReason,
    /// Reload the proxy after a successful pass
    pub reload: bool,
}

impl PassRequest {
    pub fn new(reason: TriggerReason, reload: bool) -> Self {
        Self { reason, reload }
    }

    /// Fold a later request into this one; a reload requested by either is kept.
    pub fn merge(self, later: PassRequest) -> Self {
        Self { reason: later.reason, reload: self.reload || later.reload }
    }
}

/// Coalescing hand-off between event handling and the pass worker.
#[derive(Default)]
pub struct PassQueue {
    slot: Mutex<Option<PassRequest>>,
    notify: Notify,
    closed: AtomicBool,
}

impl PassQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `request`. Returns `true` if it was merged into a pending one.
    pub fn submit(&self, request: PassRequest) -> bool {
        let merged = {
            let mut slot = self.slot.lock();
            let (next, merged) = match slot.take() {
                Some(pending) => (pending.merge(request), true),
                None => (request, false),
            };
            *slot = Some(next);
            merged
        };
        self.notify.notify_one();
        merged
    }

    /// Wait for the next pending request.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn next(&self) -> Option<PassRequest> {
        loop {
            if let Some(request) = self.slot.lock().take() {
                return Some(request);
            }
            if self.closed.load(Ordering::Acquire) {
                return None;
            }
            self.notify.notified().await;
        }
    }

    pub fn pending(&self) -> Option<PassRequest> {
        *self.slot.lock()
    }

    /// Stop accepting waits; a request already pending is still handed out.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_one();
    }
}
