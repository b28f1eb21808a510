use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use flume::{Receiver, Sender};

/// Messages published by the explorer core for a frontend to consume.
#[derive(Debug, Clone, PartialEq)]
pub enum ExplorerEvent {
    /// Render props were recomputed; the frontend may redraw.
    Refreshed,
    /// A tail polling cycle completed.
    Tick,
    /// The search state machine moved to a new state.
    StatusChanged(crate::logs::types::SearchStatus),
    /// A background operation failed (already logged; message is for a
    /// user-visible notification).
    Error(String),
}

/// Core → frontend event channel with coalesced redraw requests.
#[derive(Debug, Clone)]
pub struct Bus {
    tx: Sender<ExplorerEvent>,
    refresh_pending: Arc<AtomicBool>,
}

impl Bus {
    pub fn new() -> (Self, Receiver<ExplorerEvent>) {
        let (tx, rx) = flume::unbounded();
        (
            Self {
                tx,
                refresh_pending: Arc::new(AtomicBool::new(false)),
            },
            rx,
        )
    }

    /// Publish a `Refreshed` event unless one is already outstanding.
    /// Only one redraw request should be pending at a time to avoid
    /// flooding a slow frontend. Returns whether a message was sent.
    pub fn publish_refresh(&self) -> bool {
        if self
            .refresh_pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        self.tx.send(ExplorerEvent::Refreshed).is_ok()
    }

    /// Mark the pending redraw as handled so the next request can be queued.
    pub fn mark_refresh_complete(&self) {
        self.refresh_pending.store(false, Ordering::Release);
    }

    /// Publish a non-coalesced event. Send failures mean no frontend is
    /// listening, which is fine for a headless core.
    pub fn publish(&self, event: ExplorerEvent) {
        let _ = self.tx.send(event);
    }
}
