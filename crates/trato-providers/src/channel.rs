// crates/trato-providers/src/channel.rs
// ============================================================================
// Module: Channel Location Source
// Description: Location source fed by an external host callback.
// Purpose: Bridge asynchronous platform geolocation APIs into fix requests.
// Dependencies: trato-core
// ============================================================================

//! ## Overview
//! The channel source splits geolocation into two halves: the signing runtime
//! holds the [`ChannelLocationSource`] and the host holds the matching
//! [`ChannelFixHandle`]. Each fix request registers a one-shot channel; the
//! handle resolves requests oldest-first. Cancellation removes the pending
//! registration, so a late host callback after timeout delivers nowhere.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::sync::mpsc::Sender;

use trato_core::FixOutcome;
use trato_core::LocationSource;
use trato_core::PendingFix;

// ============================================================================
// SECTION: Shared State
// ============================================================================

/// Registration state shared between the source and its handle.
#[derive(Debug, Default)]
struct ChannelState {
    /// Pending requests in arrival order, keyed for cancellation.
    pending: Mutex<VecDeque<(u64, Sender<FixOutcome>)>>,
    /// Monotonic registration key generator.
    next_key: AtomicU64,
}

impl ChannelState {
    /// Removes the registration with the given key, if still pending.
    fn remove(&self, key: u64) {
        if let Ok(mut guard) = self.pending.lock() {
            guard.retain(|(pending_key, _)| *pending_key != key);
        }
    }
}

// ============================================================================
// SECTION: Location Source
// ============================================================================

/// Location source resolved by an external [`ChannelFixHandle`].
#[derive(Debug, Clone)]
pub struct ChannelLocationSource {
    /// Registration state shared with the handle.
    state: Arc<ChannelState>,
}

impl ChannelLocationSource {
    /// Creates a connected source and handle pair.
    #[must_use]
    pub fn new() -> (Self, ChannelFixHandle) {
        let state = Arc::new(ChannelState::default());
        let source = Self {
            state: Arc::clone(&state),
        };
        let handle = ChannelFixHandle {
            state,
        };
        (source, handle)
    }
}

impl LocationSource for ChannelLocationSource {
    fn request_fix(&self) -> PendingFix {
        let key = self.state.next_key.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel();
        if let Ok(mut guard) = self.state.pending.lock() {
            guard.push_back((key, sender));
        }
        let state = Arc::clone(&self.state);
        PendingFix::with_cancel(
            receiver,
            Box::new(move || {
                state.remove(key);
            }),
        )
    }
}

// ============================================================================
// SECTION: Host Handle
// ============================================================================

/// Host-side handle resolving pending fix requests.
#[derive(Debug, Clone)]
pub struct ChannelFixHandle {
    /// Registration state shared with the source.
    state: Arc<ChannelState>,
}

impl ChannelFixHandle {
    /// Resolves the oldest pending request with the given outcome.
    ///
    /// Returns `false` when no request is pending or the requester already
    /// cancelled and dropped its receiver.
    #[must_use]
    pub fn resolve(&self, outcome: FixOutcome) -> bool {
        let entry = match self.state.pending.lock() {
            Ok(mut guard) => guard.pop_front(),
            Err(_) => None,
        };
        match entry {
            Some((_, sender)) => sender.send(outcome).is_ok(),
            None => false,
        }
    }

    /// Returns the number of requests awaiting resolution.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.pending.lock().map_or(0, |guard| guard.len())
    }
}
