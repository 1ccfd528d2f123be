// crates/trato-providers/src/fixed.rs
// ============================================================================
// Module: Fixed Location Sources
// Description: Location sources with statically determined outcomes.
// Purpose: Serve known coordinates and model capability-less platforms.
// Dependencies: trato-core
// ============================================================================

//! ## Overview
//! Fixed sources resolve every fix request the same way: [`FixedLocationSource`]
//! delivers host-configured coordinates, [`DeniedLocationSource`] reports a
//! standing denial, and [`SilentLocationSource`] never responds at all. The
//! silent source keeps its senders alive so the signing runtime observes a
//! full timeout rather than an immediate disconnect.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::sync::mpsc;
use std::sync::mpsc::Sender;

use trato_core::FixOutcome;
use trato_core::Geolocation;
use trato_core::LocationSource;
use trato_core::PendingFix;

// ============================================================================
// SECTION: Fixed Source
// ============================================================================

/// Location source that resolves every request with the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationSource {
    /// Coordinates delivered for every fix request.
    fix: Geolocation,
}

impl FixedLocationSource {
    /// Creates a source that always delivers the given fix.
    #[must_use]
    pub const fn new(fix: Geolocation) -> Self {
        Self {
            fix,
        }
    }
}

impl LocationSource for FixedLocationSource {
    fn request_fix(&self) -> PendingFix {
        let (sender, receiver) = mpsc::channel();
        let _ = sender.send(FixOutcome::Fix(self.fix));
        PendingFix::new(receiver)
    }
}

// ============================================================================
// SECTION: Denied Source
// ============================================================================

/// Location source that denies every request.
#[derive(Debug, Clone)]
pub struct DeniedLocationSource {
    /// Denial reason reported for every request.
    reason: String,
}

impl DeniedLocationSource {
    /// Creates a source that denies every request with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl LocationSource for DeniedLocationSource {
    fn request_fix(&self) -> PendingFix {
        let (sender, receiver) = mpsc::channel();
        let _ = sender.send(FixOutcome::Denied(self.reason.clone()));
        PendingFix::new(receiver)
    }
}

// ============================================================================
// SECTION: Silent Source
// ============================================================================

/// Location source that never resolves a request.
///
/// Each request's sender is retained so the channel stays open and the
/// signing runtime waits out its full configured bound.
#[derive(Debug, Default)]
pub struct SilentLocationSource {
    /// Senders kept alive for the lifetime of the source.
    senders: Mutex<Vec<Sender<FixOutcome>>>,
}

impl SilentLocationSource {
    /// Creates a source that never responds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocationSource for SilentLocationSource {
    fn request_fix(&self) -> PendingFix {
        let (sender, receiver) = mpsc::channel();
        if let Ok(mut guard) = self.senders.lock() {
            guard.push(sender);
        }
        PendingFix::new(receiver)
    }
}
