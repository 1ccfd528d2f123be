// trato-core/src/runtime/clock.rs
// ============================================================================
// Module: Trato Clocks
// Description: System and logical clock implementations.
// Purpose: Supply timestamps to sessions and collectors without ambient time reads.
// Dependencies: crate::{core, interfaces}, time
// ============================================================================

//! ## Overview
//! Hosts pick the clock that matches their needs: `SystemClock` for wall
//! time, `LogicalClock` for deterministic replays and tests, `FixedClock`
//! when a stalled or repeating reading must be simulated. The engine itself
//! never reads time; it only consumes what these produce.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use time::OffsetDateTime;

use crate::core::time::Timestamp;
use crate::interfaces::Clock;

// ============================================================================
// SECTION: System Clock
// ============================================================================

/// Wall-clock time source in unix milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        let millis = i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX);
        Timestamp::UnixMillis(millis)
    }
}

// ============================================================================
// SECTION: Logical Clock
// ============================================================================

/// Monotonic logical time source.
///
/// Each reading returns the next value in sequence, so replays are exact.
#[derive(Debug, Default)]
pub struct LogicalClock {
    /// Next logical value to hand out.
    next: AtomicU64,
}

impl LogicalClock {
    /// Creates a logical clock starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Creates a logical clock starting at the given value.
    #[must_use]
    pub const fn starting_at(value: u64) -> Self {
        Self {
            next: AtomicU64::new(value),
        }
    }
}

impl Clock for LogicalClock {
    fn now(&self) -> Timestamp {
        Timestamp::Logical(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

// ============================================================================
// SECTION: Fixed Clock
// ============================================================================

/// Clock that repeats one reading forever.
///
/// Useful for exercising timestamp-collision behavior, where ordering must
/// fall back to sequence numbers.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    /// The reading returned on every call.
    at: Timestamp,
}

impl FixedClock {
    /// Creates a fixed clock pinned to the given reading.
    #[must_use]
    pub const fn new(at: Timestamp) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.at
    }
}
