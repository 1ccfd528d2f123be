// trato-core/src/core/time.rs
// ============================================================================
// Module: Trato Time Model
// Description: Canonical timestamp representations for messages and records.
// Purpose: Provide deterministic, replayable time values across Trato records.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Trato embeds explicit time values in messages, signatures, and agreement
//! records to keep replay deterministic. The core engine never reads
//! wall-clock time directly; hosts supply timestamps through a [`Clock`]
//! implementation.
//!
//! [`Clock`]: crate::interfaces::Clock

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp used in Trato timelines, signatures, and records.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
/// - No validation is performed; monotonicity is enforced where entries are appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<i64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }

    /// Returns the timestamp as logical time when available.
    #[must_use]
    pub const fn as_logical(&self) -> Option<u64> {
        match self {
            Self::UnixMillis(_) => None,
            Self::Logical(value) => Some(*value),
        }
    }

    /// Returns the later of `self` and `other` when both share a kind.
    ///
    /// Mixed-kind comparisons keep `self`; timelines never mix kinds within a
    /// single session, so the fallback only guards malformed input.
    #[must_use]
    pub const fn max_of(self, other: Self) -> Self {
        match (self, other) {
            (Self::UnixMillis(a), Self::UnixMillis(b)) => {
                if b > a {
                    Self::UnixMillis(b)
                } else {
                    Self::UnixMillis(a)
                }
            }
            (Self::Logical(a), Self::Logical(b)) => {
                if b > a {
                    Self::Logical(b)
                } else {
                    Self::Logical(a)
                }
            }
            (keep, _) => keep,
        }
    }
}
