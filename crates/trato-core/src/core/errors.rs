// trato-core/src/core/errors.rs
// ============================================================================
// Module: Trato Error Taxonomy
// Description: Shared error classes for negotiation operations.
// Purpose: Give hosts stable, typed failures for lookup, precondition, and input faults.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every fallible negotiation operation fails in one of three ways: the
//! referenced entity does not exist, a state precondition does not hold, or
//! boundary input is malformed. Operations validate all preconditions before
//! mutating anything, so a returned error always means no state changed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::SessionId;
use crate::core::identifiers::TopicKey;
use crate::core::party::Party;
use crate::core::state::SessionStatus;
use crate::core::state::TopicState;

// ============================================================================
// SECTION: Not Found
// ============================================================================

/// Lookup failures for entities referenced by key or identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    /// The topic key is not part of the session ledger.
    #[error("unknown topic key: {0}")]
    Topic(TopicKey),
    /// The session identifier is not known to the store.
    #[error("unknown session: {0}")]
    Session(SessionId),
}

// ============================================================================
// SECTION: Preconditions
// ============================================================================

/// State preconditions that must hold before an operation may proceed.
///
/// Variants carry enough context for hosts to render an actionable message
/// without inspecting session state again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// The session has reached a terminal status and accepts no further changes.
    #[error("session is {status} and accepts no further changes")]
    SessionClosed {
        /// Terminal status the session is in.
        status: SessionStatus,
    },
    /// Finalization was requested while topics are still unagreed.
    #[error("cannot finalize: topics pending agreement: {}", join_keys(pending))]
    TopicsNotAgreed {
        /// Topic keys not yet in the agreed state, in ledger order.
        pending: Vec<TopicKey>,
    },
    /// The party has already recorded a signature on this agreement.
    #[error("party {party} has already signed this agreement")]
    AlreadySigned {
        /// Party whose signature already exists.
        party: Party,
    },
    /// The agreement record carries both signatures and is immutable.
    #[error("agreement record is sealed and immutable")]
    RecordSealed,
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Malformed input detected at an operation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A typed signature name is below the minimum length.
    #[error("typed name must contain at least {minimum} characters, got {length}")]
    TypedNameTooShort {
        /// Character count of the submitted name after trimming.
        length: usize,
        /// Minimum accepted character count.
        minimum: usize,
    },
    /// A proposed topic value is blank.
    #[error("proposed value for topic {topic} must not be blank")]
    BlankTopicValue {
        /// Topic the blank value was proposed for.
        topic: TopicKey,
    },
    /// The requested topic state cannot be assigned from outside the engine.
    #[error("topic state {state} cannot be assigned externally")]
    UnassignableState {
        /// State that was rejected.
        state: TopicState,
    },
    /// A negotiation operation targeted the reserved finalize control topic.
    #[error("the reserved topic {topic} cannot be negotiated directly")]
    ReservedTopic {
        /// Reserved topic key that was targeted.
        topic: TopicKey,
    },
}

// ============================================================================
// SECTION: Formatting Helpers
// ============================================================================

/// Joins topic keys into a stable comma-separated list for error display.
pub(crate) fn join_keys(keys: &[TopicKey]) -> String {
    let mut out = String::new();
    for (index, key) in keys.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(key.as_str());
    }
    out
}
