// trato-core/src/core/state.rs
// ============================================================================
// Module: Trato Session State
// Description: Topic ledger, message timeline, and session lifecycle structures.
// Purpose: Provide the canonical, serializable negotiation state mutated only by the session runtime.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Session state is the single source of truth for one negotiation: the topic
//! ledger holds the current value and state of each negotiable topic, and the
//! timeline holds the append-only, strictly ordered message log. Quantitative
//! history lives in the timeline; topics hold current values only.
//!
//! Mutating methods are crate-private so every change flows through the
//! negotiation session runtime, which keeps ledger and timeline consistent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::errors::NotFoundError;
use crate::core::identifiers::MessageId;
use crate::core::identifiers::PartyId;
use crate::core::identifiers::SessionId;
use crate::core::identifiers::TopicKey;
use crate::core::identifiers::is_finalize_topic;
use crate::core::party::Sender;
use crate::core::spec::SessionSpec;
use crate::core::spec::TopicSpec;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Topic States
// ============================================================================

/// Negotiation state of a single topic.
///
/// # Invariants
/// - `Proposed` is only ever the opening state of a topic seeded with an
///   initial value; it cannot be assigned after session creation.
/// - Any proposal moves the topic to `Pending`, including from `Agreed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicState {
    /// A change was proposed and awaits the counterparty's decision.
    Pending,
    /// The seeded opening offer stands and has not been countered.
    Proposed,
    /// Both parties accept the current value.
    Agreed,
    /// The counterparty declined the current value.
    Rejected,
}

impl TopicState {
    /// Returns the stable wire label for this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Proposed => "proposed",
            Self::Agreed => "agreed",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true when the topic counts toward the all-agreed gate.
    #[must_use]
    pub const fn is_agreed(self) -> bool {
        matches!(self, Self::Agreed)
    }
}

impl fmt::Display for TopicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Topics
// ============================================================================

/// One negotiable topic within a session ledger.
///
/// # Invariants
/// - `key` is unique within the session and never changes.
/// - `value` and `state` are mutated only by the session runtime.
/// - `label` and `description` are display metadata and carry no semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Stable key identifying the topic.
    pub key: TopicKey,
    /// Short display label.
    pub label: String,
    /// Longer display description.
    pub description: String,
    /// Current negotiated value, free-form text.
    pub value: String,
    /// Current negotiation state.
    pub state: TopicState,
}

impl Topic {
    /// Builds the opening ledger entry for a topic specification.
    ///
    /// Topics seeded with an initial value open as `Proposed` (the standing
    /// offer); topics without one open blank and `Pending`.
    #[must_use]
    pub fn seeded(spec: &TopicSpec) -> Self {
        match &spec.initial_value {
            Some(value) => Self {
                key: spec.key.clone(),
                label: spec.label.clone(),
                description: spec.description.clone(),
                value: value.clone(),
                state: TopicState::Proposed,
            },
            None => Self {
                key: spec.key.clone(),
                label: spec.label.clone(),
                description: spec.description.clone(),
                value: String::new(),
                state: TopicState::Pending,
            },
        }
    }

    /// Returns true when this is the reserved finalization control topic.
    #[must_use]
    pub fn is_finalize(&self) -> bool {
        is_finalize_topic(&self.key)
    }
}

// ============================================================================
// SECTION: Messages
// ============================================================================

/// One entry in the append-only session timeline.
///
/// # Invariants
/// - Messages are never edited or deleted once appended.
/// - `seq` is strictly increasing across the timeline.
/// - `sent_at` is monotonically non-decreasing; `seq` breaks clock collisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier within the session.
    pub message_id: MessageId,
    /// Strictly increasing ordering key.
    pub seq: u64,
    /// Author attribution.
    pub sender: Sender,
    /// Message text. The timeline never interprets it.
    pub text: String,
    /// Timestamp supplied by the session clock, clamped monotonic.
    pub sent_at: Timestamp,
    /// Topic this message refers to, when it narrates a topic change.
    pub topic: Option<TopicKey>,
}

// ============================================================================
// SECTION: Session Status
// ============================================================================

/// Lifecycle status of a negotiation session.
///
/// # Invariants
/// - `Open` is the only non-terminal status.
/// - Transitions are `Open -> Finalized` and `Open -> Abandoned` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Negotiation is in progress; topics and timeline accept changes.
    Open,
    /// Terms were agreed and the agreement record was produced.
    Finalized,
    /// Negotiation was called off before agreement.
    Abandoned,
}

impl SessionStatus {
    /// Returns the stable wire label for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Finalized => "finalized",
            Self::Abandoned => "abandoned",
        }
    }

    /// Returns true when no further session mutations are accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Open)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Session State
// ============================================================================

/// Canonical state of one negotiation session.
///
/// # Invariants
/// - `topics` preserves specification order for display; keys are unique.
/// - `messages` is append-only and ordered by `seq`.
/// - `closed_at` is set exactly when `status` becomes terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Session identifier.
    pub session_id: SessionId,
    /// Account identifier of the provider party.
    pub provider: PartyId,
    /// Account identifier of the client party.
    pub client: PartyId,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Timestamp when the session was opened.
    pub opened_at: Timestamp,
    /// Timestamp when the session reached a terminal status.
    pub closed_at: Option<Timestamp>,
    /// Topic ledger in specification order.
    pub topics: Vec<Topic>,
    /// Append-only message timeline.
    pub messages: Vec<Message>,
}

impl SessionState {
    /// Builds the opening state for a validated session specification.
    #[must_use]
    pub fn from_spec(spec: &SessionSpec, opened_at: Timestamp) -> Self {
        Self {
            session_id: spec.session_id.clone(),
            provider: spec.provider.clone(),
            client: spec.client.clone(),
            status: SessionStatus::Open,
            opened_at,
            closed_at: None,
            topics: spec.topics.iter().map(Topic::seeded).collect(),
            messages: Vec::new(),
        }
    }

    // ========================================================================
    // SECTION: Topic Ledger
    // ========================================================================

    /// Returns the topic for `key`, when present.
    #[must_use]
    pub fn topic(&self, key: &TopicKey) -> Option<&Topic> {
        self.topics.iter().find(|topic| &topic.key == key)
    }

    /// Returns the topic for `key` or a typed lookup error.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Topic`] when the key is not in the ledger.
    pub fn require_topic(&self, key: &TopicKey) -> Result<&Topic, NotFoundError> {
        self.topic(key).ok_or_else(|| NotFoundError::Topic(key.clone()))
    }

    /// Returns true when every non-finalize topic is agreed.
    ///
    /// This predicate is the sole gate for finalization. The reserved
    /// finalize control topic never counts toward it.
    #[must_use]
    pub fn all_agreed(&self) -> bool {
        self.topics
            .iter()
            .filter(|topic| !topic.is_finalize())
            .all(|topic| topic.state.is_agreed())
    }

    /// Returns the keys of non-finalize topics not yet agreed, in ledger order.
    #[must_use]
    pub fn pending_topic_keys(&self) -> Vec<TopicKey> {
        self.topics
            .iter()
            .filter(|topic| !topic.is_finalize() && !topic.state.is_agreed())
            .map(|topic| topic.key.clone())
            .collect()
    }

    /// Records a proposed change: the topic takes the new value and moves to
    /// pending, whatever state it was in. Re-proposing an agreed topic
    /// deliberately reopens it.
    ///
    /// Emits no timeline entry; message generation belongs to the session.
    pub(crate) fn propose_change(
        &mut self,
        key: &TopicKey,
        value: impl Into<String>,
    ) -> Result<&Topic, NotFoundError> {
        let topic = self
            .topics
            .iter_mut()
            .find(|topic| &topic.key == key)
            .ok_or_else(|| NotFoundError::Topic(key.clone()))?;
        topic.value = value.into();
        topic.state = TopicState::Pending;
        Ok(topic)
    }

    /// Sets a topic's negotiation state without touching its value.
    ///
    /// Callers must reject externally unassignable states before calling;
    /// the ledger applies whatever state it is given.
    pub(crate) fn set_topic_state(
        &mut self,
        key: &TopicKey,
        state: TopicState,
    ) -> Result<&Topic, NotFoundError> {
        let topic = self
            .topics
            .iter_mut()
            .find(|topic| &topic.key == key)
            .ok_or_else(|| NotFoundError::Topic(key.clone()))?;
        topic.state = state;
        Ok(topic)
    }

    // ========================================================================
    // SECTION: Timeline
    // ========================================================================

    /// Returns the timeline in insertion order.
    ///
    /// The iterator is lazy and restartable; it never mutates the timeline.
    pub fn timeline(&self) -> impl Iterator<Item = &Message> + '_ {
        self.messages.iter()
    }

    /// Appends a message with the next sequence number and returns it.
    ///
    /// The supplied timestamp is clamped to be no earlier than the last
    /// entry's, so insertion order and timestamp order never diverge even
    /// when the host clock stalls or repeats a reading.
    pub(crate) fn append_message(
        &mut self,
        sender: Sender,
        text: impl Into<String>,
        topic: Option<TopicKey>,
        at: Timestamp,
    ) -> Message {
        let seq = next_seq(&self.messages);
        let sent_at = match self.messages.last() {
            Some(last) => last.sent_at.max_of(at),
            None => at,
        };
        let message = Message {
            message_id: MessageId::new(format!("msg-{seq}")),
            seq,
            sender,
            text: text.into(),
            sent_at,
            topic,
        };
        self.messages.push(message.clone());
        message
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Computes the next sequence number for an append-only list.
const fn next_seq<T>(items: &[T]) -> u64 {
    items.len() as u64 + 1
}
