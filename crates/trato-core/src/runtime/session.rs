// trato-core/src/runtime/session.rs
// ============================================================================
// Module: Trato Negotiation Session
// Description: Single-writer orchestration of topic ledger and message timeline.
// Purpose: Execute negotiation operations with fail-fast preconditions and consistent history.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The negotiation session is the single canonical mutation path for one
//! negotiation. Every host surface must call into these methods so the topic
//! ledger and the timeline never diverge: each state change validates all of
//! its preconditions first, then applies the ledger mutation and appends the
//! narrating message as one synchronous step.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::agreement::AgreementRecord;
use crate::core::errors::NotFoundError;
use crate::core::errors::PreconditionError;
use crate::core::errors::ValidationError;
use crate::core::identifiers::FINALIZE_TOPIC_KEY;
use crate::core::identifiers::SessionId;
use crate::core::identifiers::TopicKey;
use crate::core::identifiers::is_finalize_topic;
use crate::core::party::Party;
use crate::core::party::Sender;
use crate::core::spec::SessionSpec;
use crate::core::spec::SpecError;
use crate::core::state::Message;
use crate::core::state::SessionState;
use crate::core::state::SessionStatus;
use crate::core::state::TopicState;
use crate::interfaces::Clock;
use crate::interfaces::DigestProvider;
use crate::runtime::agreement::AgreementBuilder;
use crate::runtime::agreement::AgreementError;

// ============================================================================
// SECTION: System Message Texts
// ============================================================================

/// Terminal system message appended when a negotiation is finalized.
pub const FINALIZED_MESSAGE: &str = "Serviço formalizado";

/// Terminal system message appended when a negotiation is abandoned.
pub const ABANDONED_MESSAGE: &str = "Negociação abandonada";

/// Opening system message appended when a session is created.
pub const OPENED_MESSAGE: &str = "Negociação iniciada";

// ============================================================================
// SECTION: Negotiation Session
// ============================================================================

/// Single-writer negotiation session over one provider-client engagement.
///
/// # Invariants
/// - Operations apply strictly in call order; there is no merging.
/// - A returned error means no state changed.
pub struct NegotiationSession<C: Clock> {
    /// Canonical session state.
    state: SessionState,
    /// Host time source for message and record timestamps.
    clock: C,
}

impl<C: Clock> NegotiationSession<C> {
    /// Opens a new session from a validated specification.
    ///
    /// Seeds the topic ledger and appends the opening system message.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSpec`] when the specification fails
    /// validation.
    pub fn open(spec: &SessionSpec, clock: C) -> Result<Self, SessionError> {
        spec.validate()?;
        let opened_at = clock.now();
        let mut state = SessionState::from_spec(spec, opened_at);
        state.append_message(Sender::System, OPENED_MESSAGE, None, opened_at);
        Ok(Self { state, clock })
    }

    /// Resumes a session from previously persisted state.
    #[must_use]
    pub const fn resume(state: SessionState, clock: C) -> Self {
        Self { state, clock }
    }

    /// Returns a shared view of the session state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Consumes the session and returns its state for persistence.
    #[must_use]
    pub fn into_state(self) -> SessionState {
        self.state
    }

    /// Returns true when every non-finalize topic is agreed.
    #[must_use]
    pub fn all_agreed(&self) -> bool {
        self.state.all_agreed()
    }

    /// Proposes a new value for a topic on behalf of a party.
    ///
    /// The topic moves to pending, whatever state it was in, and one
    /// party-attributed message narrating the proposal is appended.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session is closed, the topic is
    /// unknown or reserved, or the value is blank.
    pub fn propose(
        &mut self,
        key: &TopicKey,
        value: &str,
        by: Party,
    ) -> Result<Message, SessionError> {
        self.ensure_open()?;
        ensure_negotiable(key)?;
        self.state.require_topic(key)?;
        if value.trim().is_empty() {
            return Err(ValidationError::BlankTopicValue {
                topic: key.clone(),
            }
            .into());
        }

        let label = self.state.propose_change(key, value)?.label.clone();
        let text = format!("{} propôs {}: {}", party_label(by), label, value);
        let at = self.clock.now();
        Ok(self.state.append_message(by.into(), text, Some(key.clone()), at))
    }

    /// Accepts the current value of a topic on behalf of a party.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session is closed or the topic is
    /// unknown or reserved.
    pub fn accept(&mut self, key: &TopicKey, by: Party) -> Result<Message, SessionError> {
        self.apply_state(key, TopicState::Agreed, by, None)
    }

    /// Rejects the current value of a topic on behalf of a party.
    ///
    /// The optional reason is embedded in the message text, not stored
    /// structurally.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session is closed or the topic is
    /// unknown or reserved.
    pub fn reject(
        &mut self,
        key: &TopicKey,
        by: Party,
        reason: Option<&str>,
    ) -> Result<Message, SessionError> {
        self.apply_state(key, TopicState::Rejected, by, reason)
    }

    /// Sets a topic's negotiation state on behalf of a party.
    ///
    /// `Proposed` cannot be assigned: it exists only as the opening state of
    /// seeded topics. `Agreed` and `Rejected` behave like [`Self::accept`]
    /// and [`Self::reject`]; `Pending` reopens a topic without changing its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session is closed, the topic is
    /// unknown or reserved, or the state is not externally assignable.
    pub fn set_topic_state(
        &mut self,
        key: &TopicKey,
        state: TopicState,
        by: Party,
    ) -> Result<Message, SessionError> {
        self.apply_state(key, state, by, None)
    }

    /// Applies a topic state change and appends the narrating message.
    fn apply_state(
        &mut self,
        key: &TopicKey,
        state: TopicState,
        by: Party,
        reason: Option<&str>,
    ) -> Result<Message, SessionError> {
        self.ensure_open()?;
        ensure_negotiable(key)?;
        self.state.require_topic(key)?;
        let verb = match state {
            TopicState::Agreed => "aceitou",
            TopicState::Rejected => "recusou",
            TopicState::Pending => "reabriu",
            TopicState::Proposed => {
                return Err(ValidationError::UnassignableState { state }.into());
            }
        };

        let label = self.state.set_topic_state(key, state)?.label.clone();
        let text = match reason {
            Some(reason) => format!("{} {} {}: {}", party_label(by), verb, label, reason),
            None => format!("{} {} {}", party_label(by), verb, label),
        };
        let at = self.clock.now();
        Ok(self.state.append_message(by.into(), text, Some(key.clone()), at))
    }

    /// Finalizes the negotiation and produces the agreement record.
    ///
    /// The record is assembled before any state changes, so a failed build
    /// leaves the session untouched. On success the session becomes
    /// finalized, the finalize control topic is marked agreed, and the
    /// terminal system message is appended.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Precondition`] when the session is closed or
    /// topics are still pending agreement, and [`SessionError::Agreement`]
    /// when record assembly fails.
    pub fn finalize<D: DigestProvider>(
        &mut self,
        builder: &AgreementBuilder<D>,
    ) -> Result<AgreementRecord, SessionError> {
        self.ensure_open()?;
        if !self.state.all_agreed() {
            return Err(PreconditionError::TopicsNotAgreed {
                pending: self.state.pending_topic_keys(),
            }
            .into());
        }

        let now = self.clock.now();
        let record = builder.build_record(&self.state, now)?;

        self.state.status = SessionStatus::Finalized;
        self.state.closed_at = Some(now);
        let finalize_key = TopicKey::new(FINALIZE_TOPIC_KEY);
        if self.state.topic(&finalize_key).is_some() {
            self.state.set_topic_state(&finalize_key, TopicState::Agreed)?;
        }
        self.state.append_message(Sender::System, FINALIZED_MESSAGE, Some(finalize_key), now);
        Ok(record)
    }

    /// Abandons the negotiation.
    ///
    /// The optional reason is embedded in the terminal system message.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Precondition`] when the session is already
    /// closed.
    pub fn abandon(&mut self, reason: Option<&str>) -> Result<Message, SessionError> {
        self.ensure_open()?;

        let now = self.clock.now();
        self.state.status = SessionStatus::Abandoned;
        self.state.closed_at = Some(now);
        let text = match reason {
            Some(reason) => format!("{ABANDONED_MESSAGE}: {reason}"),
            None => ABANDONED_MESSAGE.to_string(),
        };
        Ok(self.state.append_message(Sender::System, text, None, now))
    }

    /// Returns a read-only status summary for host surfaces.
    #[must_use]
    pub fn summary(&self) -> NegotiationSummary {
        NegotiationSummary::from_state(&self.state)
    }

    /// Ensures the session still accepts mutations.
    fn ensure_open(&self) -> Result<(), PreconditionError> {
        if self.state.status.is_terminal() {
            return Err(PreconditionError::SessionClosed {
                status: self.state.status,
            });
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Status Summary
// ============================================================================

/// Read-only summary of a negotiation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationSummary {
    /// Session identifier.
    pub session_id: SessionId,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// True when every non-finalize topic is agreed.
    pub all_agreed: bool,
    /// Current topic values and states in ledger order.
    pub topics: Vec<TopicEntry>,
    /// Keys of non-finalize topics not yet agreed, in ledger order.
    pub pending_topics: Vec<TopicKey>,
    /// Number of timeline messages.
    pub message_count: u64,
}

impl NegotiationSummary {
    /// Builds a summary from session state.
    #[must_use]
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            session_id: state.session_id.clone(),
            status: state.status,
            all_agreed: state.all_agreed(),
            topics: state
                .topics
                .iter()
                .map(|topic| TopicEntry {
                    key: topic.key.clone(),
                    state: topic.state,
                    value: topic.value.clone(),
                })
                .collect(),
            pending_topics: state.pending_topic_keys(),
            message_count: state.messages.len() as u64,
        }
    }
}

/// One topic's current value and state within a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicEntry {
    /// Topic key.
    pub key: TopicKey,
    /// Current negotiation state.
    pub state: TopicState,
    /// Current negotiated value.
    pub value: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Negotiation session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Session spec failed validation.
    #[error("invalid session spec: {0}")]
    InvalidSpec(#[from] SpecError),
    /// Referenced entity does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    /// A state precondition does not hold.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    /// Boundary input is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Agreement record assembly failed.
    #[error("agreement assembly failed: {0}")]
    Agreement(#[from] AgreementError),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the display label for a signing party in system-facing texts.
const fn party_label(party: Party) -> &'static str {
    match party {
        Party::Provider => "Prestador",
        Party::Client => "Cliente",
    }
}

/// Rejects negotiation operations aimed at the finalize control topic.
fn ensure_negotiable(key: &TopicKey) -> Result<(), ValidationError> {
    if is_finalize_topic(key) {
        return Err(ValidationError::ReservedTopic {
            topic: key.clone(),
        });
    }
    Ok(())
}
