// trato-core/src/core/spec.rs
// ============================================================================
// Module: Trato Session Specification
// Description: Topic catalog and party wiring declared at session creation.
// Purpose: Validate session specifications fail-closed before any state exists.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A session specification fixes the topic catalog for one negotiation: which
//! topics exist, their display metadata, and any standing initial offers.
//! Topics cannot be added or removed after the session opens, so validation
//! happens here, once, before any session state is created.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::FINALIZE_TOPIC_KEY;
use crate::core::identifiers::PartyId;
use crate::core::identifiers::SessionId;
use crate::core::identifiers::TopicKey;
use crate::core::identifiers::is_finalize_topic;

// ============================================================================
// SECTION: Session Specification
// ============================================================================

/// Canonical session specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSpec {
    /// Session identifier.
    pub session_id: SessionId,
    /// Account identifier of the provider party.
    pub provider: PartyId,
    /// Account identifier of the client party.
    pub client: PartyId,
    /// Negotiable topics in display order, including the finalize control topic.
    pub topics: Vec<TopicSpec>,
}

impl SessionSpec {
    /// Validates the session specification invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when validation fails.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.provider == self.client {
            return Err(SpecError::SameParty(self.provider.to_string()));
        }

        ensure_negotiable_topics(&self.topics)?;
        ensure_topic_fields_present(&self.topics)?;
        ensure_unique_topic_keys(&self.topics)?;
        ensure_finalize_topic(&self.topics)?;

        Ok(())
    }
}

// ============================================================================
// SECTION: Topic Specifications
// ============================================================================

/// Topic specification naming one negotiable term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSpec {
    /// Stable topic key.
    pub key: TopicKey,
    /// Short display label.
    pub label: String,
    /// Longer display description.
    pub description: String,
    /// Standing opening offer. Topics without one open blank and pending.
    pub initial_value: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Session specification validation errors.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Provider and client resolve to the same account.
    #[error("provider and client must be distinct parties, both are: {0}")]
    SameParty(String),
    /// Specification contains no negotiable topics.
    #[error("session spec must define at least one negotiable topic")]
    MissingTopics,
    /// A topic key is blank.
    #[error("topic key must not be blank")]
    BlankTopicKey,
    /// A topic label is blank.
    #[error("topic label must not be blank for key: {0}")]
    BlankTopicLabel(String),
    /// Duplicate topic keys detected.
    #[error("duplicate topic key: {0}")]
    DuplicateTopicKey(String),
    /// The reserved finalize control topic is missing.
    #[error("session spec must include the reserved topic: {FINALIZE_TOPIC_KEY}")]
    MissingFinalizeTopic,
    /// The finalize control topic carries an initial value.
    #[error("the finalize control topic must not carry an initial value")]
    FinalizeTopicWithValue,
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Ensures at least one topic besides the finalize control topic exists.
fn ensure_negotiable_topics(topics: &[TopicSpec]) -> Result<(), SpecError> {
    if topics.iter().any(|topic| !is_finalize_topic(&topic.key)) {
        Ok(())
    } else {
        Err(SpecError::MissingTopics)
    }
}

/// Ensures topic keys and labels are non-blank.
fn ensure_topic_fields_present(topics: &[TopicSpec]) -> Result<(), SpecError> {
    for topic in topics {
        if topic.key.as_str().trim().is_empty() {
            return Err(SpecError::BlankTopicKey);
        }
        if topic.label.trim().is_empty() {
            return Err(SpecError::BlankTopicLabel(topic.key.to_string()));
        }
    }
    Ok(())
}

/// Ensures topic keys are unique within the spec.
fn ensure_unique_topic_keys(topics: &[TopicSpec]) -> Result<(), SpecError> {
    for (index, topic) in topics.iter().enumerate() {
        if topics.iter().skip(index + 1).any(|other| other.key == topic.key) {
            return Err(SpecError::DuplicateTopicKey(topic.key.to_string()));
        }
    }
    Ok(())
}

/// Ensures exactly one finalize control topic exists and carries no offer.
fn ensure_finalize_topic(topics: &[TopicSpec]) -> Result<(), SpecError> {
    let finalize = topics
        .iter()
        .find(|topic| is_finalize_topic(&topic.key))
        .ok_or(SpecError::MissingFinalizeTopic)?;
    if finalize.initial_value.is_some() {
        return Err(SpecError::FinalizeTopicWithValue);
    }
    Ok(())
}
