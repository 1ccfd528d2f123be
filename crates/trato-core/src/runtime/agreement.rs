// trato-core/src/runtime/agreement.rs
// ============================================================================
// Module: Trato Agreement Builder
// Description: Terms snapshot capture, canonical digest computation, record assembly.
// Purpose: Produce the immutable agreement record exactly once per finalized negotiation.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The agreement builder turns agreed session state into the tamper-evident
//! agreement record. The snapshot reads agreed values only, the digest is
//! computed over NFC-normalized terms in RFC 8785 canonical JSON, and a
//! missing digest backend degrades the record instead of failing it: the
//! record is created without a digest and marked non audit grade.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::core::agreement::AgreementRecord;
use crate::core::agreement::TermsSnapshot;
use crate::core::errors::join_keys;
use crate::core::hashing::HashAlgorithm;
use crate::core::hashing::HashDigest;
use crate::core::hashing::HashError;
use crate::core::hashing::canonical_json_bytes;
use crate::core::hashing::hash_bytes;
use crate::core::hashing::normalize_text;
use crate::core::identifiers::SessionId;
use crate::core::identifiers::TopicKey;
use crate::core::state::SessionState;
use crate::core::time::Timestamp;
use crate::interfaces::DigestError;
use crate::interfaces::DigestProvider;

// ============================================================================
// SECTION: Digest Providers
// ============================================================================

/// In-process SHA-256 digest provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256DigestProvider;

impl DigestProvider for Sha256DigestProvider {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha256
    }

    fn digest(&self, bytes: &[u8]) -> Result<HashDigest, DigestError> {
        Ok(hash_bytes(HashAlgorithm::Sha256, bytes))
    }
}

// ============================================================================
// SECTION: Agreement Builder
// ============================================================================

/// Builds agreement records from agreed session state.
pub struct AgreementBuilder<D: DigestProvider> {
    /// Digest backend for canonical term hashing.
    digest_provider: D,
}

impl Default for AgreementBuilder<Sha256DigestProvider> {
    fn default() -> Self {
        Self::new(Sha256DigestProvider)
    }
}

impl<D: DigestProvider> AgreementBuilder<D> {
    /// Creates a builder over the given digest backend.
    #[must_use]
    pub const fn new(digest_provider: D) -> Self {
        Self { digest_provider }
    }

    /// Captures the agreed, non-finalize topic values as an immutable snapshot.
    ///
    /// Values are NFC normalized; the shared borrow of the whole state keeps
    /// the read atomic relative to the single-writer session.
    #[must_use]
    pub fn build_snapshot(state: &SessionState) -> TermsSnapshot {
        let mut terms = TermsSnapshot::new();
        for topic in &state.topics {
            if topic.is_finalize() || !topic.state.is_agreed() {
                continue;
            }
            terms.insert(topic.key.as_str(), normalize_text(&topic.value));
        }
        terms
    }

    /// Computes the canonical digest binding the terms to their session.
    ///
    /// The digest covers the session identifier and the snapshot in RFC 8785
    /// canonical JSON, so any change to any term changes the digest while
    /// serialization order never does.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementError::Canonical`] when canonicalization fails and
    /// [`AgreementError::Digest`] when the digest backend is unavailable.
    pub fn compute_digest(
        &self,
        session_id: &SessionId,
        terms: &TermsSnapshot,
    ) -> Result<HashDigest, AgreementError> {
        let input = DigestInput {
            session_id,
            terms,
        };
        let bytes = canonical_json_bytes(&input)?;
        Ok(self.digest_provider.digest(&bytes)?)
    }

    /// Assembles the agreement record for a fully agreed session.
    ///
    /// An unavailable digest backend yields a degraded record: no digest,
    /// `audit_grade` false, and no error.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementError::TermsIncomplete`] when any non-finalize
    /// topic is not agreed, and [`AgreementError::Canonical`] when the terms
    /// cannot be canonicalized.
    pub fn build_record(
        &self,
        state: &SessionState,
        created_at: Timestamp,
    ) -> Result<AgreementRecord, AgreementError> {
        if !state.all_agreed() {
            return Err(AgreementError::TermsIncomplete {
                pending: state.pending_topic_keys(),
            });
        }

        let terms = Self::build_snapshot(state);
        let (digest, audit_grade) = match self.compute_digest(&state.session_id, &terms) {
            Ok(digest) => (Some(digest), true),
            Err(AgreementError::Digest(_)) => (None, false),
            Err(err) => return Err(err),
        };

        Ok(AgreementRecord {
            session_id: state.session_id.clone(),
            terms,
            digest,
            audit_grade,
            created_at,
            provider_signature: None,
            client_signature: None,
        })
    }
}

// ============================================================================
// SECTION: Digest Input
// ============================================================================

/// Canonical digest input binding a terms snapshot to its session.
#[derive(Serialize)]
struct DigestInput<'a> {
    /// Session the terms belong to.
    session_id: &'a SessionId,
    /// NFC-normalized agreed terms.
    terms: &'a TermsSnapshot,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Agreement assembly errors.
#[derive(Debug, Error)]
pub enum AgreementError {
    /// Topics are still pending agreement.
    #[error("cannot build agreement record: topics pending agreement: {}", join_keys(pending))]
    TermsIncomplete {
        /// Topic keys not yet agreed, in ledger order.
        pending: Vec<TopicKey>,
    },
    /// Canonical JSON serialization failed.
    #[error(transparent)]
    Canonical(#[from] HashError),
    /// Digest backend failed or is unavailable.
    #[error(transparent)]
    Digest(#[from] DigestError),
}
