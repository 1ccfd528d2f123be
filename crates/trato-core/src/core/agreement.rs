// trato-core/src/core/agreement.rs
// ============================================================================
// Module: Trato Agreement Records
// Description: Immutable terms snapshots, party signatures, and sealed records.
// Purpose: Represent the tamper-evident output of a finalized negotiation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An agreement record is produced exactly once per negotiation, strictly
//! after every topic is agreed. Its terms snapshot and digest never change
//! afterwards; the only permitted mutation is attaching each party's
//! signature once. With both signatures present the record is sealed and
//! fully immutable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::errors::PreconditionError;
use crate::core::hashing::HashDigest;
use crate::core::identifiers::SessionId;
use crate::core::party::Party;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Terms Snapshot
// ============================================================================

/// Immutable snapshot of agreed topic values keyed by topic key.
///
/// # Invariants
/// - Keys are topic keys; the reserved finalize control topic never appears.
/// - Values are Unicode NFC normalized, so the snapshot is exactly the text
///   the digest was computed over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermsSnapshot(BTreeMap<String, String>);

impl TermsSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Records one agreed term.
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the agreed value for a topic key, when present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the terms in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no terms were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// SECTION: Geolocation
// ============================================================================

/// Geographic fix captured at signing time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    /// Latitude in decimal degrees, range -90 to 90.
    pub latitude: f64,
    /// Longitude in decimal degrees, range -180 to 180.
    pub longitude: f64,
}

impl Geolocation {
    /// Returns true when both coordinates are within their valid ranges.
    #[must_use]
    pub fn in_range(&self) -> bool {
        (-90.0 ..= 90.0).contains(&self.latitude) && (-180.0 ..= 180.0).contains(&self.longitude)
    }
}

// ============================================================================
// SECTION: Signatures
// ============================================================================

/// One party's recorded intent to sign, bound to the record digest.
///
/// # Invariants
/// - Written exactly once per party and never modified afterwards.
/// - `geolocation` is best effort; `None` records that no fix was available
///   within the signing bound, which is a valid outcome, not a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    /// Signing party role.
    pub party: Party,
    /// Full name typed by the signer.
    pub typed_name: String,
    /// Timestamp captured when the signing intent was received.
    pub signed_at: Timestamp,
    /// User agent string of the signing device.
    pub user_agent: String,
    /// Geographic fix, when one arrived within the signing bound.
    pub geolocation: Option<Geolocation>,
}

// ============================================================================
// SECTION: Agreement Record
// ============================================================================

/// Tamper-evident record of a finalized negotiation.
///
/// # Invariants
/// - `terms` and `digest` are fixed at creation and never change.
/// - `digest` is `None` only in degraded mode, mirrored by `audit_grade`.
/// - Signature slots are write-once; both present means the record is sealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementRecord {
    /// Session this record finalizes.
    pub session_id: SessionId,
    /// Agreed terms, NFC normalized, finalize control topic excluded.
    pub terms: TermsSnapshot,
    /// Canonical content digest of the terms, absent in degraded mode.
    pub digest: Option<HashDigest>,
    /// True when the digest was computed; false marks a degraded record.
    pub audit_grade: bool,
    /// Timestamp when the record was created.
    pub created_at: Timestamp,
    /// Provider signature slot.
    pub provider_signature: Option<Signature>,
    /// Client signature slot.
    pub client_signature: Option<Signature>,
}

impl AgreementRecord {
    /// Returns true when both parties have signed.
    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.provider_signature.is_some() && self.client_signature.is_some()
    }

    /// Returns the signature recorded for a party, when present.
    #[must_use]
    pub const fn signature(&self, party: Party) -> Option<&Signature> {
        match party {
            Party::Provider => self.provider_signature.as_ref(),
            Party::Client => self.client_signature.as_ref(),
        }
    }

    /// Returns true when the party has already signed.
    #[must_use]
    pub const fn has_signed(&self, party: Party) -> bool {
        self.signature(party).is_some()
    }

    /// Attaches a signature to its party slot, write-once.
    ///
    /// Sealing is checked before the slot so a fully signed record reports
    /// `RecordSealed` rather than `AlreadySigned`.
    pub(crate) fn attach_signature(
        &mut self,
        signature: Signature,
    ) -> Result<(), PreconditionError> {
        if self.is_sealed() {
            return Err(PreconditionError::RecordSealed);
        }
        if self.has_signed(signature.party) {
            return Err(PreconditionError::AlreadySigned {
                party: signature.party,
            });
        }
        match signature.party {
            Party::Provider => self.provider_signature = Some(signature),
            Party::Client => self.client_signature = Some(signature),
        }
        Ok(())
    }
}
