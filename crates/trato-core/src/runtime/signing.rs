// trato-core/src/runtime/signing.rs
// ============================================================================
// Module: Trato Signature Collector
// Description: Per-party signing intent capture with bounded geolocation.
// Purpose: Attach write-once signatures to agreement records without unbounded waits.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The signature collector gathers one party's signing intent against a fixed
//! agreement record. Name validation and write-once preconditions run before
//! anything else; the timestamp and user agent are captured synchronously;
//! only then does the collector wait, bounded, for a geolocation fix. A fix
//! that never arrives is recorded as absent, not as a failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

use crate::core::agreement::AgreementRecord;
use crate::core::agreement::Signature;
use crate::core::errors::PreconditionError;
use crate::core::errors::ValidationError;
use crate::core::party::Party;
use crate::interfaces::Clock;
use crate::interfaces::LocationSource;

// ============================================================================
// SECTION: Signing Configuration
// ============================================================================

/// Minimum number of characters for a typed signature name, after trimming.
pub const MIN_TYPED_NAME_CHARS: usize = 2;

/// Default bound on geolocation acquisition during signing.
pub const DEFAULT_FIX_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the signature collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningConfig {
    /// Maximum time to wait for a geolocation fix before recording none.
    pub fix_timeout: Duration,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            fix_timeout: DEFAULT_FIX_TIMEOUT,
        }
    }
}

// ============================================================================
// SECTION: Signature Request
// ============================================================================

/// One party's signing intent as received from the host boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRequest {
    /// Party signing the record.
    pub party: Party,
    /// Full name as typed by the signer.
    pub typed_name: String,
    /// User agent string of the signing device.
    pub user_agent: String,
}

// ============================================================================
// SECTION: Signature Collector
// ============================================================================

/// Collects write-once signatures with bounded geolocation acquisition.
pub struct SignatureCollector<C: Clock, L: LocationSource> {
    /// Host time source for signing timestamps.
    clock: C,
    /// Host geolocation capability.
    location: L,
    /// Collector configuration.
    config: SigningConfig,
}

impl<C: Clock, L: LocationSource> SignatureCollector<C, L> {
    /// Creates a collector over host clock and location capabilities.
    #[must_use]
    pub const fn new(clock: C, location: L, config: SigningConfig) -> Self {
        Self {
            clock,
            location,
            config,
        }
    }

    /// Records a party's signature on the agreement record.
    ///
    /// Preconditions are checked before any waiting: the typed name must meet
    /// the minimum length, the record must not be sealed, and the party must
    /// not have signed already. The timestamp and user agent are captured
    /// synchronously, then the geolocation fix is awaited up to the
    /// configured bound. Timeout and denial record an absent fix; the losing
    /// acquisition is cancelled so a late callback changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::Validation`] for a too-short typed name and
    /// [`SignError::Precondition`] for double-signing or a sealed record.
    pub fn sign(
        &self,
        record: &mut AgreementRecord,
        request: &SignatureRequest,
    ) -> Result<Signature, SignError> {
        let typed_name = request.typed_name.trim();
        let length = typed_name.chars().count();
        if length < MIN_TYPED_NAME_CHARS {
            return Err(ValidationError::TypedNameTooShort {
                length,
                minimum: MIN_TYPED_NAME_CHARS,
            }
            .into());
        }
        if record.is_sealed() {
            return Err(PreconditionError::RecordSealed.into());
        }
        if record.has_signed(request.party) {
            return Err(PreconditionError::AlreadySigned {
                party: request.party,
            }
            .into());
        }

        let signed_at = self.clock.now();
        let geolocation = self.location.request_fix().resolve_within(self.config.fix_timeout);

        let signature = Signature {
            party: request.party,
            typed_name: typed_name.to_string(),
            signed_at,
            user_agent: request.user_agent.clone(),
            geolocation,
        };
        record.attach_signature(signature.clone())?;
        Ok(signature)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Signature collection errors.
#[derive(Debug, Error)]
pub enum SignError {
    /// A state precondition does not hold.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    /// Boundary input is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
