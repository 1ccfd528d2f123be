// trato-core/src/interfaces/mod.rs
// ============================================================================
// Module: Trato Interfaces
// Description: Backend-agnostic interfaces for time, digests, location, rendering, export, and storage.
// Purpose: Define the contract surfaces used by the Trato runtime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Trato integrates with host systems without embedding
//! backend-specific details. Implementations must be deterministic where the
//! contract says so and fail closed on missing or invalid data. Degraded
//! outcomes the negotiation tolerates (no geolocation fix, no digest backend)
//! are modeled as values, not errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::mpsc::Receiver;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use thiserror::Error;

use crate::core::agreement::AgreementRecord;
use crate::core::agreement::Geolocation;
use crate::core::dossier::ArtifactKind;
use crate::core::dossier::DossierManifest;
use crate::core::hashing::HashAlgorithm;
use crate::core::hashing::HashDigest;
use crate::core::identifiers::SessionId;
use crate::core::state::SessionState;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Host-supplied time source.
///
/// The runtime never reads wall-clock time directly; every timestamp on
/// messages, signatures, and records comes through this interface so replays
/// and tests stay deterministic.
pub trait Clock {
    /// Returns the current timestamp.
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

// ============================================================================
// SECTION: Digest Provider
// ============================================================================

/// Digest provider errors.
#[derive(Debug, Error)]
pub enum DigestError {
    /// The digest backend is unavailable.
    ///
    /// Callers building agreement records treat this as degraded mode and
    /// create the record without a digest rather than failing.
    #[error("digest backend unavailable: {0}")]
    Unavailable(String),
}

/// Deterministic content digest provider.
///
/// Implementations must return the same digest for the same bytes across
/// calls, processes, and re-implementations of the same algorithm.
pub trait DigestProvider {
    /// Returns the algorithm this provider computes.
    fn algorithm(&self) -> HashAlgorithm;

    /// Computes the digest of the given bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Unavailable`] when the backend cannot serve
    /// the request.
    fn digest(&self, bytes: &[u8]) -> Result<HashDigest, DigestError>;
}

// ============================================================================
// SECTION: Location Source
// ============================================================================

/// Outcome delivered by a location source for one fix request.
#[derive(Debug, Clone, PartialEq)]
pub enum FixOutcome {
    /// A geographic fix was obtained.
    Fix(Geolocation),
    /// The platform or user denied the request.
    Denied(String),
}

/// In-flight geolocation acquisition with an explicit cancellation hook.
///
/// # Invariants
/// - The fix is delivered at most once through the channel.
/// - Cancellation runs exactly once, on resolution or drop, whichever comes
///   first, so a late callback can never reach a resolved signature.
pub struct PendingFix {
    /// Channel the source delivers the outcome on.
    receiver: Receiver<FixOutcome>,
    /// Cancellation hook invoked once when the request is finished with.
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl PendingFix {
    /// Creates a pending fix with no cancellation hook.
    #[must_use]
    pub fn new(receiver: Receiver<FixOutcome>) -> Self {
        Self {
            receiver,
            cancel: None,
        }
    }

    /// Creates a pending fix with a cancellation hook.
    #[must_use]
    pub fn with_cancel(receiver: Receiver<FixOutcome>, cancel: Box<dyn FnOnce() + Send>) -> Self {
        Self {
            receiver,
            cancel: Some(cancel),
        }
    }

    /// Waits up to `bound` for the fix and maps every non-fix outcome to `None`.
    ///
    /// Timeout, denial, and a disconnected source all resolve to `None`;
    /// none of them is an error. The request is cancelled before returning.
    #[must_use]
    pub fn resolve_within(mut self, bound: Duration) -> Option<Geolocation> {
        let outcome = match self.receiver.recv_timeout(bound) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        };
        self.run_cancel();
        match outcome {
            Some(FixOutcome::Fix(fix)) => Some(fix),
            Some(FixOutcome::Denied(_)) | None => None,
        }
    }

    /// Runs the cancellation hook at most once.
    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for PendingFix {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

/// Host geolocation capability.
///
/// Sources never bound their own waiting time; the signing runtime races the
/// returned [`PendingFix`] against its configured bound.
pub trait LocationSource {
    /// Starts one fix acquisition.
    fn request_fix(&self) -> PendingFix;
}

// ============================================================================
// SECTION: Document Renderer
// ============================================================================

/// Rendered agreement document bytes with their content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// MIME content type of the rendered bytes.
    pub content_type: String,
    /// Rendered document bytes. Opaque to the engine.
    pub bytes: Vec<u8>,
}

/// Document rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Renderer reported an error.
    #[error("document rendering failed: {0}")]
    RenderFailed(String),
}

/// Renders a sealed agreement into a presentable document.
///
/// Rendering failures never invalidate the sealed record; callers may retry
/// or export the dossier without a document.
pub trait DocumentRenderer {
    /// Renders the agreement record against its session state.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when rendering fails.
    fn render(
        &self,
        record: &AgreementRecord,
        state: &SessionState,
    ) -> Result<RenderedDocument, RenderError>;
}

// ============================================================================
// SECTION: Export Sink / Reader
// ============================================================================

/// Artifact payload written into dossiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Artifact kind.
    pub kind: ArtifactKind,
    /// Dossier-relative path.
    pub path: String,
    /// Content type for the artifact.
    pub content_type: Option<String>,
    /// Artifact bytes.
    pub bytes: Vec<u8>,
    /// Indicates whether the artifact is required for verification.
    pub required: bool,
}

/// Artifact reference returned by sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRef {
    /// Dossier-relative path or external URI.
    pub uri: String,
}

/// Export sink and reader errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Export sink reported an error.
    #[error("export error: {0}")]
    Sink(String),
}

/// Artifact sink for dossier generation.
pub trait ExportSink {
    /// Writes an artifact into the dossier.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] when writing fails.
    fn write(&mut self, artifact: &ExportArtifact) -> Result<ExportRef, ExportError>;

    /// Finalizes the dossier manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] when writing the manifest fails.
    fn finalize(&mut self, manifest: &DossierManifest) -> Result<ExportRef, ExportError>;
}

/// Artifact reader for dossier verification.
pub trait ExportReader {
    /// Reads artifact bytes from a dossier.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] when reading fails.
    fn read(&self, path: &str) -> Result<Vec<u8>, ExportError>;
}

// ============================================================================
// SECTION: Stores
// ============================================================================

/// Session and agreement store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("store error: {0}")]
    Store(String),
}

/// Session state store for persistence.
///
/// Sessions serialize to plain structures; any keyed document store can back
/// this interface.
pub trait SessionStore {
    /// Loads session state by session identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load(&self, session_id: &SessionId) -> Result<Option<SessionState>, StoreError>;

    /// Saves session state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when saving fails.
    fn save(&self, state: &SessionState) -> Result<(), StoreError>;
}

/// Agreement record store for persistence.
pub trait AgreementStore {
    /// Loads an agreement record by session identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load(&self, session_id: &SessionId) -> Result<Option<AgreementRecord>, StoreError>;

    /// Saves an agreement record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when saving fails.
    fn save(&self, record: &AgreementRecord) -> Result<(), StoreError>;
}
