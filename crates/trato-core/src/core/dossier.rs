// trato-core/src/core/dossier.rs
// ============================================================================
// Module: Trato Dossier Manifest
// Description: Dossier manifest schemas and integrity metadata.
// Purpose: Provide canonical dossier indices for offline agreement verification.
// Dependencies: crate::core::{hashing, identifiers, time}, serde
// ============================================================================

//! ## Overview
//! A dossier is the exported bundle for one sealed agreement: the terms, the
//! agreement record, the topic ledger, the message timeline, and optionally a
//! rendered document. Its manifest indexes every artifact with a
//! deterministic hash so verification needs nothing but the bundle itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::hashing::HashAlgorithm;
use crate::core::hashing::HashDigest;
use crate::core::identifiers::SessionId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Manifest Types
// ============================================================================

/// Dossier manifest version.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DossierVersion(pub String);

/// Dossier manifest describing the artifacts of one sealed agreement.
///
/// # Invariants
/// - `terms_digest` mirrors the digest recorded on the agreement record and
///   is absent exactly when the record is not audit grade.
/// - `artifacts` and `integrity.file_hashes` refer to dossier-relative paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DossierManifest {
    /// Manifest version identifier.
    pub manifest_version: DossierVersion,
    /// Timestamp when the dossier was generated.
    pub generated_at: Timestamp,
    /// Session the dossier belongs to.
    pub session_id: SessionId,
    /// Digest of the agreed terms, absent for degraded records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_digest: Option<HashDigest>,
    /// Whether the underlying record carries an audit-grade digest.
    pub audit_grade: bool,
    /// Hash algorithm used for dossier artifacts.
    pub hash_algorithm: HashAlgorithm,
    /// Integrity metadata for the dossier.
    pub integrity: DossierIntegrity,
    /// Artifact index entries.
    pub artifacts: Vec<ArtifactRecord>,
}

/// Dossier integrity metadata.
///
/// # Invariants
/// - `root_hash` is computed over the ordered `file_hashes` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DossierIntegrity {
    /// File hash entries for dossier artifacts.
    pub file_hashes: Vec<FileHashEntry>,
    /// Root hash computed over the file hash list.
    pub root_hash: HashDigest,
}

/// Hash entry for a file within the dossier.
///
/// # Invariants
/// - `path` is dossier-relative and stable for verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHashEntry {
    /// Dossier-relative path.
    pub path: String,
    /// Hash digest of the file contents.
    pub hash: HashDigest,
}

/// Artifact record indexed by the dossier manifest.
///
/// # Invariants
/// - `hash` matches the artifact bytes at `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Artifact identifier.
    pub artifact_id: String,
    /// Artifact kind.
    pub kind: ArtifactKind,
    /// Dossier-relative path to the artifact.
    pub path: String,
    /// Content type for the artifact when applicable.
    pub content_type: Option<String>,
    /// Hash digest for the artifact content.
    pub hash: HashDigest,
    /// Indicates whether the artifact is required for verification.
    pub required: bool,
}

/// Artifact kinds included in agreement dossiers.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Agreed terms snapshot artifact.
    Terms,
    /// Agreement record artifact.
    AgreementRecord,
    /// Topic ledger artifact.
    TopicLog,
    /// Message timeline artifact.
    MessageLog,
    /// Rendered agreement document.
    Document,
    /// Custom artifact record.
    Custom,
}
