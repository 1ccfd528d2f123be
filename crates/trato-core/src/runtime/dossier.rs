// trato-core/src/runtime/dossier.rs
// ============================================================================
// Module: Trato Dossier Builder and Verifier
// Description: Deterministic dossier generation and offline verification.
// Purpose: Export and validate sealed agreements with canonical hashing.
// Dependencies: crate::{core, interfaces}, serde, serde_jcs, serde_json
// ============================================================================

//! ## Overview
//! Dossier generation exports a sealed agreement into a deterministic
//! artifact bundle: terms, agreement record, topic ledger, message timeline,
//! and optionally a rendered document. The verifier replays integrity checks
//! offline and fails closed on missing or tampered artifacts. Export never
//! mutates the agreement, so a failed or repeated export is always safe.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::agreement::AgreementRecord;
use crate::core::agreement::TermsSnapshot;
use crate::core::dossier::ArtifactKind;
use crate::core::dossier::ArtifactRecord;
use crate::core::dossier::DossierIntegrity;
use crate::core::dossier::DossierManifest;
use crate::core::dossier::DossierVersion;
use crate::core::dossier::FileHashEntry;
use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::HashAlgorithm;
use crate::core::hashing::hash_bytes;
use crate::core::hashing::hash_canonical_json;
use crate::core::state::SessionState;
use crate::core::time::Timestamp;
use crate::interfaces::ExportArtifact;
use crate::interfaces::ExportError;
use crate::interfaces::ExportReader;
use crate::interfaces::ExportSink;
use crate::interfaces::RenderedDocument;
use crate::runtime::agreement::AgreementBuilder;
use crate::runtime::agreement::Sha256DigestProvider;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Dossier path for the agreed terms artifact.
const TERMS_PATH: &str = "artifacts/terms.json";
/// Dossier path for the agreement record artifact.
const AGREEMENT_PATH: &str = "artifacts/agreement.json";
/// Dossier path for the topic ledger artifact.
const TOPIC_LOG_PATH: &str = "artifacts/topics.json";
/// Dossier path for the message timeline artifact.
const MESSAGE_LOG_PATH: &str = "artifacts/messages.json";
/// Dossier path for the rendered agreement document.
const DOCUMENT_PATH: &str = "artifacts/document";
/// Dossier path for verifier reports.
const VERIFIER_REPORT_PATH: &str = "artifacts/verifier_report.json";

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Dossier builder for deterministic sealed-agreement exports.
#[derive(Debug, Clone)]
pub struct DossierBuilder {
    /// Manifest version identifier.
    pub manifest_version: DossierVersion,
    /// Hash algorithm used for dossier artifacts.
    pub hash_algorithm: HashAlgorithm,
}

impl Default for DossierBuilder {
    fn default() -> Self {
        Self {
            manifest_version: DossierVersion("v1".to_string()),
            hash_algorithm: DEFAULT_HASH_ALGORITHM,
        }
    }
}

impl DossierBuilder {
    /// Builds a dossier and writes artifacts to the provided sink.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::RecordNotSealed`] for an unsealed record,
    /// [`DossierError::SessionMismatch`] when record and state disagree, and
    /// other [`DossierError`] variants when writing fails.
    pub fn build<S: ExportSink>(
        &self,
        sink: &mut S,
        state: &SessionState,
        record: &AgreementRecord,
        generated_at: Timestamp,
    ) -> Result<DossierManifest, DossierError> {
        self.build_inner(sink, state, record, None, generated_at)
    }

    /// Builds a dossier that additionally carries a rendered document.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError`] when dossier generation fails.
    pub fn build_with_document<S: ExportSink>(
        &self,
        sink: &mut S,
        state: &SessionState,
        record: &AgreementRecord,
        document: &RenderedDocument,
        generated_at: Timestamp,
    ) -> Result<DossierManifest, DossierError> {
        self.build_inner(sink, state, record, Some(document), generated_at)
    }

    /// Builds a dossier and includes an offline verification report.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError`] when dossier generation or verification fails.
    pub fn build_with_verification<S: ExportSink, R: ExportReader>(
        &self,
        sink: &mut S,
        reader: &R,
        state: &SessionState,
        record: &AgreementRecord,
        generated_at: Timestamp,
    ) -> Result<(DossierManifest, VerificationReport), DossierError> {
        let mut manifest = self.build(sink, state, record, generated_at)?;
        let verifier = DossierVerifier::new(self.hash_algorithm);
        let report = verifier.verify_manifest(reader, &manifest)?;

        let report_bytes = serde_jcs::to_vec(&report)
            .map_err(|err| DossierError::Serialization(err.to_string()))?;
        let report_hash = hash_bytes(self.hash_algorithm, &report_bytes);
        let artifact = ExportArtifact {
            kind: ArtifactKind::Custom,
            path: VERIFIER_REPORT_PATH.to_string(),
            content_type: Some("application/json".to_string()),
            bytes: report_bytes,
            required: true,
        };
        sink.write(&artifact)?;

        manifest.artifacts.push(ArtifactRecord {
            artifact_id: VERIFIER_REPORT_PATH.to_string(),
            kind: ArtifactKind::Custom,
            path: VERIFIER_REPORT_PATH.to_string(),
            content_type: Some("application/json".to_string()),
            hash: report_hash.clone(),
            required: true,
        });
        manifest.integrity.file_hashes.push(FileHashEntry {
            path: VERIFIER_REPORT_PATH.to_string(),
            hash: report_hash,
        });
        manifest.integrity = build_integrity(&manifest.integrity.file_hashes, self.hash_algorithm)?;
        sink.finalize(&manifest)?;

        Ok((manifest, report))
    }

    /// Shared dossier assembly for all build entry points.
    fn build_inner<S: ExportSink>(
        &self,
        sink: &mut S,
        state: &SessionState,
        record: &AgreementRecord,
        document: Option<&RenderedDocument>,
        generated_at: Timestamp,
    ) -> Result<DossierManifest, DossierError> {
        if !record.is_sealed() {
            return Err(DossierError::RecordNotSealed);
        }
        if state.session_id != record.session_id {
            return Err(DossierError::SessionMismatch(record.session_id.to_string()));
        }

        let mut artifacts = Vec::new();
        let mut file_hashes = Vec::new();

        write_json_artifact(
            sink,
            &record.terms,
            TERMS_PATH,
            ArtifactKind::Terms,
            &mut artifacts,
            &mut file_hashes,
            self.hash_algorithm,
        )?;
        write_json_artifact(
            sink,
            record,
            AGREEMENT_PATH,
            ArtifactKind::AgreementRecord,
            &mut artifacts,
            &mut file_hashes,
            self.hash_algorithm,
        )?;
        write_json_artifact(
            sink,
            &state.topics,
            TOPIC_LOG_PATH,
            ArtifactKind::TopicLog,
            &mut artifacts,
            &mut file_hashes,
            self.hash_algorithm,
        )?;
        write_json_artifact(
            sink,
            &state.messages,
            MESSAGE_LOG_PATH,
            ArtifactKind::MessageLog,
            &mut artifacts,
            &mut file_hashes,
            self.hash_algorithm,
        )?;

        if let Some(document) = document {
            let hash = hash_bytes(self.hash_algorithm, &document.bytes);
            let artifact = ExportArtifact {
                kind: ArtifactKind::Document,
                path: DOCUMENT_PATH.to_string(),
                content_type: Some(document.content_type.clone()),
                bytes: document.bytes.clone(),
                required: false,
            };
            sink.write(&artifact)?;
            artifacts.push(ArtifactRecord {
                artifact_id: DOCUMENT_PATH.to_string(),
                kind: ArtifactKind::Document,
                path: DOCUMENT_PATH.to_string(),
                content_type: Some(document.content_type.clone()),
                hash: hash.clone(),
                required: false,
            });
            file_hashes.push(FileHashEntry {
                path: DOCUMENT_PATH.to_string(),
                hash,
            });
        }

        let integrity = build_integrity(&file_hashes, self.hash_algorithm)?;

        let manifest = DossierManifest {
            manifest_version: self.manifest_version.clone(),
            generated_at,
            session_id: state.session_id.clone(),
            terms_digest: record.digest.clone(),
            audit_grade: record.audit_grade,
            hash_algorithm: self.hash_algorithm,
            integrity,
            artifacts,
        };

        sink.finalize(&manifest)?;
        Ok(manifest)
    }
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Dossier verifier for offline validation.
pub struct DossierVerifier {
    /// Hash algorithm used for verification.
    hash_algorithm: HashAlgorithm,
}

impl DossierVerifier {
    /// Creates a new verifier.
    #[must_use]
    pub const fn new(hash_algorithm: HashAlgorithm) -> Self {
        Self {
            hash_algorithm,
        }
    }

    /// Verifies a dossier manifest using the provided artifact reader.
    ///
    /// Checks per-file hashes, the root hash, and the agreement record
    /// itself: sealing, terms consistency, and the recomputed terms digest
    /// for audit-grade records. Degraded records verify with a note instead
    /// of a digest check.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError`] when verification cannot run at all; a
    /// completed run with findings returns a failing report instead.
    pub fn verify_manifest<R: ExportReader>(
        &self,
        reader: &R,
        manifest: &DossierManifest,
    ) -> Result<VerificationReport, DossierError> {
        let mut errors = Vec::new();
        let mut notes = Vec::new();
        let mut checked = 0usize;

        if manifest.hash_algorithm != self.hash_algorithm {
            errors.push("hash algorithm mismatch".to_string());
        }

        for entry in &manifest.integrity.file_hashes {
            match reader.read(&entry.path) {
                Ok(bytes) => {
                    let actual = hash_bytes(self.hash_algorithm, &bytes);
                    if actual != entry.hash {
                        errors.push(format!("hash mismatch for {}", entry.path));
                    }
                    checked = checked.saturating_add(1);
                }
                Err(_) => {
                    errors.push(format!("missing artifact {}", entry.path));
                }
            }
        }

        if let Ok(root_hash) =
            hash_canonical_json(self.hash_algorithm, &manifest.integrity.file_hashes)
        {
            if root_hash != manifest.integrity.root_hash {
                errors.push("root hash mismatch".to_string());
            }
        } else {
            errors.push("failed to compute root hash".to_string());
        }

        match verify_agreement(reader, manifest) {
            Ok(Some(note)) => notes.push(note),
            Ok(None) => {}
            Err(err) => errors.push(err),
        }

        let status =
            if errors.is_empty() { VerificationStatus::Pass } else { VerificationStatus::Fail };

        Ok(VerificationReport {
            status,
            checked_files: checked,
            errors,
            notes,
        })
    }
}

// ============================================================================
// SECTION: Verification Types
// ============================================================================

/// Verification status for dossier reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Verification succeeded.
    Pass,
    /// Verification failed.
    Fail,
}

/// Offline verification report for dossiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Verification status.
    pub status: VerificationStatus,
    /// Count of checked files.
    pub checked_files: usize,
    /// Error messages, if any.
    pub errors: Vec<String>,
    /// Informational notes that do not fail verification.
    pub notes: Vec<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Dossier generation or verification errors.
#[derive(Debug, Error)]
pub enum DossierError {
    /// Export sink or reader errors.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// Hashing errors.
    #[error("hashing error: {0}")]
    Hash(String),
    /// Serialization errors.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// The agreement record is missing a signature.
    #[error("agreement record is not sealed; dossier export requires both signatures")]
    RecordNotSealed,
    /// The agreement record belongs to a different session.
    #[error("dossier session mismatch: {0}")]
    SessionMismatch(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Writes a JSON artifact into the dossier and updates hashes.
fn write_json_artifact<S: ExportSink, T: Serialize>(
    sink: &mut S,
    value: &T,
    path: &str,
    kind: ArtifactKind,
    artifacts: &mut Vec<ArtifactRecord>,
    file_hashes: &mut Vec<FileHashEntry>,
    algorithm: HashAlgorithm,
) -> Result<(), DossierError> {
    let bytes =
        serde_jcs::to_vec(value).map_err(|err| DossierError::Serialization(err.to_string()))?;
    let hash = hash_bytes(algorithm, &bytes);
    let artifact = ExportArtifact {
        kind,
        path: path.to_string(),
        content_type: Some("application/json".to_string()),
        bytes,
        required: true,
    };
    sink.write(&artifact)?;

    artifacts.push(ArtifactRecord {
        artifact_id: path.to_string(),
        kind,
        path: path.to_string(),
        content_type: Some("application/json".to_string()),
        hash: hash.clone(),
        required: true,
    });
    file_hashes.push(FileHashEntry {
        path: path.to_string(),
        hash,
    });
    Ok(())
}

/// Builds integrity metadata from file hashes.
fn build_integrity(
    file_hashes: &[FileHashEntry],
    algorithm: HashAlgorithm,
) -> Result<DossierIntegrity, DossierError> {
    let root_hash = hash_canonical_json(algorithm, file_hashes)
        .map_err(|err| DossierError::Hash(err.to_string()))?;
    Ok(DossierIntegrity {
        file_hashes: file_hashes.to_vec(),
        root_hash,
    })
}

/// Verifies the bundled agreement record against the manifest and terms.
///
/// Returns an informational note for degraded records, or an error string
/// describing the first inconsistency found.
fn verify_agreement<R: ExportReader>(
    reader: &R,
    manifest: &DossierManifest,
) -> Result<Option<String>, String> {
    let bytes = reader.read(AGREEMENT_PATH).map_err(|_| "missing agreement record".to_string())?;
    let record: AgreementRecord =
        serde_json::from_slice(&bytes).map_err(|err| format!("invalid agreement record: {err}"))?;

    if !record.is_sealed() {
        return Err("agreement record is not sealed".to_string());
    }
    if record.session_id != manifest.session_id {
        return Err(format!("agreement record session mismatch: {}", record.session_id));
    }

    let terms_bytes = reader.read(TERMS_PATH).map_err(|_| "missing terms artifact".to_string())?;
    let terms: TermsSnapshot = serde_json::from_slice(&terms_bytes)
        .map_err(|err| format!("invalid terms artifact: {err}"))?;
    if terms != record.terms {
        return Err("terms artifact does not match agreement record".to_string());
    }

    match (&record.digest, &manifest.terms_digest) {
        (Some(recorded), Some(declared)) => {
            if recorded != declared {
                return Err("manifest terms digest does not match record".to_string());
            }
            let builder = AgreementBuilder::new(Sha256DigestProvider);
            let recomputed = builder
                .compute_digest(&record.session_id, &record.terms)
                .map_err(|err| format!("failed to recompute terms digest: {err}"))?;
            if &recomputed != recorded {
                return Err("terms digest mismatch on recompute".to_string());
            }
            Ok(None)
        }
        (None, None) => {
            Ok(Some("agreement record is not audit grade; terms digest not verified".to_string()))
        }
        _ => Err("record and manifest disagree on digest presence".to_string()),
    }
}
