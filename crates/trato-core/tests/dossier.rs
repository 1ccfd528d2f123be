// trato-core/tests/dossier.rs
// ============================================================================
// Module: Dossier Tests
// Description: Tests for dossier generation and offline verification.
// ============================================================================
//! ## Overview
//! Validates deterministic dossier exports and fail-closed verifier behavior
//! against tampered or incomplete artifact stores.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::mpsc;

use trato_core::AgreementBuilder;
use trato_core::AgreementRecord;
use trato_core::DigestError;
use trato_core::DigestProvider;
use trato_core::DossierBuilder;
use trato_core::DossierError;
use trato_core::DossierManifest;
use trato_core::DossierVerifier;
use trato_core::ExportArtifact;
use trato_core::ExportError;
use trato_core::ExportReader;
use trato_core::ExportRef;
use trato_core::ExportSink;
use trato_core::FixOutcome;
use trato_core::LocationSource;
use trato_core::LogicalClock;
use trato_core::NegotiationSession;
use trato_core::Party;
use trato_core::PartyId;
use trato_core::PendingFix;
use trato_core::RenderedDocument;
use trato_core::SessionId;
use trato_core::SessionSpec;
use trato_core::SessionState;
use trato_core::SignatureCollector;
use trato_core::SignatureRequest;
use trato_core::SigningConfig;
use trato_core::Timestamp;
use trato_core::TopicKey;
use trato_core::TopicSpec;
use trato_core::VerificationStatus;
use trato_core::hashing::DEFAULT_HASH_ALGORITHM;
use trato_core::hashing::HashAlgorithm;
use trato_core::hashing::HashDigest;
use trato_core::hashing::hash_bytes;
use trato_core::hashing::hash_canonical_json;

// ============================================================================
// SECTION: In-Memory Dossier Store
// ============================================================================

#[derive(Default, Clone)]
struct InMemoryDossierStore {
    files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl ExportSink for InMemoryDossierStore {
    fn write(&mut self, artifact: &ExportArtifact) -> Result<ExportRef, ExportError> {
        {
            let mut guard = self
                .files
                .lock()
                .map_err(|_| ExportError::Sink("dossier store mutex poisoned".to_string()))?;
            guard.insert(artifact.path.clone(), artifact.bytes.clone());
        }
        Ok(ExportRef {
            uri: artifact.path.clone(),
        })
    }

    fn finalize(&mut self, manifest: &DossierManifest) -> Result<ExportRef, ExportError> {
        let bytes = serde_jcs::to_vec(manifest).map_err(|err| ExportError::Sink(err.to_string()))?;
        {
            let mut guard = self
                .files
                .lock()
                .map_err(|_| ExportError::Sink("dossier store mutex poisoned".to_string()))?;
            guard.insert("manifest.json".to_string(), bytes);
        }
        Ok(ExportRef {
            uri: "manifest.json".to_string(),
        })
    }
}

impl ExportReader for InMemoryDossierStore {
    fn read(&self, path: &str) -> Result<Vec<u8>, ExportError> {
        let guard = self
            .files
            .lock()
            .map_err(|_| ExportError::Sink("dossier store mutex poisoned".to_string()))?;
        guard.get(path).cloned().ok_or_else(|| ExportError::Sink("missing artifact".to_string()))
    }
}

impl InMemoryDossierStore {
    fn insert_bytes(&self, path: &str, bytes: Vec<u8>) {
        let mut guard = self.files.lock().expect("dossier store mutex poisoned");
        guard.insert(path.to_string(), bytes);
    }

    fn remove(&self, path: &str) {
        let mut guard = self.files.lock().expect("dossier store mutex poisoned");
        guard.remove(path);
    }
}

// ============================================================================
// SECTION: Test Doubles
// ============================================================================

/// Location source that delivers one fix immediately.
struct InstantSource;

impl LocationSource for InstantSource {
    fn request_fix(&self) -> PendingFix {
        let (sender, receiver) = mpsc::channel();
        sender
            .send(FixOutcome::Fix(trato_core::Geolocation {
                latitude: -23.55,
                longitude: -46.63,
            }))
            .expect("send fix");
        PendingFix::new(receiver)
    }
}

/// Digest provider that is permanently unavailable.
struct FailingDigestProvider;

impl DigestProvider for FailingDigestProvider {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha256
    }

    fn digest(&self, _bytes: &[u8]) -> Result<HashDigest, DigestError> {
        Err(DigestError::Unavailable("backend offline".to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn sample_spec() -> SessionSpec {
    SessionSpec {
        session_id: SessionId::new("neg-1"),
        provider: PartyId::new("prov-1"),
        client: PartyId::new("cli-1"),
        topics: vec![
            TopicSpec {
                key: TopicKey::new("price"),
                label: "Preço".to_string(),
                description: String::new(),
                initial_value: Some("1500".to_string()),
            },
            TopicSpec {
                key: TopicKey::new("finalize"),
                label: "Formalização".to_string(),
                description: String::new(),
                initial_value: None,
            },
        ],
    }
}

/// Runs a full negotiation and returns the state with an unsigned record.
fn finalized_session<D: DigestProvider>(
    builder: &AgreementBuilder<D>,
) -> (SessionState, AgreementRecord) {
    let mut session = NegotiationSession::open(&sample_spec(), LogicalClock::new()).expect("open");
    session.accept(&TopicKey::new("price"), Party::Client).expect("accept");
    let record = session.finalize(builder).expect("finalize");
    (session.into_state(), record)
}

/// Attaches both signatures to the record.
fn seal(record: &mut AgreementRecord) {
    let collector =
        SignatureCollector::new(LogicalClock::new(), InstantSource, SigningConfig::default());
    let provider = SignatureRequest {
        party: Party::Provider,
        typed_name: "Ana Prestadora".to_string(),
        user_agent: "trato-tests/1.0".to_string(),
    };
    let client = SignatureRequest {
        party: Party::Client,
        typed_name: "Bruno Cliente".to_string(),
        user_agent: "trato-tests/1.0".to_string(),
    };
    collector.sign(record, &provider).expect("provider sign");
    collector.sign(record, &client).expect("client sign");
}

fn sealed_dossier_inputs() -> (SessionState, AgreementRecord) {
    let (state, mut record) = finalized_session(&AgreementBuilder::default());
    seal(&mut record);
    (state, record)
}

// ============================================================================
// SECTION: Build and Verify
// ============================================================================

/// Tests dossier build and verify over a sealed agreement.
#[test]
fn test_dossier_build_and_verify_pass() {
    let (state, record) = sealed_dossier_inputs();
    let mut store = InMemoryDossierStore::default();
    let builder = DossierBuilder::default();

    let manifest =
        builder.build(&mut store, &state, &record, Timestamp::Logical(50)).expect("build");

    assert_eq!(manifest.session_id, SessionId::new("neg-1"));
    assert!(manifest.audit_grade);
    assert_eq!(manifest.terms_digest, record.digest);
    assert_eq!(manifest.artifacts.len(), 4);

    let verifier = DossierVerifier::new(DEFAULT_HASH_ALGORITHM);
    let report = verifier.verify_manifest(&store, &manifest).expect("verify");

    assert_eq!(report.status, VerificationStatus::Pass);
    assert_eq!(report.checked_files, 4);
    assert!(report.errors.is_empty());
    assert!(report.notes.is_empty());
}

/// Tests that an unsealed record cannot be exported.
#[test]
fn test_dossier_rejects_unsealed_record() {
    let (state, record) = finalized_session(&AgreementBuilder::default());
    let mut store = InMemoryDossierStore::default();
    let builder = DossierBuilder::default();

    let result = builder.build(&mut store, &state, &record, Timestamp::Logical(50));

    assert!(matches!(result, Err(DossierError::RecordNotSealed)));
}

/// Tests that record and state must belong to the same session.
#[test]
fn test_dossier_rejects_session_mismatch() {
    let (state, mut record) = sealed_dossier_inputs();
    record.session_id = SessionId::new("neg-2");
    let mut store = InMemoryDossierStore::default();
    let builder = DossierBuilder::default();

    let result = builder.build(&mut store, &state, &record, Timestamp::Logical(50));

    assert!(matches!(result, Err(DossierError::SessionMismatch(_))));
}

// ============================================================================
// SECTION: Tamper Detection
// ============================================================================

/// Tests verifier rejection of a tampered artifact.
#[test]
fn test_verifier_detects_tampered_artifact() {
    let (state, record) = sealed_dossier_inputs();
    let mut store = InMemoryDossierStore::default();
    let builder = DossierBuilder::default();
    let manifest =
        builder.build(&mut store, &state, &record, Timestamp::Logical(50)).expect("build");

    store.insert_bytes("artifacts/terms.json", br#"{"price":"9999"}"#.to_vec());

    let verifier = DossierVerifier::new(DEFAULT_HASH_ALGORITHM);
    let report = verifier.verify_manifest(&store, &manifest).expect("verify");

    assert_eq!(report.status, VerificationStatus::Fail);
    assert!(report.errors.iter().any(|err| err.contains("hash mismatch")));
}

/// Tests verifier rejection of a missing artifact.
#[test]
fn test_verifier_detects_missing_artifact() {
    let (state, record) = sealed_dossier_inputs();
    let mut store = InMemoryDossierStore::default();
    let builder = DossierBuilder::default();
    let manifest =
        builder.build(&mut store, &state, &record, Timestamp::Logical(50)).expect("build");

    store.remove("artifacts/messages.json");

    let verifier = DossierVerifier::new(DEFAULT_HASH_ALGORITHM);
    let report = verifier.verify_manifest(&store, &manifest).expect("verify");

    assert_eq!(report.status, VerificationStatus::Fail);
    assert!(report.errors.iter().any(|err| err.contains("missing artifact")));
}

/// Tests verifier rejection of a corrupted integrity root hash.
#[test]
fn test_verifier_detects_root_hash_mismatch() {
    let (state, record) = sealed_dossier_inputs();
    let mut store = InMemoryDossierStore::default();
    let builder = DossierBuilder::default();
    let mut manifest =
        builder.build(&mut store, &state, &record, Timestamp::Logical(50)).expect("build");

    manifest.integrity.root_hash = hash_bytes(DEFAULT_HASH_ALGORITHM, b"forged root");

    let verifier = DossierVerifier::new(DEFAULT_HASH_ALGORITHM);
    let report = verifier.verify_manifest(&store, &manifest).expect("verify");

    assert_eq!(report.status, VerificationStatus::Fail);
    assert!(report.errors.iter().any(|err| err.contains("root hash mismatch")));
}

/// Tests verifier rejection when the manifest digest disagrees with the record.
#[test]
fn test_verifier_detects_manifest_digest_mismatch() {
    let (state, record) = sealed_dossier_inputs();
    let mut store = InMemoryDossierStore::default();
    let builder = DossierBuilder::default();
    let mut manifest =
        builder.build(&mut store, &state, &record, Timestamp::Logical(50)).expect("build");

    manifest.terms_digest = Some(hash_bytes(DEFAULT_HASH_ALGORITHM, b"other terms"));

    let verifier = DossierVerifier::new(DEFAULT_HASH_ALGORITHM);
    let report = verifier.verify_manifest(&store, &manifest).expect("verify");

    assert_eq!(report.status, VerificationStatus::Fail);
    assert!(report.errors.iter().any(|err| err.contains("terms digest")));
}

/// Tests that rewritten terms fail digest recompute even with consistent hashes.
#[test]
fn test_verifier_detects_rewritten_terms_despite_consistent_hashes() {
    let (state, record) = sealed_dossier_inputs();
    let mut store = InMemoryDossierStore::default();
    let builder = DossierBuilder::default();
    let mut manifest =
        builder.build(&mut store, &state, &record, Timestamp::Logical(50)).expect("build");

    let agreement_bytes = store.read("artifacts/agreement.json").expect("agreement bytes");
    let mut agreement: serde_json::Value =
        serde_json::from_slice(&agreement_bytes).expect("agreement json");
    agreement["terms"]["price"] = serde_json::Value::String("9999".to_string());
    let forged_agreement = serde_jcs::to_vec(&agreement).expect("canonical agreement");
    let forged_terms = serde_jcs::to_vec(&agreement["terms"]).expect("canonical terms");
    store.insert_bytes("artifacts/agreement.json", forged_agreement.clone());
    store.insert_bytes("artifacts/terms.json", forged_terms.clone());
    for entry in &mut manifest.integrity.file_hashes {
        if entry.path == "artifacts/agreement.json" {
            entry.hash = hash_bytes(DEFAULT_HASH_ALGORITHM, &forged_agreement);
        } else if entry.path == "artifacts/terms.json" {
            entry.hash = hash_bytes(DEFAULT_HASH_ALGORITHM, &forged_terms);
        }
    }
    manifest.integrity.root_hash =
        hash_canonical_json(DEFAULT_HASH_ALGORITHM, &manifest.integrity.file_hashes)
            .expect("root hash");

    let verifier = DossierVerifier::new(DEFAULT_HASH_ALGORITHM);
    let report = verifier.verify_manifest(&store, &manifest).expect("verify");

    assert_eq!(report.status, VerificationStatus::Fail);
    assert!(report.errors.iter().any(|err| err.contains("recompute")));
}

// ============================================================================
// SECTION: Degraded Records
// ============================================================================

/// Tests that a degraded record verifies with a note instead of a digest check.
#[test]
fn test_degraded_record_verifies_with_note() {
    let (state, mut record) = finalized_session(&AgreementBuilder::new(FailingDigestProvider));
    assert!(record.digest.is_none());
    seal(&mut record);

    let mut store = InMemoryDossierStore::default();
    let builder = DossierBuilder::default();
    let manifest =
        builder.build(&mut store, &state, &record, Timestamp::Logical(50)).expect("build");

    assert!(!manifest.audit_grade);
    assert!(manifest.terms_digest.is_none());

    let verifier = DossierVerifier::new(DEFAULT_HASH_ALGORITHM);
    let report = verifier.verify_manifest(&store, &manifest).expect("verify");

    assert_eq!(report.status, VerificationStatus::Pass);
    assert!(report.notes.iter().any(|note| note.contains("not audit grade")));
}

// ============================================================================
// SECTION: Documents and Embedded Reports
// ============================================================================

/// Tests document inclusion as an optional artifact.
#[test]
fn test_build_with_document_adds_document_artifact() {
    let (state, record) = sealed_dossier_inputs();
    let mut store = InMemoryDossierStore::default();
    let builder = DossierBuilder::default();
    let document = RenderedDocument {
        content_type: "text/plain; charset=utf-8".to_string(),
        bytes: b"CONTRATO DE SERVICO".to_vec(),
    };

    let manifest = builder
        .build_with_document(&mut store, &state, &record, &document, Timestamp::Logical(50))
        .expect("build");

    assert_eq!(manifest.artifacts.len(), 5);
    let entry = manifest
        .artifacts
        .iter()
        .find(|artifact| artifact.path == "artifacts/document")
        .expect("document artifact");
    assert!(!entry.required);
    assert_eq!(entry.content_type.as_deref(), Some("text/plain; charset=utf-8"));

    let verifier = DossierVerifier::new(DEFAULT_HASH_ALGORITHM);
    let report = verifier.verify_manifest(&store, &manifest).expect("verify");
    assert_eq!(report.status, VerificationStatus::Pass);
}

/// Tests that the embedded verification report keeps the manifest verifiable.
#[test]
fn test_build_with_verification_embeds_passing_report() {
    let (state, record) = sealed_dossier_inputs();
    let mut store = InMemoryDossierStore::default();
    let reader = store.clone();
    let builder = DossierBuilder::default();

    let (manifest, report) = builder
        .build_with_verification(&mut store, &reader, &state, &record, Timestamp::Logical(50))
        .expect("build");

    assert_eq!(report.status, VerificationStatus::Pass);
    assert!(
        manifest.artifacts.iter().any(|artifact| artifact.path == "artifacts/verifier_report.json")
    );

    let verifier = DossierVerifier::new(DEFAULT_HASH_ALGORITHM);
    let second = verifier.verify_manifest(&store, &manifest).expect("verify");
    assert_eq!(second.status, VerificationStatus::Pass);
}

// ============================================================================
// SECTION: Determinism
// ============================================================================

/// Tests that identical inputs produce identical manifests.
#[test]
fn test_dossier_build_is_deterministic() {
    let (state, record) = sealed_dossier_inputs();
    let builder = DossierBuilder::default();

    let mut store_a = InMemoryDossierStore::default();
    let manifest_a =
        builder.build(&mut store_a, &state, &record, Timestamp::Logical(50)).expect("build");

    let mut store_b = InMemoryDossierStore::default();
    let manifest_b =
        builder.build(&mut store_b, &state, &record, Timestamp::Logical(50)).expect("build");

    assert_eq!(manifest_a, manifest_b);
    let bytes_a = serde_jcs::to_vec(&manifest_a).expect("manifest bytes");
    let bytes_b = serde_jcs::to_vec(&manifest_b).expect("manifest bytes");
    assert_eq!(bytes_a, bytes_b);
}
