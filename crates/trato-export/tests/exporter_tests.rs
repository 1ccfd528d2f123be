// crates/trato-export/tests/exporter_tests.rs
// ============================================================================
// Module: Agreement Exporter Tests
// Description: End-to-end tests for the composite export pipeline.
// Purpose: Verify dossier assembly, determinism, and render fallback.
// ============================================================================

//! ## Overview
//! Exercises [`trato_export::AgreementExporter`] against memory and directory
//! sinks: full bundle contents, idempotent re-export, in-place verification,
//! and the degraded path where document rendering fails.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]
#![allow(dead_code, reason = "Common module may have unused helpers.")]

mod common;

use tempfile::TempDir;
use trato_core::AgreementBuilder;
use trato_core::AgreementRecord;
use trato_core::DocumentRenderer;
use trato_core::DossierError;
use trato_core::LogicalClock;
use trato_core::NegotiationSession;
use trato_core::Party;
use trato_core::RenderError;
use trato_core::RenderedDocument;
use trato_core::SessionState;
use trato_core::Timestamp;
use trato_core::TopicKey;
use trato_core::VerificationStatus;
use trato_export::AgreementExporter;
use trato_export::DirSink;
use trato_export::MANIFEST_PATH;
use trato_export::MemorySink;
use trato_export::TextRenderer;

use crate::common::sample_spec;
use crate::common::sealed_fixture;

// ============================================================================
// SECTION: Test Doubles
// ============================================================================

/// Renderer double that always fails.
struct FailingRenderer;

impl DocumentRenderer for FailingRenderer {
    fn render(
        &self,
        _record: &AgreementRecord,
        _state: &SessionState,
    ) -> Result<RenderedDocument, RenderError> {
        Err(RenderError::RenderFailed("renderer offline".to_string()))
    }
}

// ============================================================================
// SECTION: Export Tests
// ============================================================================

#[test]
fn test_export_writes_full_bundle() {
    let (state, record) = sealed_fixture("neg-exp");
    let exporter = AgreementExporter::new(TextRenderer::new());
    let mut sink = MemorySink::new();

    let outcome =
        exporter.export(&mut sink, &state, &record, Timestamp::Logical(50)).expect("export");

    assert!(outcome.has_document());
    assert_eq!(
        sink.paths(),
        vec![
            "artifacts/agreement.json".to_string(),
            "artifacts/document".to_string(),
            "artifacts/messages.json".to_string(),
            "artifacts/terms.json".to_string(),
            "artifacts/topics.json".to_string(),
            MANIFEST_PATH.to_string(),
        ]
    );
    assert_eq!(outcome.manifest.artifacts.len(), 5);
    assert_eq!(outcome.manifest.session_id, state.session_id);
    assert_eq!(outcome.manifest.terms_digest, record.digest);
}

#[test]
fn test_export_is_deterministic() {
    let (state, record) = sealed_fixture("neg-det");
    let exporter = AgreementExporter::new(TextRenderer::new());

    let mut first_sink = MemorySink::new();
    let mut second_sink = MemorySink::new();
    let first = exporter
        .export(&mut first_sink, &state, &record, Timestamp::Logical(50))
        .expect("first export");
    let second = exporter
        .export(&mut second_sink, &state, &record, Timestamp::Logical(50))
        .expect("second export");

    assert_eq!(first.manifest, second.manifest);
    assert_eq!(first_sink.paths(), second_sink.paths());
    for path in first_sink.paths() {
        assert_eq!(first_sink.bytes(&path), second_sink.bytes(&path), "bytes differ at {path}");
    }
}

#[test]
fn test_export_verified_passes_on_untampered_bundle() {
    let (state, record) = sealed_fixture("neg-ver");
    let exporter = AgreementExporter::new(TextRenderer::new());
    let mut sink = MemorySink::new();

    let (outcome, report) = exporter
        .export_verified(&mut sink, &state, &record, Timestamp::Logical(50))
        .expect("export verified");

    assert_eq!(report.status, VerificationStatus::Pass);
    assert_eq!(report.checked_files, 5);
    assert!(outcome.has_document());
}

#[test]
fn test_export_verified_flags_tampering() {
    let (state, record) = sealed_fixture("neg-tamper");
    let exporter = AgreementExporter::new(TextRenderer::new());
    let mut sink = MemorySink::new();

    let outcome =
        exporter.export(&mut sink, &state, &record, Timestamp::Logical(50)).expect("export");
    sink.insert_bytes("artifacts/terms.json", b"tampered".to_vec());

    let verifier = trato_core::DossierVerifier::new(outcome.manifest.hash_algorithm);
    let report = verifier.verify_manifest(&sink, &outcome.manifest).expect("verify");

    assert_eq!(report.status, VerificationStatus::Fail);
    assert!(report.errors.iter().any(|error| error.contains("artifacts/terms.json")));
}

#[test]
fn test_export_falls_back_without_document_on_render_failure() {
    let (state, record) = sealed_fixture("neg-fallback");
    let exporter = AgreementExporter::new(FailingRenderer);
    let mut sink = MemorySink::new();

    let outcome =
        exporter.export(&mut sink, &state, &record, Timestamp::Logical(50)).expect("export");

    assert!(!outcome.has_document());
    let failure = outcome.render_failure.as_deref();
    assert_eq!(failure, Some("document rendering failed: renderer offline"));
    assert_eq!(outcome.manifest.artifacts.len(), 4);
    assert_eq!(sink.bytes("artifacts/document"), None);
}

#[test]
fn test_export_rejects_unsealed_record() {
    let spec = sample_spec("neg-unsealed");
    let mut session = NegotiationSession::open(&spec, LogicalClock::new()).expect("open");
    session.propose(&TopicKey::new("deadline"), "2026-10-01", Party::Provider).expect("propose");
    session.accept(&TopicKey::new("price"), Party::Client).expect("accept price");
    session.accept(&TopicKey::new("deadline"), Party::Client).expect("accept deadline");
    let record = session.finalize(&AgreementBuilder::default()).expect("finalize");
    let state = session.into_state();

    let exporter = AgreementExporter::new(TextRenderer::new());
    let mut sink = MemorySink::new();
    let err = exporter
        .export(&mut sink, &state, &record, Timestamp::Logical(50))
        .expect_err("unsealed must fail");

    assert!(matches!(err, DossierError::RecordNotSealed));
    assert!(sink.paths().is_empty());
}

#[test]
fn test_export_to_directory_round_trips_verification() {
    let (state, record) = sealed_fixture("neg-dir");
    let exporter = AgreementExporter::new(TextRenderer::new());
    let dir = TempDir::new().expect("tempdir");
    let mut sink = DirSink::create(dir.path()).expect("create sink");

    let (_, report) = exporter
        .export_verified(&mut sink, &state, &record, Timestamp::Logical(50))
        .expect("export verified");

    assert_eq!(report.status, VerificationStatus::Pass);
    assert!(dir.path().join(MANIFEST_PATH).exists());
    assert!(dir.path().join("artifacts/document").exists());
}
