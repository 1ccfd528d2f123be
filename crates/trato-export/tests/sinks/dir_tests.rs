// crates/trato-export/tests/sinks/dir_tests.rs
// ============================================================================
// Module: DirSink Unit Tests
// Description: Tests for the filesystem-backed dossier sink and reader.
// ============================================================================

use tempfile::TempDir;
use trato_core::ExportError;
use trato_core::ExportReader;
use trato_core::ExportSink;
use trato_export::DirSink;
use trato_export::MANIFEST_PATH;

use super::common::sample_artifact;
use super::common::sample_manifest;

#[test]
fn dir_sink_writes_artifact_under_root() {
    let dir = TempDir::new().expect("tempdir");
    let mut sink = DirSink::create(dir.path()).expect("create sink");

    let artifact = sample_artifact("artifacts/terms.json", b"{\"price\":\"1500\"}");
    let export_ref = sink.write(&artifact).expect("write");

    assert_eq!(export_ref.uri, "artifacts/terms.json");
    let written = std::fs::read(dir.path().join("artifacts/terms.json")).expect("read back");
    assert_eq!(written, artifact.bytes);
}

#[test]
fn dir_sink_read_round_trips_written_bytes() {
    let dir = TempDir::new().expect("tempdir");
    let mut sink = DirSink::create(dir.path()).expect("create sink");

    let artifact = sample_artifact("artifacts/messages.json", b"[]");
    sink.write(&artifact).expect("write");

    assert_eq!(sink.read("artifacts/messages.json").expect("read"), b"[]".to_vec());
}

#[test]
fn dir_sink_finalize_writes_canonical_manifest() {
    let dir = TempDir::new().expect("tempdir");
    let mut sink = DirSink::create(dir.path()).expect("create sink");
    let manifest = sample_manifest();

    let export_ref = sink.finalize(&manifest).expect("finalize");

    assert_eq!(export_ref.uri, MANIFEST_PATH);
    let written = std::fs::read(dir.path().join(MANIFEST_PATH)).expect("read manifest");
    let canonical = serde_jcs::to_vec(&manifest).expect("canonical manifest");
    assert_eq!(written, canonical);
}

#[test]
fn dir_sink_rejects_parent_traversal() {
    let dir = TempDir::new().expect("tempdir");
    let mut sink = DirSink::create(dir.path()).expect("create sink");

    let artifact = sample_artifact("../escape.json", b"{}");
    let err = sink.write(&artifact).expect_err("traversal must fail");

    assert!(matches!(err, ExportError::Sink(_)));
    assert!(!dir.path().parent().expect("parent").join("escape.json").exists());
}

#[test]
fn dir_sink_rejects_absolute_path() {
    let dir = TempDir::new().expect("tempdir");
    let mut sink = DirSink::create(dir.path()).expect("create sink");

    let artifact = sample_artifact("/tmp/absolute.json", b"{}");

    assert!(sink.write(&artifact).is_err());
}

#[test]
fn dir_sink_rejects_empty_path() {
    let dir = TempDir::new().expect("tempdir");
    let mut sink = DirSink::create(dir.path()).expect("create sink");

    let artifact = sample_artifact("", b"{}");

    assert!(sink.write(&artifact).is_err());
}

#[test]
fn dir_sink_creates_nested_directories() {
    let dir = TempDir::new().expect("tempdir");
    let mut sink = DirSink::create(dir.path()).expect("create sink");

    let artifact = sample_artifact("deep/nested/dir/file.bin", b"\x00\x01");
    sink.write(&artifact).expect("write");

    assert!(dir.path().join("deep/nested/dir/file.bin").exists());
}

#[test]
fn dir_sink_read_missing_artifact_fails() {
    let dir = TempDir::new().expect("tempdir");
    let sink = DirSink::create(dir.path()).expect("create sink");

    let err = sink.read("artifacts/absent.json").expect_err("missing must fail");

    assert!(matches!(err, ExportError::Sink(_)));
}

#[test]
fn dir_sink_read_rejects_traversal() {
    let dir = TempDir::new().expect("tempdir");
    let sink = DirSink::create(dir.path()).expect("create sink");

    assert!(sink.read("../outside.json").is_err());
}
