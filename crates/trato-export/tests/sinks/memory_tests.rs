// crates/trato-export/tests/sinks/memory_tests.rs
// ============================================================================
// Module: MemorySink Unit Tests
// Description: Tests for the in-memory dossier sink and reader.
// ============================================================================

use trato_core::ExportError;
use trato_core::ExportReader;
use trato_core::ExportSink;
use trato_export::MANIFEST_PATH;
use trato_export::MemorySink;

use super::common::sample_artifact;
use super::common::sample_manifest;

#[test]
fn memory_sink_stores_and_reads_artifact() {
    let mut sink = MemorySink::new();

    let artifact = sample_artifact("artifacts/terms.json", b"{\"price\":\"1500\"}");
    let export_ref = sink.write(&artifact).expect("write");

    assert_eq!(export_ref.uri, "artifacts/terms.json");
    assert_eq!(sink.read("artifacts/terms.json").expect("read"), artifact.bytes);
}

#[test]
fn memory_sink_finalize_stores_canonical_manifest() {
    let mut sink = MemorySink::new();
    let manifest = sample_manifest();

    sink.finalize(&manifest).expect("finalize");

    let stored = sink.bytes(MANIFEST_PATH).expect("manifest stored");
    assert_eq!(stored, serde_jcs::to_vec(&manifest).expect("canonical manifest"));
}

#[test]
fn memory_sink_clones_share_storage() {
    let mut sink = MemorySink::new();
    let reader = sink.clone();

    sink.write(&sample_artifact("artifacts/topics.json", b"[]")).expect("write");

    assert_eq!(reader.read("artifacts/topics.json").expect("read"), b"[]".to_vec());
}

#[test]
fn memory_sink_lists_paths_sorted() {
    let mut sink = MemorySink::new();

    sink.write(&sample_artifact("b.json", b"{}")).expect("write b");
    sink.write(&sample_artifact("a.json", b"{}")).expect("write a");

    assert_eq!(sink.paths(), vec!["a.json".to_string(), "b.json".to_string()]);
}

#[test]
fn memory_sink_read_missing_artifact_fails() {
    let sink = MemorySink::new();

    let err = sink.read("absent.json").expect_err("missing must fail");

    assert!(matches!(err, ExportError::Sink(_)));
}

#[test]
fn memory_sink_rejects_traversal_path() {
    let mut sink = MemorySink::new();

    assert!(sink.write(&sample_artifact("../escape.json", b"{}")).is_err());
    assert!(sink.paths().is_empty());
}

#[test]
fn memory_sink_insert_and_remove_mutate_storage() {
    let sink = MemorySink::new();

    sink.insert_bytes("artifacts/terms.json", b"tampered".to_vec());
    assert_eq!(sink.bytes("artifacts/terms.json"), Some(b"tampered".to_vec()));

    assert_eq!(sink.remove("artifacts/terms.json"), Some(b"tampered".to_vec()));
    assert_eq!(sink.bytes("artifacts/terms.json"), None);
}

#[test]
fn memory_sink_overwrites_existing_artifact() {
    let mut sink = MemorySink::new();

    sink.write(&sample_artifact("artifacts/terms.json", b"old")).expect("first write");
    sink.write(&sample_artifact("artifacts/terms.json", b"new")).expect("second write");

    assert_eq!(sink.bytes("artifacts/terms.json"), Some(b"new".to_vec()));
}
