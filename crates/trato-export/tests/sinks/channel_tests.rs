// crates/trato-export/tests/sinks/channel_tests.rs
// ============================================================================
// Module: ChannelSink Unit Tests
// Description: Tests for the Tokio channel dossier sink.
// ============================================================================

use trato_core::ExportSink;
use trato_export::ChannelSink;
use trato_export::ExportEvent;
use trato_export::MANIFEST_PATH;

use super::common::sample_artifact;
use super::common::sample_manifest;

#[test]
fn channel_sink_forwards_artifact_event() {
    let (sender, mut receiver) = tokio::sync::mpsc::channel(4);
    let mut sink = ChannelSink::new(sender);

    let artifact = sample_artifact("artifacts/terms.json", b"{}");
    let export_ref = sink.write(&artifact).expect("write");
    assert_eq!(export_ref.uri, "artifacts/terms.json");

    match receiver.try_recv().expect("event") {
        ExportEvent::Artifact(received) => assert_eq!(received, artifact),
        ExportEvent::Manifest(_) => panic!("expected artifact event"),
    }
}

#[test]
fn channel_sink_forwards_manifest_event() {
    let (sender, mut receiver) = tokio::sync::mpsc::channel(4);
    let mut sink = ChannelSink::new(sender);
    let manifest = sample_manifest();

    let export_ref = sink.finalize(&manifest).expect("finalize");
    assert_eq!(export_ref.uri, MANIFEST_PATH);

    match receiver.try_recv().expect("event") {
        ExportEvent::Manifest(received) => assert_eq!(received, manifest),
        ExportEvent::Artifact(_) => panic!("expected manifest event"),
    }
}

#[test]
fn channel_sink_fails_when_channel_is_full() {
    let (sender, _receiver) = tokio::sync::mpsc::channel(1);
    let mut sink = ChannelSink::new(sender);

    sink.write(&sample_artifact("a.json", b"{}")).expect("first write fits");
    let err = sink.write(&sample_artifact("b.json", b"{}")).expect_err("second must fail");

    assert!(err.to_string().contains("capacity"));
}

#[test]
fn channel_sink_fails_when_receiver_dropped() {
    let (sender, receiver) = tokio::sync::mpsc::channel(4);
    drop(receiver);
    let mut sink = ChannelSink::new(sender);

    assert!(sink.write(&sample_artifact("a.json", b"{}")).is_err());
}
