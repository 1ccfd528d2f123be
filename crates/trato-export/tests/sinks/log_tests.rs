// crates/trato-export/tests/sinks/log_tests.rs
// ============================================================================
// Module: LogSink Unit Tests
// Description: Tests for the JSON-lines audit log sink.
// ============================================================================

use serde_json::Value;
use trato_core::ExportError;
use trato_core::ExportSink;
use trato_export::LogSink;

use super::common::FailingWriter;
use super::common::SharedBuffer;
use super::common::sample_artifact;
use super::common::sample_manifest;

#[test]
fn log_sink_writes_artifact_record() {
    let buffer = SharedBuffer::new();
    let mut sink = LogSink::new(buffer.clone());

    let artifact = sample_artifact("artifacts/terms.json", b"{\"price\":\"1500\"}");
    sink.write(&artifact).expect("write");

    let record: Value = serde_json::from_str(&buffer.to_string_lossy()).expect("parse json");
    assert_eq!(record["event"], "artifact");
    assert_eq!(record["path"], "artifacts/terms.json");
    assert_eq!(record["kind"], "custom");
    assert_eq!(record["bytes_len"], 16);
    assert_eq!(record["required"], true);
}

#[test]
fn log_sink_writes_manifest_record() {
    let buffer = SharedBuffer::new();
    let mut sink = LogSink::new(buffer.clone());
    let manifest = sample_manifest();

    sink.finalize(&manifest).expect("finalize");

    let record: Value = serde_json::from_str(&buffer.to_string_lossy()).expect("parse json");
    assert_eq!(record["event"], "manifest");
    assert_eq!(record["session_id"], "neg-manifest");
    assert_eq!(record["audit_grade"], true);
    assert_eq!(record["artifact_count"], 4);
    assert!(record["root_hash"]["value"].is_string());
}

#[test]
fn log_sink_writes_one_line_per_record() {
    let buffer = SharedBuffer::new();
    let mut sink = LogSink::new(buffer.clone());

    sink.write(&sample_artifact("a.json", b"{}")).expect("write a");
    sink.write(&sample_artifact("b.json", b"{}")).expect("write b");

    let output = buffer.to_string_lossy();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let _: Value = serde_json::from_str(line).expect("each line is json");
    }
}

#[test]
fn log_sink_fails_on_write_error() {
    let mut sink = LogSink::new(FailingWriter);

    let err = sink.write(&sample_artifact("a.json", b"{}")).expect_err("must fail");

    assert!(matches!(err, ExportError::Sink(_)));
}
