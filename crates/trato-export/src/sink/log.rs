// crates/trato-export/src/sink/log.rs
// ============================================================================
// Module: Log Export Sink
// Description: Log-only sink for audit trails of dossier generation.
// Purpose: Record dossier writes as JSON lines without persisting artifacts.
// Dependencies: trato-core, serde_json
// ============================================================================

//! ## Overview
//! `LogSink` writes one JSON record per dossier write and discards the
//! artifact bytes. It exists for audit trails and dry runs; pair it with a
//! persisting sink when the bundle itself must be kept.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use serde_json::json;
use trato_core::DossierManifest;
use trato_core::ExportArtifact;
use trato_core::ExportError;
use trato_core::ExportRef;
use trato_core::ExportSink;

use crate::sink::MANIFEST_PATH;

// ============================================================================
// SECTION: Log Sink
// ============================================================================

/// Log-only dossier sink.
pub struct LogSink<W: Write + Send> {
    /// Output writer for log records.
    writer: Mutex<W>,
}

impl<W: Write + Send> LogSink<W> {
    /// Creates a log sink over the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Writes one JSON record followed by a newline.
    fn write_record(&self, record: &serde_json::Value) -> Result<(), ExportError> {
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| ExportError::Sink("log writer mutex poisoned".to_string()))?;
        serde_json::to_writer(&mut *guard, record)
            .map_err(|err| ExportError::Sink(err.to_string()))?;
        guard.write_all(b"\n").map_err(|err| ExportError::Sink(err.to_string()))?;
        drop(guard);
        Ok(())
    }
}

impl<W: Write + Send> ExportSink for LogSink<W> {
    fn write(&mut self, artifact: &ExportArtifact) -> Result<ExportRef, ExportError> {
        let record = json!({
            "event": "artifact",
            "path": artifact.path,
            "kind": artifact.kind,
            "content_type": artifact.content_type,
            "bytes_len": artifact.bytes.len(),
            "required": artifact.required,
        });
        self.write_record(&record)?;
        Ok(ExportRef {
            uri: artifact.path.clone(),
        })
    }

    fn finalize(&mut self, manifest: &DossierManifest) -> Result<ExportRef, ExportError> {
        let record = json!({
            "event": "manifest",
            "session_id": manifest.session_id,
            "manifest_version": manifest.manifest_version,
            "audit_grade": manifest.audit_grade,
            "artifact_count": manifest.artifacts.len(),
            "root_hash": manifest.integrity.root_hash,
        });
        self.write_record(&record)?;
        Ok(ExportRef {
            uri: MANIFEST_PATH.to_string(),
        })
    }
}
