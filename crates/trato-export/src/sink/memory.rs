// crates/trato-export/src/sink/memory.rs
// ============================================================================
// Module: Memory Export Sink
// Description: In-memory dossier sink and reader.
// Purpose: Hold dossier bundles for tests, previews, and re-verification.
// Dependencies: trato-core, serde_jcs
// ============================================================================

//! ## Overview
//! [`MemorySink`] stores dossier artifacts in a shared in-memory map keyed by
//! dossier-relative path. Clones share storage, so one handle can write a
//! bundle while another verifies it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use trato_core::DossierManifest;
use trato_core::ExportArtifact;
use trato_core::ExportError;
use trato_core::ExportReader;
use trato_core::ExportRef;
use trato_core::ExportSink;

use crate::sink::MANIFEST_PATH;
use crate::sink::ensure_relative_path;

// ============================================================================
// SECTION: Memory Sink
// ============================================================================

/// In-memory dossier sink with shared storage across clones.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    /// Artifact bytes keyed by dossier-relative path.
    files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemorySink {
    /// Creates an empty memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored paths in sorted order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.files.lock().map_or_else(|_| Vec::new(), |guard| guard.keys().cloned().collect())
    }

    /// Returns the bytes stored at a path, if present.
    #[must_use]
    pub fn bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().ok().and_then(|guard| guard.get(path).cloned())
    }

    /// Stores raw bytes at a path, replacing any existing content.
    pub fn insert_bytes(&self, path: impl Into<String>, bytes: Vec<u8>) {
        if let Ok(mut guard) = self.files.lock() {
            guard.insert(path.into(), bytes);
        }
    }

    /// Removes the bytes stored at a path.
    pub fn remove(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().ok().and_then(|mut guard| guard.remove(path))
    }

    /// Stores bytes under a validated path.
    fn store(&self, path: &str, bytes: Vec<u8>) -> Result<ExportRef, ExportError> {
        ensure_relative_path(path)?;
        let mut guard = self
            .files
            .lock()
            .map_err(|_| ExportError::Sink("memory sink mutex poisoned".to_string()))?;
        guard.insert(path.to_string(), bytes);
        Ok(ExportRef {
            uri: path.to_string(),
        })
    }
}

impl ExportSink for MemorySink {
    fn write(&mut self, artifact: &ExportArtifact) -> Result<ExportRef, ExportError> {
        self.store(&artifact.path, artifact.bytes.clone())
    }

    fn finalize(&mut self, manifest: &DossierManifest) -> Result<ExportRef, ExportError> {
        let bytes = serde_jcs::to_vec(manifest)
            .map_err(|err| ExportError::Sink(format!("serialize manifest: {err}")))?;
        self.store(MANIFEST_PATH, bytes)
    }
}

impl ExportReader for MemorySink {
    fn read(&self, path: &str) -> Result<Vec<u8>, ExportError> {
        self.bytes(path).ok_or_else(|| ExportError::Sink(format!("missing artifact: {path}")))
    }
}
