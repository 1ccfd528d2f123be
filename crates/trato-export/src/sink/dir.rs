// crates/trato-export/src/sink/dir.rs
// ============================================================================
// Module: Directory Export Sink
// Description: Filesystem-backed dossier sink and reader.
// Purpose: Persist dossier bundles as plain directories for offline handling.
// Dependencies: trato-core, serde_jcs
// ============================================================================

//! ## Overview
//! [`DirSink`] writes each artifact under a root directory and the canonical
//! manifest at [`crate::sink::MANIFEST_PATH`]. Artifact paths are validated
//! before any filesystem access; traversal outside the root fails closed.
//! The sink doubles as an [`ExportReader`] so a written bundle can be
//! verified in place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;

use trato_core::DossierManifest;
use trato_core::ExportArtifact;
use trato_core::ExportError;
use trato_core::ExportReader;
use trato_core::ExportRef;
use trato_core::ExportSink;

use crate::sink::MANIFEST_PATH;
use crate::sink::ensure_relative_path;

// ============================================================================
// SECTION: Directory Sink
// ============================================================================

/// Filesystem dossier sink rooted at one directory.
#[derive(Debug, Clone)]
pub struct DirSink {
    /// Root directory all artifact paths resolve under.
    root: PathBuf,
}

impl DirSink {
    /// Creates the root directory and returns a sink over it.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Sink`] when the directory cannot be created.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|err| ExportError::Sink(format!("create dossier root: {err}")))?;
        Ok(Self {
            root,
        })
    }

    /// Returns the root directory of this sink.
    #[must_use]
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Resolves a validated dossier-relative path under the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, ExportError> {
        ensure_relative_path(path)?;
        Ok(self.root.join(path))
    }

    /// Writes bytes to a dossier-relative path, creating parent directories.
    fn write_bytes(&self, path: &str, bytes: &[u8]) -> Result<ExportRef, ExportError> {
        let resolved = self.resolve(path)?;
        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| ExportError::Sink(format!("create artifact dir: {err}")))?;
        }
        fs::write(&resolved, bytes)
            .map_err(|err| ExportError::Sink(format!("write artifact {path}: {err}")))?;
        Ok(ExportRef {
            uri: path.to_string(),
        })
    }
}

impl ExportSink for DirSink {
    fn write(&mut self, artifact: &ExportArtifact) -> Result<ExportRef, ExportError> {
        self.write_bytes(&artifact.path, &artifact.bytes)
    }

    fn finalize(&mut self, manifest: &DossierManifest) -> Result<ExportRef, ExportError> {
        let bytes = serde_jcs::to_vec(manifest)
            .map_err(|err| ExportError::Sink(format!("serialize manifest: {err}")))?;
        self.write_bytes(MANIFEST_PATH, &bytes)
    }
}

impl ExportReader for DirSink {
    fn read(&self, path: &str) -> Result<Vec<u8>, ExportError> {
        let resolved = self.resolve(path)?;
        fs::read(&resolved).map_err(|err| ExportError::Sink(format!("read artifact {path}: {err}")))
    }
}
