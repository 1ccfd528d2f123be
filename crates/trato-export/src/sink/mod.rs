// crates/trato-export/src/sink/mod.rs
// ============================================================================
// Module: Trato Export Sinks
// Description: Reference sink implementations for dossier artifact delivery.
// Purpose: Write dossier artifacts to directories, memory, channels, and logs.
// Dependencies: trato-core
// ============================================================================

//! ## Overview
//! Sinks receive dossier artifacts from the dossier builder and persist or
//! forward them. Implementations must fail closed on invalid paths and must
//! never partially acknowledge a write.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Component;
use std::path::Path;

use trato_core::DossierManifest;
use trato_core::ExportArtifact;
use trato_core::ExportError;

// ============================================================================
// SECTION: Shared Types
// ============================================================================

/// Dossier-relative path where sinks store the finalized manifest.
pub const MANIFEST_PATH: &str = "manifest.json";

/// Event emitted by the channel sink for each dossier write.
#[derive(Debug, Clone)]
pub enum ExportEvent {
    /// One artifact was written.
    Artifact(ExportArtifact),
    /// The dossier manifest was finalized.
    Manifest(DossierManifest),
}

// ============================================================================
// SECTION: Path Validation
// ============================================================================

/// Validates a dossier-relative artifact path.
///
/// Rejects absolute paths, parent-directory traversal, and any component
/// that is not a plain name.
pub(crate) fn ensure_relative_path(path: &str) -> Result<(), ExportError> {
    if path.is_empty() {
        return Err(ExportError::Sink("artifact path must not be empty".to_string()));
    }
    let valid = Path::new(path).components().all(|part| matches!(part, Component::Normal(_)));
    if !valid {
        return Err(ExportError::Sink(format!("artifact path escapes the dossier: {path}")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod channel;
pub mod dir;
pub mod log;
pub mod memory;

pub use channel::ChannelSink;
pub use dir::DirSink;
pub use log::LogSink;
pub use memory::MemorySink;
