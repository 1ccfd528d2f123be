// crates/trato-export/src/sink/channel.rs
// ============================================================================
// Module: Channel Export Sink
// Description: Channel-based sink for asynchronous dossier delivery.
// Purpose: Forward dossier writes through a Tokio mpsc channel.
// Dependencies: trato-core, tokio
// ============================================================================

//! ## Overview
//! [`ChannelSink`] forwards each artifact and the finalized manifest as
//! [`ExportEvent`] messages into a `tokio::sync::mpsc` channel, letting an
//! async consumer stream a dossier while it is being built.
//! Invariants:
//! - Each successful write enqueues exactly one event.
//! - A full or closed channel fails the write; nothing is silently dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tokio::sync::mpsc::Sender;
use trato_core::DossierManifest;
use trato_core::ExportArtifact;
use trato_core::ExportError;
use trato_core::ExportRef;
use trato_core::ExportSink;

use crate::sink::ExportEvent;
use crate::sink::MANIFEST_PATH;

// ============================================================================
// SECTION: Channel Sink
// ============================================================================

/// Channel-based dossier sink.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    /// Sender used to forward export events.
    sender: Sender<ExportEvent>,
}

impl ChannelSink {
    /// Creates a channel sink over the given sender.
    #[must_use]
    pub const fn new(sender: Sender<ExportEvent>) -> Self {
        Self {
            sender,
        }
    }

    /// Sends one event without awaiting channel capacity.
    fn send(&self, event: ExportEvent) -> Result<(), ExportError> {
        self.sender.try_send(event).map_err(|err| ExportError::Sink(err.to_string()))
    }
}

impl ExportSink for ChannelSink {
    fn write(&mut self, artifact: &ExportArtifact) -> Result<ExportRef, ExportError> {
        self.send(ExportEvent::Artifact(artifact.clone()))?;
        Ok(ExportRef {
            uri: artifact.path.clone(),
        })
    }

    fn finalize(&mut self, manifest: &DossierManifest) -> Result<ExportRef, ExportError> {
        self.send(ExportEvent::Manifest(manifest.clone()))?;
        Ok(ExportRef {
            uri: MANIFEST_PATH.to_string(),
        })
    }
}
