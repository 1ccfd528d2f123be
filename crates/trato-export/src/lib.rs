// crates/trato-export/src/lib.rs
// ============================================================================
// Module: Trato Export Library
// Description: Reference renderers, sinks, and the composite agreement exporter.
// Purpose: Turn sealed agreements into portable, verifiable dossier bundles.
// Dependencies: trato-core, serde_json, serde_jcs, time, tokio
// ============================================================================

//! ## Overview
//! Trato Export provides ready-made [`trato_core::ExportSink`] and
//! [`trato_core::DocumentRenderer`] implementations plus a composite exporter
//! that wires them into the dossier builder. Export never mutates a sealed
//! agreement; repeating an export with the same inputs produces byte-identical
//! artifacts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod exporter;
pub mod render;
pub mod sink;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use exporter::AgreementExporter;
pub use exporter::ExportOutcome;
pub use render::TextRenderer;
pub use sink::ChannelSink;
pub use sink::DirSink;
pub use sink::ExportEvent;
pub use sink::LogSink;
pub use sink::MANIFEST_PATH;
pub use sink::MemorySink;
