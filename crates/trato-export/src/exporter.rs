// crates/trato-export/src/exporter.rs
// ============================================================================
// Module: Agreement Exporter
// Description: Composite export pipeline for sealed agreements.
// Purpose: Render the agreement document and build the dossier in one call.
// Dependencies: trato-core
// ============================================================================

//! ## Overview
//! [`AgreementExporter`] wires a [`DocumentRenderer`] into the dossier
//! builder. A rendering failure never blocks the export: the dossier is then
//! built without a document and the failure is reported alongside the
//! manifest. Exports are idempotent; running the same export twice against
//! the same inputs produces byte-identical artifacts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use trato_core::AgreementRecord;
use trato_core::DocumentRenderer;
use trato_core::DossierBuilder;
use trato_core::DossierError;
use trato_core::DossierManifest;
use trato_core::DossierVerifier;
use trato_core::ExportReader;
use trato_core::ExportSink;
use trato_core::SessionState;
use trato_core::Timestamp;
use trato_core::VerificationReport;

// ============================================================================
// SECTION: Export Outcome
// ============================================================================

/// Result of one export run.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// Manifest of the exported dossier.
    pub manifest: DossierManifest,
    /// Rendering failure message when the document could not be produced.
    pub render_failure: Option<String>,
}

impl ExportOutcome {
    /// Returns true when the dossier carries a rendered document.
    #[must_use]
    pub const fn has_document(&self) -> bool {
        self.render_failure.is_none()
    }
}

// ============================================================================
// SECTION: Exporter
// ============================================================================

/// Composite exporter pairing a renderer with the dossier builder.
#[derive(Debug, Clone)]
pub struct AgreementExporter<R: DocumentRenderer> {
    /// Renderer producing the human-readable agreement document.
    renderer: R,
    /// Dossier builder configuration.
    builder: DossierBuilder,
}

impl<R: DocumentRenderer> AgreementExporter<R> {
    /// Creates an exporter with the default dossier builder.
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            builder: DossierBuilder::default(),
        }
    }

    /// Creates an exporter with a custom dossier builder.
    #[must_use]
    pub const fn with_builder(renderer: R, builder: DossierBuilder) -> Self {
        Self {
            renderer,
            builder,
        }
    }

    /// Exports the sealed agreement as a dossier bundle.
    ///
    /// The document is rendered first; when rendering fails the dossier is
    /// still built without a document and the failure message is carried in
    /// the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError`] when the record is not sealed, the record
    /// and state disagree, or the sink rejects a write.
    pub fn export<S: ExportSink>(
        &self,
        sink: &mut S,
        state: &SessionState,
        record: &AgreementRecord,
        generated_at: Timestamp,
    ) -> Result<ExportOutcome, DossierError> {
        match self.renderer.render(record, state) {
            Ok(document) => {
                let manifest = self
                    .builder
                    .build_with_document(sink, state, record, &document, generated_at)?;
                Ok(ExportOutcome {
                    manifest,
                    render_failure: None,
                })
            }
            Err(err) => {
                let manifest = self.builder.build(sink, state, record, generated_at)?;
                Ok(ExportOutcome {
                    manifest,
                    render_failure: Some(err.to_string()),
                })
            }
        }
    }

    /// Exports the dossier and verifies it in place through the reader.
    ///
    /// The rendered document participates in the dossier before verification
    /// runs, so the report covers every artifact including the document.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError`] when export or verification plumbing fails.
    /// Integrity findings are reported in the [`VerificationReport`], not as
    /// errors.
    pub fn export_verified<S: ExportSink + ExportReader>(
        &self,
        sink: &mut S,
        state: &SessionState,
        record: &AgreementRecord,
        generated_at: Timestamp,
    ) -> Result<(ExportOutcome, VerificationReport), DossierError> {
        let outcome = self.export(sink, state, record, generated_at)?;
        let verifier = DossierVerifier::new(self.builder.hash_algorithm);
        let report = verifier.verify_manifest(&*sink, &outcome.manifest)?;
        Ok((outcome, report))
    }
}
