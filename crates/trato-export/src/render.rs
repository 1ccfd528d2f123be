// crates/trato-export/src/render.rs
// ============================================================================
// Module: Text Agreement Renderer
// Description: Deterministic plain-text rendering of sealed agreements.
// Purpose: Produce a human-readable agreement document for dossier bundles.
// Dependencies: trato-core, time
// ============================================================================

//! ## Overview
//! [`TextRenderer`] renders a sealed agreement record into a plain-text
//! document: parties, agreed terms with their display labels, the integrity
//! digest, and both signature blocks. Output is fully determined by the
//! record and session state, so repeated renders are byte-identical.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt::Write;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use trato_core::AgreementRecord;
use trato_core::DocumentRenderer;
use trato_core::HashAlgorithm;
use trato_core::Party;
use trato_core::RenderError;
use trato_core::RenderedDocument;
use trato_core::SessionState;
use trato_core::Signature;
use trato_core::Timestamp;

// ============================================================================
// SECTION: Renderer
// ============================================================================

/// Content type of rendered text documents.
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Plain-text agreement document renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    /// Creates a new text renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for TextRenderer {
    fn render(
        &self,
        record: &AgreementRecord,
        state: &SessionState,
    ) -> Result<RenderedDocument, RenderError> {
        if record.session_id != state.session_id {
            return Err(RenderError::RenderFailed(
                "record and session state disagree on session id".to_string(),
            ));
        }

        let labels: BTreeMap<&str, &str> = state
            .topics
            .iter()
            .map(|topic| (topic.key.as_str(), topic.label.as_str()))
            .collect();

        let mut text = String::new();
        write_document(&mut text, record, state, &labels)
            .map_err(|err| RenderError::RenderFailed(err.to_string()))?;

        Ok(RenderedDocument {
            content_type: TEXT_CONTENT_TYPE.to_string(),
            bytes: text.into_bytes(),
        })
    }
}

// ============================================================================
// SECTION: Document Sections
// ============================================================================

/// Writes the full document into the output buffer.
fn write_document(
    out: &mut String,
    record: &AgreementRecord,
    state: &SessionState,
    labels: &BTreeMap<&str, &str>,
) -> std::fmt::Result {
    writeln!(out, "TERMO DE FORMALIZAÇÃO DE SERVIÇO")?;
    writeln!(out, "Sessão: {}", record.session_id)?;
    writeln!(out, "Prestador: {}", state.provider)?;
    writeln!(out, "Cliente: {}", state.client)?;
    writeln!(out, "Gerado a partir do registro de {}", format_timestamp(record.created_at))?;
    writeln!(out)?;

    writeln!(out, "TERMOS ACORDADOS")?;
    for (key, value) in record.terms.iter() {
        let label = labels.get(key).copied().unwrap_or(key);
        writeln!(out, "- {label}: {value}")?;
    }
    writeln!(out)?;

    writeln!(out, "INTEGRIDADE")?;
    match &record.digest {
        Some(digest) => {
            let label = algorithm_label(digest.algorithm);
            writeln!(out, "Resumo canônico ({label}): {}", digest.value)?;
        }
        None => writeln!(out, "Resumo canônico: indisponível (registro em modo degradado)")?,
    }
    writeln!(out)?;

    writeln!(out, "ASSINATURAS")?;
    write_signature_block(out, Party::Provider, record.provider_signature.as_ref())?;
    write_signature_block(out, Party::Client, record.client_signature.as_ref())?;
    Ok(())
}

/// Writes one party's signature block.
fn write_signature_block(
    out: &mut String,
    party: Party,
    signature: Option<&Signature>,
) -> std::fmt::Result {
    let role = match party {
        Party::Provider => "Prestador",
        Party::Client => "Cliente",
    };
    match signature {
        Some(signature) => {
            writeln!(out, "{role}: {}", signature.typed_name)?;
            writeln!(out, "  Assinado em: {}", format_timestamp(signature.signed_at))?;
            match signature.geolocation {
                Some(fix) => {
                    writeln!(out, "  Localização: {}, {}", fix.latitude, fix.longitude)?;
                }
                None => writeln!(out, "  Localização: não capturada")?,
            }
            writeln!(out, "  Dispositivo: {}", signature.user_agent)?;
        }
        None => writeln!(out, "{role}: pendente")?,
    }
    Ok(())
}

/// Returns the display label for a hash algorithm.
const fn algorithm_label(algorithm: HashAlgorithm) -> &'static str {
    match algorithm {
        HashAlgorithm::Sha256 => "sha-256",
    }
}

/// Formats a timestamp for document display.
fn format_timestamp(timestamp: Timestamp) -> String {
    match timestamp {
        Timestamp::UnixMillis(millis) => {
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
                .ok()
                .and_then(|moment| moment.format(&Rfc3339).ok())
                .unwrap_or_else(|| format!("unix-ms {millis}"))
        }
        Timestamp::Logical(value) => format!("t+{value}"),
    }
}
