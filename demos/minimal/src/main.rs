// demos/minimal/src/main.rs
// ============================================================================
// Module: Trato Minimal Demo
// Description: Minimal end-to-end negotiation using the full Trato stack.
// Purpose: Demonstrate negotiate/finalize/sign/export against real backends.
// Dependencies: trato-core, trato-providers, trato-export, trato-store-sqlite
// ============================================================================

//! ## Overview
//! Walks one negotiation from opening through dossier verification: topics
//! are proposed and accepted, an early finalize attempt is rejected, the
//! sealed record is persisted to `SQLite`, and the exported dossier is
//! verified in place. Output is deterministic thanks to logical clocks.

use std::io::Write;

use trato_core::AgreementBuilder;
use trato_core::ExportReader;
use trato_core::Geolocation;
use trato_core::LogicalClock;
use trato_core::NegotiationSession;
use trato_core::Party;
use trato_core::PartyId;
use trato_core::SessionId;
use trato_core::SessionSpec;
use trato_core::SignatureCollector;
use trato_core::SignatureRequest;
use trato_core::SigningConfig;
use trato_core::Timestamp;
use trato_core::TopicKey;
use trato_core::TopicSpec;
use trato_core::VerificationStatus;
use trato_export::AgreementExporter;
use trato_export::MemorySink;
use trato_export::TextRenderer;
use trato_providers::DeniedLocationSource;
use trato_providers::FixedLocationSource;
use trato_store_sqlite::SqliteJournalMode;
use trato_store_sqlite::SqliteNegotiationStore;
use trato_store_sqlite::SqliteStoreConfig;
use trato_store_sqlite::SqliteSyncMode;

/// Builds the demo session specification.
///
/// The service topic is seeded with the provider's standing offer; the
/// remaining topics open pending.
fn build_spec() -> SessionSpec {
    SessionSpec {
        session_id: SessionId::new("demo-1"),
        provider: PartyId::new("prestador-1"),
        client: PartyId::new("cliente-1"),
        topics: vec![
            TopicSpec {
                key: TopicKey::new("service"),
                label: "Serviço".to_string(),
                description: "Escopo do serviço contratado".to_string(),
                initial_value: Some("Instalação de ar-condicionado split".to_string()),
            },
            TopicSpec {
                key: TopicKey::new("payment"),
                label: "Pagamento".to_string(),
                description: "Forma e condições de pagamento".to_string(),
                initial_value: None,
            },
            TopicSpec {
                key: TopicKey::new("start"),
                label: "Início".to_string(),
                description: "Data de início do serviço".to_string(),
                initial_value: None,
            },
            TopicSpec {
                key: TopicKey::new("duration"),
                label: "Duração".to_string(),
                description: "Prazo estimado de execução".to_string(),
                initial_value: None,
            },
            TopicSpec {
                key: TopicKey::new("finalize"),
                label: "Formalização".to_string(),
                description: "Controle de fechamento da negociação".to_string(),
                initial_value: None,
            },
        ],
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let spec = build_spec();
    let mut session = NegotiationSession::open(&spec, LogicalClock::new())?;
    let summary = session.summary();
    write_line(
        "Session",
        &format!("{} ({} topics pending)", summary.session_id, summary.pending_topics.len()),
    )?;

    session.accept(&TopicKey::new("service"), Party::Client)?;
    session.propose(&TopicKey::new("payment"), "PIX, 50% antecipado", Party::Client)?;
    session.accept(&TopicKey::new("payment"), Party::Provider)?;
    session.propose(&TopicKey::new("start"), "2026-09-15", Party::Provider)?;
    session.accept(&TopicKey::new("start"), Party::Client)?;

    let builder = AgreementBuilder::default();
    if let Err(error) = session.finalize(&builder) {
        write_line("Early finalize", &error.to_string())?;
    }

    session.propose(&TopicKey::new("duration"), "3 dias úteis", Party::Client)?;
    session.accept(&TopicKey::new("duration"), Party::Provider)?;
    let mut record = session.finalize(&builder)?;
    let digest = record.digest.as_ref().map(|digest| digest.value.as_str());
    write_line("Digest", &digest_label(digest))?;

    let provider_collector = SignatureCollector::new(
        LogicalClock::new(),
        FixedLocationSource::new(Geolocation {
            latitude: -23.55,
            longitude: -46.63,
        }),
        SigningConfig::default(),
    );
    let provider_signature = provider_collector.sign(
        &mut record,
        &SignatureRequest {
            party: Party::Provider,
            typed_name: "Ana Prestadora".to_string(),
            user_agent: "trato-demo/0.1".to_string(),
        },
    )?;
    write_line("Provider signature", &location_label(provider_signature.geolocation.as_ref()))?;

    let client_collector = SignatureCollector::new(
        LogicalClock::new(),
        DeniedLocationSource::new("permission denied"),
        SigningConfig::default(),
    );
    let client_signature = client_collector.sign(
        &mut record,
        &SignatureRequest {
            party: Party::Client,
            typed_name: "Bruno Cliente".to_string(),
            user_agent: "trato-demo/0.1".to_string(),
        },
    )?;
    write_line("Client signature", &location_label(client_signature.geolocation.as_ref()))?;

    let state = session.into_state();
    let db_path =
        std::env::temp_dir().join(format!("trato-minimal-{}.sqlite", std::process::id()));
    let store = SqliteNegotiationStore::new(SqliteStoreConfig {
        path: db_path.clone(),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteJournalMode::Wal,
        sync_mode: SqliteSyncMode::Full,
        max_versions: Some(16),
    })?;
    store.save_session(&state)?;
    store.save_agreement(&record)?;
    write_line("Persisted", &db_path.display().to_string())?;

    let exporter = AgreementExporter::new(TextRenderer);
    let mut sink = MemorySink::new();
    let (outcome, report) =
        exporter.export_verified(&mut sink, &state, &record, Timestamp::Logical(20))?;
    write_line(
        "Dossier",
        &format!(
            "{} ({} files checked)",
            verification_label(report.status),
            report.checked_files
        ),
    )?;
    write_line("Root hash", &outcome.manifest.integrity.root_hash.value)?;

    let document = sink.read("artifacts/document")?;
    write_block(&String::from_utf8_lossy(&document))?;

    Ok(())
}

/// Formats the record digest for display.
fn digest_label(digest: Option<&str>) -> String {
    digest.map_or_else(|| "unavailable (degraded record)".to_string(), ToString::to_string)
}

/// Formats a signature's captured location for display.
fn location_label(geolocation: Option<&Geolocation>) -> String {
    geolocation.map_or_else(
        || "no fix within bound".to_string(),
        |fix| format!("{}, {}", fix.latitude, fix.longitude),
    )
}

/// Returns a stable label for the verification status.
const fn verification_label(status: VerificationStatus) -> &'static str {
    match status {
        VerificationStatus::Pass => "pass",
        VerificationStatus::Fail => "fail",
    }
}

/// Writes a labeled line to stdout.
fn write_line(label: &str, value: &str) -> Result<(), std::io::Error> {
    let mut out = std::io::stdout();
    writeln!(out, "{label}: {value}")?;
    Ok(())
}

/// Writes a raw text block to stdout.
fn write_block(text: &str) -> Result<(), std::io::Error> {
    let mut out = std::io::stdout();
    writeln!(out)?;
    writeln!(out, "{text}")?;
    Ok(())
}
