// crates/trato-export/tests/common/mod.rs
// ============================================================================
// Module: Export Test Fixtures
// Description: Shared fixtures and writer doubles for export tests.
// ============================================================================

//! Shared helpers for export sink and exporter tests.

use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;

use trato_core::AgreementBuilder;
use trato_core::AgreementRecord;
use trato_core::ArtifactKind;
use trato_core::DossierBuilder;
use trato_core::DossierManifest;
use trato_core::ExportArtifact;
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
use trato_export::MemorySink;
use trato_providers::FixedLocationSource;

// ============================================================================
// SECTION: Session Fixtures
// ============================================================================

/// Sample coordinates recorded on fixture signatures.
pub fn sample_fix() -> Geolocation {
    Geolocation {
        latitude: -23.55,
        longitude: -46.63,
    }
}

/// Builds the session specification used by export fixtures.
pub fn sample_spec(session_id: &str) -> SessionSpec {
    SessionSpec {
        session_id: SessionId::new(session_id),
        provider: PartyId::new("prov-1"),
        client: PartyId::new("cli-1"),
        topics: vec![
            TopicSpec {
                key: TopicKey::new("price"),
                label: "Preço".to_string(),
                description: "Valor total do serviço".to_string(),
                initial_value: Some("1500".to_string()),
            },
            TopicSpec {
                key: TopicKey::new("deadline"),
                label: "Prazo".to_string(),
                description: "Data de conclusão".to_string(),
                initial_value: None,
            },
            TopicSpec {
                key: TopicKey::new("finalize"),
                label: "Formalização".to_string(),
                description: String::new(),
                initial_value: None,
            },
        ],
    }
}

/// Negotiates, finalizes, and seals a fixture agreement.
pub fn sealed_fixture(session_id: &str) -> (trato_core::SessionState, AgreementRecord) {
    let spec = sample_spec(session_id);
    let mut session = NegotiationSession::open(&spec, LogicalClock::new()).expect("open");
    session.propose(&TopicKey::new("deadline"), "2026-10-01", Party::Provider).expect("propose");
    session.accept(&TopicKey::new("price"), Party::Client).expect("accept price");
    session.accept(&TopicKey::new("deadline"), Party::Client).expect("accept deadline");
    let mut record = session.finalize(&AgreementBuilder::default()).expect("finalize");

    let collector = SignatureCollector::new(
        LogicalClock::new(),
        FixedLocationSource::new(sample_fix()),
        SigningConfig::default(),
    );
    collector
        .sign(
            &mut record,
            &SignatureRequest {
                party: Party::Provider,
                typed_name: "Ana Prestadora".to_string(),
                user_agent: "trato-tests/1.0".to_string(),
            },
        )
        .expect("provider signs");
    collector
        .sign(
            &mut record,
            &SignatureRequest {
                party: Party::Client,
                typed_name: "Bruno Cliente".to_string(),
                user_agent: "trato-tests/1.0".to_string(),
            },
        )
        .expect("client signs");

    (session.into_state(), record)
}

/// Builds a manifest by exporting a sealed fixture into a scratch sink.
pub fn sample_manifest() -> DossierManifest {
    let (state, record) = sealed_fixture("neg-manifest");
    let mut sink = MemorySink::new();
    DossierBuilder::default()
        .build(&mut sink, &state, &record, Timestamp::Logical(7))
        .expect("build manifest")
}

// ============================================================================
// SECTION: Artifact Fixtures
// ============================================================================

/// Builds a standalone artifact for sink unit tests.
pub fn sample_artifact(path: &str, bytes: &[u8]) -> ExportArtifact {
    ExportArtifact {
        kind: ArtifactKind::Custom,
        path: path.to_string(),
        content_type: Some("application/octet-stream".to_string()),
        bytes: bytes.to_vec(),
        required: true,
    }
}

// ============================================================================
// SECTION: Writer Doubles
// ============================================================================

/// Shared in-memory writer capturing log sink output.
#[derive(Debug, Default, Clone)]
pub struct SharedBuffer {
    /// Captured bytes shared across clones.
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates an empty shared buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured output as a lossy UTF-8 string.
    pub fn to_string_lossy(&self) -> String {
        self.inner.lock().map_or_else(
            |_| String::new(),
            |guard| String::from_utf8_lossy(guard.as_slice()).into_owned(),
        )
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.inner.lock() {
            Ok(mut guard) => {
                guard.extend_from_slice(buf);
                Ok(buf.len())
            }
            Err(_) => Err(io::Error::other("buffer mutex poisoned")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer double that fails every write.
#[derive(Debug, Clone, Copy)]
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("write failed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
