// trato-core/src/runtime/mod.rs
// ============================================================================
// Module: Trato Runtime
// Description: Negotiation engine, agreement sealing, signing, and dossier helpers.
// Purpose: Execute negotiation sessions against host-supplied interfaces.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the negotiation session state machine, agreement
//! record construction, signature collection, and dossier generation and
//! verification. All host surfaces must call into the same session logic so
//! the ledger and timeline invariants hold no matter who drives the session.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod agreement;
pub mod clock;
pub mod dossier;
pub mod session;
pub mod signing;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use agreement::AgreementBuilder;
pub use agreement::AgreementError;
pub use agreement::Sha256DigestProvider;
pub use clock::FixedClock;
pub use clock::LogicalClock;
pub use clock::SystemClock;
pub use dossier::DossierBuilder;
pub use dossier::DossierError;
pub use dossier::DossierVerifier;
pub use dossier::VerificationReport;
pub use dossier::VerificationStatus;
pub use session::NegotiationSession;
pub use session::NegotiationSummary;
pub use session::SessionError;
pub use session::TopicEntry;
pub use signing::SignError;
pub use signing::SignatureCollector;
pub use signing::SignatureRequest;
pub use signing::SigningConfig;
pub use store::InMemoryAgreementStore;
pub use store::InMemorySessionStore;
pub use store::SharedAgreementStore;
pub use store::SharedSessionStore;
