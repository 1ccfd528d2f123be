// trato-core/src/lib.rs
// ============================================================================
// Module: Trato Core Library
// Description: Public API surface for the Trato negotiation core.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Trato core provides deterministic negotiation sessions, agreement sealing,
//! signature collection, and dossier generation for two-party service deals.
//! It is backend-agnostic and integrates through explicit interfaces rather
//! than embedding into any particular host application.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::AgreementStore;
pub use interfaces::Clock;
pub use interfaces::DigestError;
pub use interfaces::DigestProvider;
pub use interfaces::DocumentRenderer;
pub use interfaces::ExportArtifact;
pub use interfaces::ExportError;
pub use interfaces::ExportReader;
pub use interfaces::ExportRef;
pub use interfaces::ExportSink;
pub use interfaces::FixOutcome;
pub use interfaces::LocationSource;
pub use interfaces::PendingFix;
pub use interfaces::RenderError;
pub use interfaces::RenderedDocument;
pub use interfaces::SessionStore;
pub use interfaces::StoreError;
pub use runtime::AgreementBuilder;
pub use runtime::AgreementError;
pub use runtime::DossierBuilder;
pub use runtime::DossierError;
pub use runtime::DossierVerifier;
pub use runtime::FixedClock;
pub use runtime::InMemoryAgreementStore;
pub use runtime::InMemorySessionStore;
pub use runtime::LogicalClock;
pub use runtime::NegotiationSession;
pub use runtime::NegotiationSummary;
pub use runtime::SessionError;
pub use runtime::Sha256DigestProvider;
pub use runtime::SharedAgreementStore;
pub use runtime::SharedSessionStore;
pub use runtime::SignError;
pub use runtime::SignatureCollector;
pub use runtime::SignatureRequest;
pub use runtime::SigningConfig;
pub use runtime::SystemClock;
pub use runtime::TopicEntry;
pub use runtime::VerificationReport;
pub use runtime::VerificationStatus;
