// trato-core/src/core/mod.rs
// ============================================================================
// Module: Trato Core Types
// Description: Canonical negotiation schema and session state structures.
// Purpose: Provide stable, serializable types for sessions, agreements, and dossiers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Trato core types define session specifications, topic and timeline state,
//! agreement records, and dossier manifests. These types are the canonical
//! source of truth for any derived API surfaces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod agreement;
pub mod dossier;
pub mod errors;
pub mod hashing;
pub mod identifiers;
pub mod party;
pub mod spec;
pub mod state;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use agreement::AgreementRecord;
pub use agreement::Geolocation;
pub use agreement::Signature;
pub use agreement::TermsSnapshot;
pub use dossier::ArtifactKind;
pub use dossier::ArtifactRecord;
pub use dossier::DossierIntegrity;
pub use dossier::DossierManifest;
pub use dossier::DossierVersion;
pub use dossier::FileHashEntry;
pub use errors::NotFoundError;
pub use errors::PreconditionError;
pub use errors::ValidationError;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use hashing::canonical_json_bytes;
pub use hashing::hash_bytes;
pub use hashing::hash_canonical_json;
pub use hashing::normalize_text;
pub use identifiers::FINALIZE_TOPIC_KEY;
pub use identifiers::MessageId;
pub use identifiers::PartyId;
pub use identifiers::SessionId;
pub use identifiers::TopicKey;
pub use identifiers::is_finalize_topic;
pub use party::Party;
pub use party::Sender;
pub use spec::SessionSpec;
pub use spec::SpecError;
pub use spec::TopicSpec;
pub use state::Message;
pub use state::SessionState;
pub use state::SessionStatus;
pub use state::Topic;
pub use state::TopicState;
pub use time::Timestamp;
