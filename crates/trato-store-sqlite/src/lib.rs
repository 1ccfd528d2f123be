// trato-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Negotiation Store
// Description: Durable SessionStore and AgreementStore backend using SQLite WAL.
// Purpose: Provide production-grade persistence for Trato negotiation state.
// Dependencies: trato-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a `SQLite`-backed implementation of the Trato
//! [`SessionStore`](trato_core::SessionStore) and
//! [`AgreementStore`](trato_core::AgreementStore) interfaces. Each save
//! appends a canonical JSON snapshot to a versioned history table; loads
//! verify stored hashes and fail closed on corruption. Sealed agreement
//! records are additionally protected against rewrites that change the
//! agreed terms.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_SNAPSHOT_BYTES;
pub use store::SqliteJournalMode;
pub use store::SqliteNegotiationStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteSyncMode;
