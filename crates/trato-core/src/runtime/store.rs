// trato-core/src/runtime/store.rs
// ============================================================================
// Module: Trato In-Memory Stores
// Description: Simple in-memory session and agreement stores for tests and examples.
// Purpose: Provide deterministic store implementations without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides simple in-memory implementations of [`SessionStore`]
//! and [`AgreementStore`] for tests and local demos, plus shared wrappers that
//! let heterogeneous backends hide behind one clonable handle. The in-memory
//! stores are not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::agreement::AgreementRecord;
use crate::core::identifiers::SessionId;
use crate::core::state::SessionState;
use crate::interfaces::AgreementStore;
use crate::interfaces::SessionStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Session Store
// ============================================================================

/// In-memory session store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    /// Session state map protected by a mutex.
    sessions: Arc<Mutex<BTreeMap<String, SessionState>>>,
}

impl InMemorySessionStore {
    /// Creates a new in-memory session store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, session_id: &SessionId) -> Result<Option<SessionState>, StoreError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|_| StoreError::Store("session store mutex poisoned".to_string()))?;
        Ok(guard.get(session_id.as_str()).cloned())
    }

    fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Store("session store mutex poisoned".to_string()))?
            .insert(state.session_id.to_string(), state.clone());
        Ok(())
    }
}

// ============================================================================
// SECTION: In-Memory Agreement Store
// ============================================================================

/// In-memory agreement record store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAgreementStore {
    /// Agreement record map protected by a mutex.
    records: Arc<Mutex<BTreeMap<String, AgreementRecord>>>,
}

impl InMemoryAgreementStore {
    /// Creates a new in-memory agreement store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

impl AgreementStore for InMemoryAgreementStore {
    fn load(&self, session_id: &SessionId) -> Result<Option<AgreementRecord>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Store("agreement store mutex poisoned".to_string()))?;
        Ok(guard.get(session_id.as_str()).cloned())
    }

    fn save(&self, record: &AgreementRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Store("agreement store mutex poisoned".to_string()))?
            .insert(record.session_id.to_string(), record.clone());
        Ok(())
    }
}

// ============================================================================
// SECTION: Shared Store Wrappers
// ============================================================================

/// Shared session store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedSessionStore {
    /// Inner store implementation.
    inner: Arc<dyn SessionStore + Send + Sync>,
}

impl SharedSessionStore {
    /// Wraps a session store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl SessionStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn SessionStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl SessionStore for SharedSessionStore {
    fn load(&self, session_id: &SessionId) -> Result<Option<SessionState>, StoreError> {
        self.inner.load(session_id)
    }

    fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        self.inner.save(state)
    }
}

/// Shared agreement store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedAgreementStore {
    /// Inner store implementation.
    inner: Arc<dyn AgreementStore + Send + Sync>,
}

impl SharedAgreementStore {
    /// Wraps an agreement store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl AgreementStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn AgreementStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl AgreementStore for SharedAgreementStore {
    fn load(&self, session_id: &SessionId) -> Result<Option<AgreementRecord>, StoreError> {
        self.inner.load(session_id)
    }

    fn save(&self, record: &AgreementRecord) -> Result<(), StoreError> {
        self.inner.save(record)
    }
}
