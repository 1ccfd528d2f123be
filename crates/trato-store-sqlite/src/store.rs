// trato-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Negotiation Store
// Description: Durable SessionStore and AgreementStore backed by SQLite WAL.
// Purpose: Persist session and agreement snapshots with deterministic serialization.
// Dependencies: trato-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements durable [`SessionStore`] and [`AgreementStore`]
//! backends using `SQLite`. Each save produces a canonical JSON snapshot
//! stored in an append-only version table keyed by session. Loads verify
//! integrity via stored hashes and fail closed on corruption. Agreement
//! saves additionally refuse to rewrite a sealed record with different
//! terms; database contents are treated as untrusted input throughout.

// ============================================================================//
// SECTION: Imports
// ============================================================================//

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;
use trato_core::AgreementRecord;
use trato_core::AgreementStore;
use trato_core::SessionId;
use trato_core::SessionState;
use trato_core::SessionStore;
use trato_core::StoreError;
use trato_core::hashing::DEFAULT_HASH_ALGORITHM;
use trato_core::hashing::HashAlgorithm;
use trato_core::hashing::HashDigest;
use trato_core::hashing::canonical_json_bytes;
use trato_core::hashing::hash_bytes;

// ============================================================================//
// SECTION: Constants
// ============================================================================//

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum snapshot size accepted by the store.
pub const MAX_SNAPSHOT_BYTES: usize = 4 * 1024 * 1024;

// ============================================================================//
// SECTION: Config
// ============================================================================//

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteJournalMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteJournalMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` negotiation store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Optional maximum versions per session (older versions pruned).
    #[serde(default)]
    pub max_versions: Option<u64>,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================//
// SECTION: Errors
// ============================================================================//

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption or hash mismatch.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Store payload exceeded configured size limits.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
    /// Rewrite of a sealed agreement with different terms.
    #[error("sqlite store sealed agreement conflict for session {session_id}")]
    SealedConflict {
        /// Session whose sealed agreement was targeted.
        session_id: String,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "snapshot exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
            SqliteStoreError::SealedConflict {
                session_id,
            } => Self::Invalid(format!(
                "sealed agreement terms conflict for session {session_id}"
            )),
        }
    }
}

// ============================================================================//
// SECTION: Entity Tables
// ============================================================================//

/// Table names for one persisted entity family.
struct EntityTables {
    /// Entity label used in error messages.
    entity: &'static str,
    /// Index table holding the latest version pointer per session.
    index: &'static str,
    /// Append-only version table holding snapshots.
    versions: &'static str,
}

/// Tables persisting negotiation session snapshots.
const SESSION_TABLES: EntityTables = EntityTables {
    entity: "session",
    index: "sessions",
    versions: "session_versions",
};

/// Tables persisting agreement record snapshots.
const AGREEMENT_TABLES: EntityTables = EntityTables {
    entity: "agreement",
    index: "agreements",
    versions: "agreement_versions",
};

// ============================================================================//
// SECTION: Store
// ============================================================================//

/// `SQLite`-backed session and agreement store with WAL support.
#[derive(Clone)]
pub struct SqliteNegotiationStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteNegotiationStore {
    /// Opens an `SQLite`-backed negotiation store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Loads the latest session snapshot for the provided identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database fails, the stored hash
    /// does not match, or the payload is invalid.
    pub fn load_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<SessionState>, SqliteStoreError> {
        let Some(bytes) = self.load_snapshot(&SESSION_TABLES, session_id.as_str())? else {
            return Ok(None);
        };
        let state: SessionState = serde_json::from_slice(&bytes)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if state.session_id.as_str() != session_id.as_str() {
            return Err(SqliteStoreError::Invalid(
                "session_id mismatch between key and payload".to_string(),
            ));
        }
        Ok(Some(state))
    }

    /// Saves a session snapshot as a new version.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when serialization fails, the snapshot
    /// exceeds the size limit, or the database rejects the write.
    pub fn save_session(&self, state: &SessionState) -> Result<(), SqliteStoreError> {
        let canonical_json = canonical_json_bytes(state)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        ensure_snapshot_size(canonical_json.len())?;
        let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, &canonical_json);
        let saved_at = unix_millis();
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        append_version(
            &tx,
            &SESSION_TABLES,
            state.session_id.as_str(),
            &canonical_json,
            &digest,
            saved_at,
            self.config.max_versions,
        )?;
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(())
    }

    /// Loads the latest agreement record for the provided session.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database fails, the stored hash
    /// does not match, or the payload is invalid.
    pub fn load_agreement(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<AgreementRecord>, SqliteStoreError> {
        let Some(bytes) = self.load_snapshot(&AGREEMENT_TABLES, session_id.as_str())? else {
            return Ok(None);
        };
        let record: AgreementRecord = serde_json::from_slice(&bytes)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if record.session_id.as_str() != session_id.as_str() {
            return Err(SqliteStoreError::Invalid(
                "session_id mismatch between key and payload".to_string(),
            ));
        }
        Ok(Some(record))
    }

    /// Saves an agreement record as a new version.
    ///
    /// When the latest stored record is sealed, the incoming record must
    /// carry identical terms; signature completion and idempotent re-saves
    /// remain allowed.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when serialization fails, the snapshot
    /// exceeds the size limit, the stored baseline is corrupt, or the save
    /// would rewrite sealed terms.
    pub fn save_agreement(&self, record: &AgreementRecord) -> Result<(), SqliteStoreError> {
        let canonical_json = canonical_json_bytes(record)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        ensure_snapshot_size(canonical_json.len())?;
        let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, &canonical_json);
        let saved_at = unix_millis();
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let latest = read_latest(&tx, &AGREEMENT_TABLES, record.session_id.as_str())?;
        if let Some((bytes, hash_value, hash_algorithm)) = latest {
            verify_snapshot(
                AGREEMENT_TABLES.entity,
                record.session_id.as_str(),
                &bytes,
                &hash_value,
                &hash_algorithm,
            )?;
            let stored: AgreementRecord = serde_json::from_slice(&bytes)
                .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
            if stored.is_sealed() && stored.terms != record.terms {
                return Err(SqliteStoreError::SealedConflict {
                    session_id: record.session_id.to_string(),
                });
            }
        }
        append_version(
            &tx,
            &AGREEMENT_TABLES,
            record.session_id.as_str(),
            &canonical_json,
            &digest,
            saved_at,
            self.config.max_versions,
        )?;
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(())
    }

    /// Loads and hash-verifies the latest snapshot bytes for one entity.
    fn load_snapshot(
        &self,
        tables: &EntityTables,
        session_id: &str,
    ) -> Result<Option<Vec<u8>>, SqliteStoreError> {
        let row = {
            let mut guard = self
                .connection
                .lock()
                .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
            let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let row = read_latest(&tx, tables, session_id)?;
            tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            drop(guard);
            row
        };
        let Some((bytes, hash_value, hash_algorithm)) = row else {
            return Ok(None);
        };
        verify_snapshot(tables.entity, session_id, &bytes, &hash_value, &hash_algorithm)?;
        Ok(Some(bytes))
    }
}

impl SessionStore for SqliteNegotiationStore {
    fn load(&self, session_id: &SessionId) -> Result<Option<SessionState>, StoreError> {
        self.load_session(session_id).map_err(StoreError::from)
    }

    fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        self.save_session(state).map_err(StoreError::from)
    }
}

impl AgreementStore for SqliteNegotiationStore {
    fn load(&self, session_id: &SessionId) -> Result<Option<AgreementRecord>, StoreError> {
        self.load_agreement(session_id).map_err(StoreError::from)
    }

    fn save(&self, record: &AgreementRecord) -> Result<(), StoreError> {
        self.save_agreement(record).map_err(StoreError::from)
    }
}

// ============================================================================//
// SECTION: Snapshot Helpers
// ============================================================================//

/// Rejects snapshots above the configured size limit.
const fn ensure_snapshot_size(actual_bytes: usize) -> Result<(), SqliteStoreError> {
    if actual_bytes > MAX_SNAPSHOT_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_SNAPSHOT_BYTES,
            actual_bytes,
        });
    }
    Ok(())
}

/// Reads the latest snapshot row for one entity, enforcing size limits.
fn read_latest(
    tx: &rusqlite::Transaction<'_>,
    tables: &EntityTables,
    session_id: &str,
) -> Result<Option<(Vec<u8>, String, String)>, SqliteStoreError> {
    let latest_sql =
        format!("SELECT latest_version FROM {} WHERE session_id = ?1", tables.index);
    let latest_version: Option<i64> = tx
        .query_row(&latest_sql, params![session_id], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let Some(latest_version) = latest_version else {
        return Ok(None);
    };
    if latest_version < 1 {
        return Err(SqliteStoreError::Corrupt(format!(
            "invalid latest_version for {} {session_id}",
            tables.entity
        )));
    }
    let metadata_sql = format!(
        "SELECT length(snapshot_json), snapshot_hash, hash_algorithm FROM {} WHERE session_id = \
         ?1 AND version = ?2",
        tables.versions
    );
    let metadata = tx
        .query_row(&metadata_sql, params![session_id, latest_version], |row| {
            let length: i64 = row.get(0)?;
            let hash: String = row.get(1)?;
            let algorithm: String = row.get(2)?;
            Ok((length, hash, algorithm))
        })
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let Some((length, hash, algorithm)) = metadata else {
        return Err(SqliteStoreError::Corrupt(format!(
            "missing {} version {latest_version} for session {session_id}",
            tables.entity
        )));
    };
    let length_usize = usize::try_from(length).map_err(|_| {
        SqliteStoreError::Invalid(format!(
            "negative snapshot length for {} {session_id}",
            tables.entity
        ))
    })?;
    if length_usize > MAX_SNAPSHOT_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_SNAPSHOT_BYTES,
            actual_bytes: length_usize,
        });
    }
    let payload_sql = format!(
        "SELECT snapshot_json FROM {} WHERE session_id = ?1 AND version = ?2",
        tables.versions
    );
    let bytes: Vec<u8> = tx
        .query_row(&payload_sql, params![session_id, latest_version], |row| row.get(0))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(Some((bytes, hash, algorithm)))
}

/// Appends a snapshot version and advances the latest version pointer.
fn append_version(
    tx: &rusqlite::Transaction<'_>,
    tables: &EntityTables,
    session_id: &str,
    canonical_json: &[u8],
    digest: &HashDigest,
    saved_at: i64,
    max_versions: Option<u64>,
) -> Result<(), SqliteStoreError> {
    let latest_sql =
        format!("SELECT latest_version FROM {} WHERE session_id = ?1", tables.index);
    let latest_version: Option<i64> = tx
        .query_row(&latest_sql, params![session_id], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let next_version = match latest_version {
        None => 1,
        Some(value) => {
            if value < 1 {
                return Err(SqliteStoreError::Corrupt(format!(
                    "invalid latest_version for {} {session_id}",
                    tables.entity
                )));
            }
            value.checked_add(1).ok_or_else(|| {
                SqliteStoreError::Corrupt(format!(
                    "snapshot version overflow for {} {session_id}",
                    tables.entity
                ))
            })?
        }
    };
    let upsert_sql = format!(
        "INSERT INTO {} (session_id, latest_version) VALUES (?1, ?2) ON CONFLICT(session_id) DO \
         UPDATE SET latest_version = excluded.latest_version",
        tables.index
    );
    tx.execute(&upsert_sql, params![session_id, next_version])
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let insert_sql = format!(
        "INSERT INTO {} (session_id, version, snapshot_json, snapshot_hash, hash_algorithm, \
         saved_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        tables.versions
    );
    tx.execute(
        &insert_sql,
        params![
            session_id,
            next_version,
            canonical_json,
            digest.value,
            hash_algorithm_label(digest.algorithm),
            saved_at
        ],
    )
    .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    enforce_retention(tx, tables, session_id, next_version, max_versions)?;
    Ok(())
}

/// Verifies a snapshot against its stored hash, failing closed on mismatch.
fn verify_snapshot(
    entity: &'static str,
    session_id: &str,
    bytes: &[u8],
    hash_value: &str,
    algorithm_label: &str,
) -> Result<(), SqliteStoreError> {
    let algorithm = parse_hash_algorithm(algorithm_label)?;
    let expected = hash_bytes(algorithm, bytes);
    if expected.value != hash_value {
        return Err(SqliteStoreError::Corrupt(format!(
            "hash mismatch for {entity} {session_id}"
        )));
    }
    Ok(())
}

/// Enforces version retention if configured.
fn enforce_retention(
    tx: &rusqlite::Transaction<'_>,
    tables: &EntityTables,
    session_id: &str,
    latest_version: i64,
    max_versions: Option<u64>,
) -> Result<(), SqliteStoreError> {
    let Some(max_versions) = max_versions else {
        return Ok(());
    };
    if max_versions == 0 {
        return Err(SqliteStoreError::Invalid(
            "max_versions must be greater than zero".to_string(),
        ));
    }
    let max_versions = i64::try_from(max_versions)
        .map_err(|_| SqliteStoreError::Invalid("max_versions too large".to_string()))?;
    if latest_version > max_versions {
        let min_version = latest_version - max_versions + 1;
        let delete_sql = format!(
            "DELETE FROM {} WHERE session_id = ?1 AND version < ?2",
            tables.versions
        );
        tx.execute(&delete_sql, params![session_id, min_version])
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    }
    Ok(())
}

// ============================================================================//
// SECTION: Connection Helpers
// ============================================================================//

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    session_id TEXT PRIMARY KEY,
                    latest_version INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS session_versions (
                    session_id TEXT NOT NULL,
                    version INTEGER NOT NULL,
                    snapshot_json BLOB NOT NULL,
                    snapshot_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL,
                    saved_at INTEGER NOT NULL,
                    PRIMARY KEY (session_id, version),
                    FOREIGN KEY (session_id) REFERENCES sessions(session_id) ON DELETE CASCADE
                );
                CREATE INDEX IF NOT EXISTS idx_session_versions_session_id
                    ON session_versions (session_id);
                CREATE TABLE IF NOT EXISTS agreements (
                    session_id TEXT PRIMARY KEY,
                    latest_version INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS agreement_versions (
                    session_id TEXT NOT NULL,
                    version INTEGER NOT NULL,
                    snapshot_json BLOB NOT NULL,
                    snapshot_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL,
                    saved_at INTEGER NOT NULL,
                    PRIMARY KEY (session_id, version),
                    FOREIGN KEY (session_id) REFERENCES agreements(session_id) ON DELETE CASCADE
                );
                CREATE INDEX IF NOT EXISTS idx_agreement_versions_session_id
                    ON agreement_versions (session_id);",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

/// Returns the canonical hash algorithm label.
const fn hash_algorithm_label(algorithm: HashAlgorithm) -> &'static str {
    match algorithm {
        HashAlgorithm::Sha256 => "sha256",
    }
}

/// Parses a hash algorithm label.
fn parse_hash_algorithm(label: &str) -> Result<HashAlgorithm, SqliteStoreError> {
    match label {
        "sha256" => Ok(HashAlgorithm::Sha256),
        other => Err(SqliteStoreError::Invalid(format!("unsupported hash algorithm: {other}"))),
    }
}
