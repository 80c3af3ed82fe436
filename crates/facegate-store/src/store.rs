//! The embedding store: persistence of `(id, name, embedding)` records.
//!
//! Writes report failures as [`StoreError`]; the two lookup reads
//! ([`EmbeddingStore::exists`] and [`EmbeddingStore::scan_all`]) fail open,
//! logging a warning and returning `false` / an empty list when the backend
//! is unavailable.

use facegate_core::{Embedding, IdentityId, IdentityName, IdentityRecord};
use facegate_settings::EmbeddingEncoding;
use rusqlite::{Connection, ErrorCode, Row, TransactionBehavior, params};
use tracing::{debug, info, warn};

use crate::codec::{self, EncodedEmbedding};
use crate::config::StoreConfig;
use crate::errors::{Result, StoreError};
use crate::sqlite::{self, ConnectionPool, PooledConnection};

/// `store_meta` key holding the deployment's embedding encoding.
const ENCODING_KEY: &str = "embedding_encoding";

/// Persistent embedding store backed by an `r2d2` `SQLite` pool.
///
/// `Send + Sync`; each operation checks out a connection for its own
/// duration only.
pub struct EmbeddingStore {
    pool: ConnectionPool,
    encoding: EmbeddingEncoding,
    dimensions: Option<usize>,
}

impl std::fmt::Debug for EmbeddingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingStore")
            .field("encoding", &self.encoding)
            .field("dimensions", &self.dimensions)
            .field("pool_size", &self.pool.max_size())
            .finish_non_exhaustive()
    }
}

impl EmbeddingStore {
    /// Open (creating if needed) the database file named in `config`.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        info!(
            path = %config.database_path.display(),
            encoding = %config.encoding,
            "opening embedding store"
        );
        let pool = sqlite::new_file(&config.database_path, &config.connection)?;
        Self::new(pool, config)
    }

    /// Open a private in-memory database. `config.database_path` is ignored.
    pub fn open_in_memory(config: &StoreConfig) -> Result<Self> {
        let pool = sqlite::new_in_memory(&config.connection)?;
        Self::new(pool, config)
    }

    /// Wrap an existing pool: run migrations and pin or verify the encoding.
    pub fn new(pool: ConnectionPool, config: &StoreConfig) -> Result<Self> {
        {
            let conn = pool.get().map_err(StoreError::connect)?;
            let _ = sqlite::run_migrations(&conn)?;
            ensure_encoding(&conn, config.encoding)?;
        }
        Ok(Self {
            pool,
            encoding: config.encoding,
            dimensions: config.dimensions,
        })
    }

    /// The encoding in force for this database.
    pub fn encoding(&self) -> EmbeddingEncoding {
        self.encoding
    }

    /// The enforced embedding length, if any.
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    /// Insert one record.
    ///
    /// Relies on the table constraints alone, so a duplicate id or name is a
    /// [`StoreError::WriteFailed`]. Use [`enroll`](Self::enroll) for a
    /// race-free check-and-insert.
    pub fn save(&self, id: IdentityId, name: &IdentityName, embedding: &Embedding) -> Result<()> {
        self.check_dimensions(embedding)?;
        let encoded = codec::encode(self.encoding, embedding);
        self.try_save(id, name, &encoded).inspect_err(|e| {
            warn!(identity_id = %id, error = %e, "embedding save failed");
        })?;
        debug!(identity_id = %id, identity_name = %name, dims = embedding.len(), "embedding saved");
        Ok(())
    }

    /// Replace name and embedding of the record with `id`.
    ///
    /// Succeeds without effect when no record has `id`. A new name taken by
    /// another record is a [`StoreError::WriteFailed`].
    pub fn update(&self, id: IdentityId, name: &IdentityName, embedding: &Embedding) -> Result<()> {
        self.check_dimensions(embedding)?;
        let encoded = codec::encode(self.encoding, embedding);
        let changed = self.try_update(id, name, &encoded).inspect_err(|e| {
            warn!(identity_id = %id, error = %e, "embedding update failed");
        })?;
        if changed == 0 {
            debug!(identity_id = %id, "update matched no record");
        } else {
            debug!(identity_id = %id, identity_name = %name, "embedding updated");
        }
        Ok(())
    }

    /// Whether any record has this id **or** this name.
    ///
    /// Returns `false` (with a warning) if the backend cannot answer.
    pub fn exists(&self, id: IdentityId, name: &IdentityName) -> bool {
        let answer = self
            .conn()
            .map_err(StoreError::read)
            .and_then(|conn| identity_taken(&conn, id, name).map_err(StoreError::read));
        match answer {
            Ok(taken) => taken,
            Err(e) => {
                warn!(identity_id = %id, error = %e, "existence check failed, reporting absent");
                false
            }
        }
    }

    /// Every decodable record, in ascending id order.
    ///
    /// Undecodable rows are skipped with a warning. Returns an empty list
    /// (with a warning) if the backend cannot be read.
    pub fn scan_all(&self) -> Vec<IdentityRecord> {
        match self.try_scan_all() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "embedding scan failed, returning no records");
                Vec::new()
            }
        }
    }

    /// Check-and-insert under one write lock.
    ///
    /// The existence check and the insert share a `BEGIN IMMEDIATE`
    /// transaction, so of several concurrent enrollers for the same id or
    /// name exactly one succeeds and the rest get
    /// [`StoreError::AlreadyEnrolled`].
    pub fn enroll(&self, id: IdentityId, name: &IdentityName, embedding: &Embedding) -> Result<()> {
        self.check_dimensions(embedding)?;
        let encoded = codec::encode(self.encoding, embedding);
        match self.try_enroll(id, name, &encoded) {
            Ok(()) => {
                info!(identity_id = %id, identity_name = %name, "identity enrolled");
                Ok(())
            }
            Err(e @ StoreError::AlreadyEnrolled { .. }) => {
                debug!(identity_id = %id, identity_name = %name, "enrollment rejected, identity taken");
                Err(e)
            }
            Err(e) => {
                warn!(identity_id = %id, error = %e, "enrollment failed");
                Err(e)
            }
        }
    }

    /// Number of stored records.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn().map_err(StoreError::read)?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM face_embeddings", [], |row| row.get(0))
            .map_err(StoreError::read)?;
        Ok(count as usize)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internal
    // ─────────────────────────────────────────────────────────────────────

    fn conn(&self) -> std::result::Result<PooledConnection, r2d2::Error> {
        self.pool.get()
    }

    fn check_dimensions(&self, embedding: &Embedding) -> Result<()> {
        match self.dimensions {
            Some(expected) if embedding.len() != expected => Err(StoreError::corrupt(format!(
                "embedding has {} values, store requires {expected}",
                embedding.len()
            ))),
            _ => Ok(()),
        }
    }

    fn try_save(&self, id: IdentityId, name: &IdentityName, encoded: &EncodedEmbedding) -> Result<()> {
        let conn = self.conn().map_err(StoreError::write)?;
        let tx = conn.unchecked_transaction().map_err(StoreError::write)?;
        let _ = tx
            .execute(
                "INSERT INTO face_embeddings (identity_id, identity_name, embedding) VALUES (?1, ?2, ?3)",
                params![id.to_sql_key(), name.as_str(), encoded],
            )
            .map_err(StoreError::write)?;
        tx.commit().map_err(StoreError::write)
    }

    fn try_update(
        &self,
        id: IdentityId,
        name: &IdentityName,
        encoded: &EncodedEmbedding,
    ) -> Result<usize> {
        let conn = self.conn().map_err(StoreError::write)?;
        let tx = conn.unchecked_transaction().map_err(StoreError::write)?;
        let changed = tx
            .execute(
                "UPDATE face_embeddings SET identity_name = ?2, embedding = ?3 WHERE identity_id = ?1",
                params![id.to_sql_key(), name.as_str(), encoded],
            )
            .map_err(StoreError::write)?;
        tx.commit().map_err(StoreError::write)?;
        Ok(changed)
    }

    fn try_enroll(
        &self,
        id: IdentityId,
        name: &IdentityName,
        encoded: &EncodedEmbedding,
    ) -> Result<()> {
        let mut conn = self.conn().map_err(StoreError::write)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::write)?;

        let already_enrolled = || StoreError::AlreadyEnrolled {
            id,
            name: name.clone(),
        };

        if identity_taken(&tx, id, name).map_err(StoreError::write)? {
            return Err(already_enrolled());
        }
        match tx.execute(
            "INSERT INTO face_embeddings (identity_id, identity_name, embedding) VALUES (?1, ?2, ?3)",
            params![id.to_sql_key(), name.as_str(), encoded],
        ) {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => return Err(already_enrolled()),
            Err(e) => return Err(StoreError::write(e)),
        }
        tx.commit().map_err(StoreError::write)
    }

    fn try_scan_all(&self) -> Result<Vec<IdentityRecord>> {
        let conn = self.conn().map_err(StoreError::read)?;
        let mut stmt = conn
            .prepare(
                "SELECT identity_id, identity_name, embedding FROM face_embeddings ORDER BY rowid",
            )
            .map_err(StoreError::read)?;
        let mut rows = stmt.query([]).map_err(StoreError::read)?;

        let mut records = Vec::new();
        let mut skipped = 0_usize;
        while let Some(row) = rows.next().map_err(StoreError::read)? {
            match self.decode_row(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    let raw_id = row.get::<_, i64>(0).ok();
                    warn!(?raw_id, error = %e, "skipping undecodable embedding record");
                }
            }
        }
        debug!(records = records.len(), skipped, "embedding scan complete");
        Ok(records)
    }

    fn decode_row(&self, row: &Row<'_>) -> Result<IdentityRecord> {
        let raw_id: i64 = row.get(0).map_err(StoreError::corrupt)?;
        let raw_name: String = row.get(1).map_err(StoreError::corrupt)?;
        let identity_id = IdentityId::from_sql_key(raw_id).map_err(StoreError::corrupt)?;
        let identity_name = IdentityName::parse(&raw_name).map_err(StoreError::corrupt)?;
        let value = row.get_ref(2).map_err(StoreError::corrupt)?;
        let embedding = codec::decode(self.encoding, value)?;
        Ok(IdentityRecord::new(identity_id, identity_name, embedding))
    }
}

fn identity_taken(conn: &Connection, id: IdentityId, name: &IdentityName) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM face_embeddings WHERE identity_id = ?1 OR identity_name = ?2)",
        params![id.to_sql_key(), name.as_str()],
        |row| row.get(0),
    )
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Record the encoding on first open; reject a different one afterwards.
fn ensure_encoding(conn: &Connection, configured: EmbeddingEncoding) -> Result<()> {
    let _ = conn
        .execute(
            "INSERT OR IGNORE INTO store_meta (key, value) VALUES (?1, ?2)",
            params![ENCODING_KEY, configured.as_str()],
        )
        .map_err(StoreError::connect)?;
    let stored: String = conn
        .query_row(
            "SELECT value FROM store_meta WHERE key = ?1",
            params![ENCODING_KEY],
            |row| row.get(0),
        )
        .map_err(StoreError::connect)?;
    if stored == configured.as_str() {
        Ok(())
    } else {
        Err(StoreError::EncodingMismatch { stored, configured })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
