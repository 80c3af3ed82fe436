//! `SQLite` connection pool with WAL mode and a bounded busy wait.
//!
//! Uses `r2d2` connection pooling with the `r2d2_sqlite` backend. The
//! [`PragmaCustomizer`] runs on each new connection so every connection
//! shares the same journal mode and lock-wait behavior.
//!
//! An in-memory database lives and dies with its connection, so in-memory
//! pools hold exactly one connection that is never recycled.

use std::path::Path;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::errors::{Result, StoreError};

/// Alias for the connection pool type.
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Alias for a pooled connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Configuration for the connection pool.
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// Maximum pool size (default: 4). Ignored for in-memory pools.
    pub pool_size: u32,
    /// Busy timeout in milliseconds (default: 5000).
    pub busy_timeout_ms: u32,
    /// Maximum wait for a free pooled connection (default: 5s).
    pub connection_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            pool_size: 4,
            busy_timeout_ms: 5_000,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

/// `SQLite` pragma customizer that runs on each new connection.
#[derive(Debug)]
struct PragmaCustomizer {
    busy_timeout_ms: u32,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {};\
             PRAGMA journal_mode = WAL;\
             PRAGMA synchronous = NORMAL;",
            self.busy_timeout_ms
        ))?;
        Ok(())
    }
}

/// Create an in-memory connection pool.
pub fn new_in_memory(config: &ConnectionConfig) -> Result<ConnectionPool> {
    let manager = SqliteConnectionManager::memory();
    Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connection_timeout(config.connection_timeout)
        .connection_customizer(Box::new(PragmaCustomizer {
            busy_timeout_ms: config.busy_timeout_ms,
        }))
        .build(manager)
        .map_err(StoreError::connect)
}

/// Create a file-backed connection pool, creating the parent directory if
/// needed.
pub fn new_file(path: &Path, config: &ConnectionConfig) -> Result<ConnectionPool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            StoreError::connect(format!("cannot create {}: {e}", parent.display()))
        })?;
    }
    let manager = SqliteConnectionManager::file(path);
    Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(config.connection_timeout)
        .connection_customizer(Box::new(PragmaCustomizer {
            busy_timeout_ms: config.busy_timeout_ms,
        }))
        .build(manager)
        .map_err(StoreError::connect)
}

/// Read back the pragmas the customizer sets.
pub fn verify_pragmas(conn: &Connection) -> Result<PragmaState> {
    let journal_mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .map_err(StoreError::read)?;
    let busy_timeout_ms: u32 = conn
        .query_row("PRAGMA busy_timeout", [], |row| row.get(0))
        .map_err(StoreError::read)?;
    Ok(PragmaState {
        journal_mode,
        busy_timeout_ms,
    })
}

/// Pragma state for verification.
#[derive(Debug)]
pub struct PragmaState {
    /// Journal mode (`wal` on disk, `memory` in memory).
    pub journal_mode: String,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn in_memory_pool_creates_successfully() {
        let pool = new_in_memory(&ConnectionConfig::default()).unwrap();
        let conn = pool.get().unwrap();
        let pragmas = verify_pragmas(&conn).unwrap();
        assert_eq!(pragmas.journal_mode, "memory");
        assert_eq!(pragmas.busy_timeout_ms, 5_000);
    }

    #[test]
    fn in_memory_pool_is_single_connection() {
        let config = ConnectionConfig {
            pool_size: 8,
            ..Default::default()
        };
        let pool = new_in_memory(&config).unwrap();
        assert_eq!(pool.max_size(), 1);
    }

    #[test]
    fn in_memory_pool_keeps_data_across_checkouts() {
        let pool = new_in_memory(&ConnectionConfig::default()).unwrap();
        {
            let conn = pool.get().unwrap();
            conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1);")
                .unwrap();
        }
        let conn = pool.get().unwrap();
        let x: i64 = conn.query_row("SELECT x FROM t", [], |r| r.get(0)).unwrap();
        assert_eq!(x, 1);
    }

    #[test]
    fn file_pool_creates_successfully() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("faces.db");
        let config = ConnectionConfig {
            busy_timeout_ms: 250,
            ..Default::default()
        };
        let pool = new_file(&path, &config).unwrap();
        let conn = pool.get().unwrap();
        let pragmas = verify_pragmas(&conn).unwrap();
        assert_eq!(pragmas.journal_mode, "wal");
        assert_eq!(pragmas.busy_timeout_ms, 250);
        assert!(path.exists());
    }

    #[test]
    fn file_pool_honors_size() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConnectionConfig {
            pool_size: 3,
            ..Default::default()
        };
        let pool = new_file(&dir.path().join("faces.db"), &config).unwrap();
        assert_eq!(pool.max_size(), 3);
        let conns: Vec<_> = (0..3).map(|_| pool.get().unwrap()).collect();
        assert_eq!(conns.len(), 3);
    }

    #[test]
    fn unopenable_path_is_connect_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let config = ConnectionConfig {
            connection_timeout: Duration::from_millis(200),
            ..Default::default()
        };
        assert_matches!(
            new_file(&blocker.join("faces.db"), &config),
            Err(StoreError::ConnectFailed(msg)) if msg.contains("not-a-dir")
        );
    }

    #[test]
    fn default_config_values() {
        let config = ConnectionConfig::default();
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.busy_timeout_ms, 5_000);
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
    }
}
