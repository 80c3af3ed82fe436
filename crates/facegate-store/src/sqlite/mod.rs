//! `SQLite` backend for the embedding store.
//!
//! - **[`connection`]**: `r2d2` connection pool with WAL mode and a busy
//!   timeout applied to every connection.
//! - **[`migrations`]**: Version-tracked schema evolution, embedded at
//!   compile time and run transactionally when a store opens.

pub mod connection;
pub mod migrations;

pub use connection::{
    ConnectionConfig, ConnectionPool, PooledConnection, PragmaState, new_file, new_in_memory,
    verify_pragmas,
};
pub use migrations::{current_version, latest_version, run_migrations};
