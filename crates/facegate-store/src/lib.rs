//! # facegate-store
//!
//! Durable storage of enrolled identities and their face embeddings.
//!
//! - **[`EmbeddingStore`]**: save, update, existence check, full scan, and the
//!   race-free [`enroll`](EmbeddingStore::enroll) over one `SQLite` table
//! - **[`codec`]**: the text and binary embedding encodings
//! - **[`sqlite`]**: `r2d2` pooling, pragmas, and schema migrations
//! - **[`StoreConfig`]**: open-time configuration built from settings

#![deny(unsafe_code)]

pub mod codec;
pub mod config;
pub mod errors;
pub mod sqlite;
pub mod store;

pub use codec::{EmbeddingEncoding, EncodedEmbedding};
pub use config::StoreConfig;
pub use errors::{Result, StoreError, StoreErrorKind};
pub use store::EmbeddingStore;
