//! # facegate-core
//!
//! Foundation types shared by every facegate crate:
//!
//! - **Identity values**: [`IdentityId`] and [`IdentityName`], validated newtypes
//!   built from raw operator input
//! - **Embeddings**: [`Embedding`], a non-empty vector of finite `f64` values
//! - **Records**: [`IdentityRecord`], the `(id, name, embedding)` enrollment unit
//! - **Errors**: [`IdentityError`] and [`EmbeddingError`] via `thiserror`
//! - **Logging**: `tracing` subscriber setup and test capture helpers

#![deny(unsafe_code)]

pub mod embedding;
pub mod errors;
pub mod identity;
pub mod logging;

pub use embedding::Embedding;
pub use errors::{EmbeddingError, IdentityError};
pub use identity::{IdentityId, IdentityName, IdentityRecord};
