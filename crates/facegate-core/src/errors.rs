//! Validation errors for identity values and embeddings.
//!
//! These are raised while building the core value types from untrusted
//! input, before anything reaches the store.

use thiserror::Error;

/// Invalid identity id or name.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The id was empty after trimming.
    #[error("identity id must not be empty")]
    EmptyId,

    /// The id contained a non-digit character.
    #[error("identity id must contain only digits: {0:?}")]
    NonNumericId(String),

    /// The id does not fit the store's integer key.
    #[error("identity id out of range: {0}")]
    IdOutOfRange(String),

    /// The name was empty after trimming.
    #[error("identity name must not be empty")]
    EmptyName,

    /// The name contained something other than letters and spaces.
    #[error("identity name must contain only letters and spaces: {0:?}")]
    InvalidName(String),
}

/// Invalid embedding vector.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EmbeddingError {
    /// The vector had no elements.
    #[error("embedding must not be empty")]
    Empty,

    /// An element was NaN or infinite.
    #[error("embedding value at index {index} is not finite")]
    NonFinite {
        /// Position of the first offending element.
        index: usize,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
