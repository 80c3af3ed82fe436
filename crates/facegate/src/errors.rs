//! Facade errors.

use facegate_core::{EmbeddingError, IdentityError};
use facegate_matcher::MatcherError;
use facegate_store::StoreError;
use thiserror::Error;

/// Why a [`Facegate`](crate::Facegate) could not be opened.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The store could not be opened.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The configured tolerance is unusable.
    #[error(transparent)]
    Matcher(#[from] MatcherError),
}

/// Why an enrollment was refused.
#[derive(Debug, Error)]
pub enum EnrollError {
    /// The id or name input is invalid.
    #[error("invalid identity: {0}")]
    Identity(#[from] IdentityError),
    /// The embedding is empty or has non-finite values.
    #[error("invalid embedding: {0}")]
    Embedding(#[from] EmbeddingError),
    /// The store refused or failed the write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why a query could not be matched.
#[derive(Debug, Error)]
pub enum IdentifyError {
    /// The query is empty or has non-finite values.
    #[error("invalid query: {0}")]
    Embedding(#[from] EmbeddingError),
    /// The query length differs from the store's configured dimensions.
    #[error("query has {actual} values, store expects {expected}")]
    DimensionMismatch {
        /// Configured embedding length.
        expected: usize,
        /// Length of the query.
        actual: usize,
    },
}
