//! The [`Embedding`] vector type.

use serde::{Deserialize, Serialize};

use crate::errors::EmbeddingError;

/// A face embedding: a non-empty, ordered vector of finite `f64` values.
///
/// The length is fixed by whichever feature-extraction model produced it
/// (128 for the usual dlib model) but is not fixed by this type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Embedding(Vec<f64>);

impl Embedding {
    /// Build an embedding, rejecting empty vectors and non-finite values.
    pub fn new(values: Vec<f64>) -> Result<Self, EmbeddingError> {
        if values.is_empty() {
            return Err(EmbeddingError::Empty);
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(EmbeddingError::NonFinite { index });
        }
        Ok(Self(values))
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the values.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Consume and return the inner vector.
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl TryFrom<Vec<f64>> for Embedding {
    type Error = EmbeddingError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Embedding> for Vec<f64> {
    fn from(e: Embedding) -> Self {
        e.0
    }
}

impl AsRef<[f64]> for Embedding {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
