//! The [`Facegate`] handle used by capture, enrollment, and access-control
//! front ends.

use std::sync::Arc;

use facegate_core::{Embedding, IdentityId, IdentityName, IdentityRecord};
use facegate_matcher::{MatchResult, Matcher, Recognizer};
use facegate_settings::FacegateSettings;
use facegate_store::{EmbeddingStore, StoreConfig, StoreError};
use tracing::info;

use crate::errors::{EnrollError, IdentifyError, OpenError};

/// An opened store plus the matcher configured for it.
#[derive(Clone, Debug)]
pub struct Facegate {
    recognizer: Recognizer,
}

impl Facegate {
    /// Open the configured database and build the matcher.
    pub fn open(settings: &FacegateSettings) -> Result<Self, OpenError> {
        let matcher = Matcher::from_settings(&settings.matcher)?;
        let store = EmbeddingStore::open(&StoreConfig::from_settings(&settings.store))?;
        Ok(Self::from_parts(Arc::new(store), matcher))
    }

    /// Same as [`open`](Self::open) but against a private in-memory database.
    pub fn open_in_memory(settings: &FacegateSettings) -> Result<Self, OpenError> {
        let matcher = Matcher::from_settings(&settings.matcher)?;
        let store = EmbeddingStore::open_in_memory(&StoreConfig::from_settings(&settings.store))?;
        Ok(Self::from_parts(Arc::new(store), matcher))
    }

    /// Assemble from an already-open store.
    pub fn from_parts(store: Arc<EmbeddingStore>, matcher: Matcher) -> Self {
        info!(
            encoding = %store.encoding(),
            dimensions = ?store.dimensions(),
            tolerance = matcher.tolerance(),
            "facegate ready"
        );
        Self {
            recognizer: Recognizer::new(store, matcher),
        }
    }

    /// Validate raw operator input and enroll it.
    ///
    /// The id must be digits, the name letters and spaces; both are
    /// trimmed. Enrollment is refused if the id or the name is taken.
    pub fn enroll(
        &self,
        raw_id: &str,
        raw_name: &str,
        embedding: Vec<f64>,
    ) -> Result<IdentityRecord, EnrollError> {
        let id = IdentityId::parse(raw_id)?;
        let name = IdentityName::parse(raw_name)?;
        let embedding = Embedding::new(embedding)?;
        self.store().enroll(id, &name, &embedding)?;
        Ok(IdentityRecord::new(id, name, embedding))
    }

    /// Replace the name and embedding stored for `id`.
    pub fn update(
        &self,
        id: IdentityId,
        name: &IdentityName,
        embedding: &Embedding,
    ) -> Result<(), StoreError> {
        self.store().update(id, name, embedding)
    }

    /// Match a query embedding against everything enrolled.
    ///
    /// When the store has configured dimensions, a query of another length
    /// is refused instead of being compared against nothing.
    pub fn identify(&self, query: Vec<f64>) -> Result<MatchResult, IdentifyError> {
        let query = Embedding::new(query)?;
        if let Some(expected) = self.store().dimensions() {
            if query.len() != expected {
                return Err(IdentifyError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }
        Ok(self.recognizer.identify(&query))
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<EmbeddingStore> {
        self.recognizer.store()
    }

    /// The matcher in use.
    pub fn matcher(&self) -> &Matcher {
        self.recognizer.matcher()
    }
}
