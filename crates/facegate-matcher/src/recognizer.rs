//! Store-backed recognition: scan every enrollment, then match.

use std::sync::Arc;

use facegate_core::Embedding;
use facegate_store::EmbeddingStore;
use tracing::{debug, info};

use crate::matcher::{MatchResult, Matcher};

/// Matches queries against everything currently enrolled in a store.
#[derive(Clone, Debug)]
pub struct Recognizer {
    store: Arc<EmbeddingStore>,
    matcher: Matcher,
}

impl Recognizer {
    /// Pair a store with a matcher.
    pub fn new(store: Arc<EmbeddingStore>, matcher: Matcher) -> Self {
        Self { store, matcher }
    }

    /// Identify the face behind `query`.
    ///
    /// Reads a fresh snapshot of the store on every call. An unreadable
    /// store scans as empty and yields [`MatchResult::NoEnrollments`].
    pub fn identify(&self, query: &Embedding) -> MatchResult {
        let enrolled = self.store.scan_all();
        let result = self.matcher.recognize(query, &enrolled);
        match &result {
            MatchResult::Matched { id, name, distance } => {
                info!(identity_id = %id, identity_name = %name, distance, "identity recognized");
            }
            MatchResult::NoMatch { distance } => {
                debug!(
                    distance,
                    tolerance = self.matcher.tolerance(),
                    enrolled = enrolled.len(),
                    "no enrollment within tolerance"
                );
            }
            MatchResult::NoEnrollments => {
                info!(enrolled = enrolled.len(), "no comparable enrollments");
            }
        }
        result
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<EmbeddingStore> {
        &self.store
    }

    /// The matcher in use.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use facegate_core::logging::capture_logs;
    use facegate_core::{IdentityId, IdentityName};
    use facegate_store::{EmbeddingEncoding, StoreConfig};
    use tracing::Level;

    fn emb(values: &[f64]) -> Embedding {
        Embedding::new(values.to_vec()).unwrap()
    }

    fn recognizer() -> Recognizer {
        let config = StoreConfig::default()
            .with_encoding(EmbeddingEncoding::Binary)
            .with_dimensions(Some(2));
        let store = EmbeddingStore::open_in_memory(&config).unwrap();
        Recognizer::new(Arc::new(store), Matcher::default())
    }

    fn enroll(r: &Recognizer, id: u64, name: &str, values: &[f64]) {
        r.store()
            .enroll(
                IdentityId::new(id).unwrap(),
                &IdentityName::parse(name).unwrap(),
                &emb(values),
            )
            .unwrap();
    }

    #[test]
    fn empty_store_reports_no_enrollments() {
        let r = recognizer();
        let (logs, _guard) = capture_logs();
        assert_eq!(r.identify(&emb(&[0.0, 0.0])), MatchResult::NoEnrollments);
        assert!(logs.has_event(Level::INFO, "no comparable enrollments"));
    }

    #[test]
    fn recognizes_enrolled_identity() {
        let r = recognizer();
        enroll(&r, 1, "Alice", &[0.0, 0.0]);
        enroll(&r, 2, "Bob", &[10.0, 10.0]);

        let (logs, _guard) = capture_logs();
        assert_matches!(
            r.identify(&emb(&[0.1, 0.1])),
            MatchResult::Matched { ref name, .. } if name.as_str() == "Alice"
        );
        let hits = logs.matching(Level::INFO, "identity recognized");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].field("identity_name"), Some("Alice"));
    }

    #[test]
    fn stranger_is_no_match() {
        let r = recognizer();
        enroll(&r, 1, "Alice", &[0.0, 0.0]);

        let (logs, _guard) = capture_logs();
        assert_matches!(r.identify(&emb(&[5.0, 5.0])), MatchResult::NoMatch { .. });
        assert!(logs.has_event(Level::DEBUG, "no enrollment within tolerance"));
    }

    #[test]
    fn sees_enrollments_made_after_construction() {
        let r = recognizer();
        assert_eq!(r.identify(&emb(&[1.0, 1.0])), MatchResult::NoEnrollments);
        enroll(&r, 3, "Carol", &[1.0, 1.0]);
        assert!(r.identify(&emb(&[1.0, 1.0])).is_match());
    }
}
