//! Nearest-neighbour lookup over enrolled identities.
//!
//! [`NearestNeighbor`] is the seam between "find the closest enrollment"
//! and "decide whether it is close enough". [`LinearScan`] is the exact
//! brute-force implementation; an approximate index can implement the same
//! trait once enrollments outgrow a linear pass.

use facegate_core::IdentityRecord;
use facegate_store::StoreError;
use tracing::warn;

use crate::distance::euclidean_distance;

/// The closest enrolled record and its distance from the query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor<'a> {
    /// The enrolled record.
    pub record: &'a IdentityRecord,
    /// Euclidean distance from the query.
    pub distance: f64,
}

/// A searchable set of enrollments borrowed for `'a`.
///
/// The returned [`Neighbor`] borrows the enrollment itself, not the index,
/// so a result outlives a temporary index built over the same records.
pub trait NearestNeighbor<'a> {
    /// The closest comparable record, or `None` if there is none.
    ///
    /// Ties resolve to the record encountered first.
    fn nearest(&self, query: &[f64]) -> Option<Neighbor<'a>>;

    /// Number of indexed records, comparable or not.
    fn len(&self) -> usize;

    /// Whether the index holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exact O(n) scan in slice order.
#[derive(Clone, Copy, Debug)]
pub struct LinearScan<'a> {
    records: &'a [IdentityRecord],
}

impl<'a> LinearScan<'a> {
    /// Index the records in the given order.
    pub fn new(records: &'a [IdentityRecord]) -> Self {
        Self { records }
    }
}

impl<'a> NearestNeighbor<'a> for LinearScan<'a> {
    fn nearest(&self, query: &[f64]) -> Option<Neighbor<'a>> {
        let mut best: Option<Neighbor<'a>> = None;
        for record in self.records {
            let Some(distance) = euclidean_distance(query, record.embedding.as_slice()) else {
                let err = StoreError::CorruptEncoding(format!(
                    "embedding has {} values, query has {}",
                    record.embedding.len(),
                    query.len()
                ));
                warn!(identity_id = %record.identity_id, error = %err, "excluding enrollment from matching");
                continue;
            };
            // strict: an equal distance never displaces an earlier record
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(Neighbor { record, distance });
            }
        }
        best
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facegate_core::logging::capture_logs;
    use facegate_core::{Embedding, IdentityId, IdentityName};
    use tracing::Level;

    fn record(id: u64, name: &str, values: &[f64]) -> IdentityRecord {
        IdentityRecord::new(
            IdentityId::new(id).unwrap(),
            IdentityName::parse(name).unwrap(),
            Embedding::new(values.to_vec()).unwrap(),
        )
    }

    #[test]
    fn empty_index_has_no_neighbor() {
        let scan = LinearScan::new(&[]);
        assert!(scan.is_empty());
        assert!(scan.nearest(&[0.0]).is_none());
    }

    #[test]
    fn picks_closest() {
        let records = [
            record(1, "Far", &[10.0, 10.0]),
            record(2, "Near", &[1.0, 1.0]),
            record(3, "Middle", &[4.0, 4.0]),
        ];
        let n = LinearScan::new(&records).nearest(&[0.0, 0.0]).unwrap();
        assert_eq!(n.record.identity_id.get(), 2);
        assert!((n.distance - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn tie_goes_to_first_record() {
        let records = [
            record(5, "First", &[1.0, 0.0]),
            record(6, "Second", &[-1.0, 0.0]),
            record(7, "Third", &[0.0, 1.0]),
        ];
        let n = LinearScan::new(&records).nearest(&[0.0, 0.0]).unwrap();
        assert_eq!(n.record.identity_name.as_str(), "First");
    }

    #[test]
    fn mismatched_lengths_are_excluded_and_logged() {
        let records = [
            record(1, "Short", &[0.0]),
            record(2, "Good", &[3.0, 4.0]),
        ];
        let (logs, _guard) = capture_logs();
        let n = LinearScan::new(&records).nearest(&[0.0, 0.0]).unwrap();

        assert_eq!(n.record.identity_id.get(), 2);
        let excluded = logs.matching(Level::WARN, "excluding enrollment");
        assert_eq!(excluded.len(), 1);
        assert_eq!(excluded[0].field("identity_id"), Some("1"));
        assert!(excluded[0].field("error").unwrap().contains("corrupt embedding encoding"));
    }

    #[test]
    fn all_mismatched_means_no_neighbor() {
        let records = [record(1, "Short", &[0.0]), record(2, "Long", &[0.0; 3])];
        let scan = LinearScan::new(&records);
        assert_eq!(scan.len(), 2);
        assert!(scan.nearest(&[0.0, 0.0]).is_none());
    }

    #[test]
    fn neighbor_outlives_the_scan() {
        let records = [record(1, "Kept", &[2.0])];
        let n = {
            let scan = LinearScan::new(&records);
            scan.nearest(&[0.0]).unwrap()
        };
        assert!(std::ptr::eq(n.record, &records[0]));
        assert!((n.distance - 2.0).abs() < f64::EPSILON);
    }
}
