//! Threshold matching: nearest enrollment, then a tolerance check.

use facegate_core::{Embedding, IdentityId, IdentityName, IdentityRecord};
use facegate_settings::{DEFAULT_TOLERANCE, MatcherSettings};

use crate::errors::{MatcherError, Result};
use crate::index::{LinearScan, NearestNeighbor};

/// Outcome of matching one query.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchResult {
    /// The nearest enrollment is within tolerance.
    Matched {
        /// Matched identity.
        id: IdentityId,
        /// Its display name.
        name: IdentityName,
        /// Distance from the query.
        distance: f64,
    },
    /// The nearest enrollment is farther than the tolerance.
    NoMatch {
        /// Distance to the nearest enrollment.
        distance: f64,
    },
    /// Nothing to compare against.
    NoEnrollments,
}

impl MatchResult {
    /// Whether an identity was recognized.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// Distance to the nearest comparable enrollment, if any.
    pub fn distance(&self) -> Option<f64> {
        match self {
            Self::Matched { distance, .. } | Self::NoMatch { distance } => Some(*distance),
            Self::NoEnrollments => None,
        }
    }
}

/// Match `query` against `enrolled` with a linear scan.
///
/// Entries whose length differs from the query are logged and left out. If
/// `enrolled` is non-empty but every entry was left out, this free function
/// also returns [`MatchResult::NoEnrollments`]; the `Facegate` handle
/// rejects such a query before it gets here. A NaN tolerance never matches.
pub fn recognize(query: &Embedding, enrolled: &[IdentityRecord], tolerance: f64) -> MatchResult {
    recognize_with(&LinearScan::new(enrolled), query, tolerance)
}

/// Match `query` using any nearest-neighbour index.
pub fn recognize_with<'a, I>(index: &I, query: &Embedding, tolerance: f64) -> MatchResult
where
    I: NearestNeighbor<'a> + ?Sized,
{
    match index.nearest(query.as_slice()) {
        None => MatchResult::NoEnrollments,
        Some(n) if n.distance <= tolerance => MatchResult::Matched {
            id: n.record.identity_id,
            name: n.record.identity_name.clone(),
            distance: n.distance,
        },
        Some(n) => MatchResult::NoMatch {
            distance: n.distance,
        },
    }
}

/// A matcher with a validated tolerance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matcher {
    tolerance: f64,
}

impl Matcher {
    /// Build a matcher; the tolerance must be finite and non-negative.
    pub fn new(tolerance: f64) -> Result<Self> {
        if tolerance.is_finite() && tolerance >= 0.0 {
            Ok(Self { tolerance })
        } else {
            Err(MatcherError::InvalidTolerance(tolerance))
        }
    }

    /// Build from the settings layer.
    pub fn from_settings(settings: &MatcherSettings) -> Result<Self> {
        Self::new(settings.tolerance)
    }

    /// The maximum distance that still counts as a match.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// See [`recognize`].
    pub fn recognize(&self, query: &Embedding, enrolled: &[IdentityRecord]) -> MatchResult {
        recognize(query, enrolled, self.tolerance)
    }

    /// See [`recognize_with`].
    pub fn recognize_with<'a, I>(&self, index: &I, query: &Embedding) -> MatchResult
    where
        I: NearestNeighbor<'a> + ?Sized,
    {
        recognize_with(index, query, self.tolerance)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
