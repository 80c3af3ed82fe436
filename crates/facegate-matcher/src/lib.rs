//! # facegate-matcher
//!
//! Decides which enrolled identity, if any, a query embedding belongs to.
//!
//! - **[`recognize`]**: nearest enrollment by Euclidean distance, accepted
//!   when within tolerance
//! - **[`NearestNeighbor`]**: the lookup seam, with [`LinearScan`] as the
//!   exact implementation
//! - **[`Matcher`]**: a validated tolerance
//! - **[`Recognizer`]**: scan a store, then match

#![deny(unsafe_code)]

pub mod distance;
pub mod errors;
pub mod index;
pub mod matcher;
pub mod recognizer;

pub use distance::euclidean_distance;
pub use errors::{MatcherError, Result};
pub use facegate_settings::DEFAULT_TOLERANCE;
pub use index::{LinearScan, NearestNeighbor, Neighbor};
pub use matcher::{MatchResult, Matcher, recognize, recognize_with};
pub use recognizer::Recognizer;
