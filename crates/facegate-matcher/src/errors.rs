//! Matcher errors.

use thiserror::Error;

/// Errors from constructing a matcher.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MatcherError {
    /// Tolerance is negative, NaN, or infinite.
    #[error("invalid tolerance {0}: must be finite and non-negative")]
    InvalidTolerance(f64),
}

/// Result alias for matcher operations.
pub type Result<T> = std::result::Result<T, MatcherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_value() {
        assert_eq!(
            MatcherError::InvalidTolerance(-0.5).to_string(),
            "invalid tolerance -0.5: must be finite and non-negative"
        );
    }
}
