//! Matcher settings.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Distance threshold the dlib face model was calibrated for.
pub const DEFAULT_TOLERANCE: f64 = 0.6;

/// Matcher settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatcherSettings {
    /// Maximum Euclidean distance accepted as a match.
    pub tolerance: f64,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl MatcherSettings {
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SettingsError::InvalidValue(format!(
                "matcher.tolerance must be a finite non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
