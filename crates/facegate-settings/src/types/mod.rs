//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so partial
//! JSON files are accepted: missing fields take their compiled default.

mod matcher;
mod store;

pub use matcher::*;
pub use store::*;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// Example `~/.facegate/settings.json`:
///
/// ```json
/// {
///   "store": { "databasePath": "/var/lib/facegate/faces.db", "encoding": "binary" },
///   "matcher": { "tolerance": 0.5 }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FacegateSettings {
    /// Embedding store settings.
    pub store: StoreSettings,
    /// Matcher settings.
    pub matcher: MatcherSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl FacegateSettings {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.store.validate()?;
        self.matcher.validate()?;
        if self.logging.level.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "logging.level must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive (overridden by `RUST_LOG`).
    pub level: String,
    /// Emit JSON lines instead of the compact human format.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
