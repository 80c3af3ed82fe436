//! Embedding store settings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// On-disk format for embedding vectors.
///
/// Chosen once per deployment. The two formats are not interchangeable on
/// the same table and are never auto-detected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingEncoding {
    /// Comma-joined decimal strings in a TEXT value.
    #[default]
    Text,
    /// Little-endian IEEE-754 doubles in a BLOB value.
    Binary,
}

impl EmbeddingEncoding {
    /// Stable lowercase name, as stored in `store_meta`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for EmbeddingEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingEncoding {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "binary" => Ok(Self::Binary),
            other => Err(SettingsError::InvalidValue(format!(
                "unknown embedding encoding: {other}"
            ))),
        }
    }
}

/// Embedding store settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    /// Path to the `SQLite` database (may start with `~/`).
    pub database_path: String,
    /// Embedding encoding for this deployment.
    pub encoding: EmbeddingEncoding,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// `SQLite` busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
    /// Maximum wait for a pooled connection in milliseconds.
    pub connection_timeout_ms: u64,
    /// Required embedding length; `0` accepts any length.
    pub dimensions: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_path: "~/.facegate/faces.db".to_string(),
            encoding: EmbeddingEncoding::Text,
            pool_size: 4,
            busy_timeout_ms: 5_000,
            connection_timeout_ms: 5_000,
            dimensions: 128,
        }
    }
}

impl StoreSettings {
    /// Resolve the database path, expanding `~/` to the home directory.
    pub fn resolved_database_path(&self) -> PathBuf {
        if let Some(rest) = self.database_path.strip_prefix("~/") {
            if let Ok(home) = std::env::var("HOME") {
                return PathBuf::from(home).join(rest);
            }
        }
        PathBuf::from(&self.database_path)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.database_path.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "store.databasePath must not be empty".into(),
            ));
        }
        if self.pool_size == 0 {
            return Err(SettingsError::InvalidValue(
                "store.poolSize must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The enforced embedding length, if any.
    pub fn required_dimensions(&self) -> Option<usize> {
        (self.dimensions > 0).then_some(self.dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_parse() {
        assert_eq!("text".parse::<EmbeddingEncoding>().unwrap(), EmbeddingEncoding::Text);
        assert_eq!(
            " BINARY ".parse::<EmbeddingEncoding>().unwrap(),
            EmbeddingEncoding::Binary
        );
        assert!("base64".parse::<EmbeddingEncoding>().is_err());
    }

    #[test]
    fn encoding_display_matches_serde() {
        for enc in [EmbeddingEncoding::Text, EmbeddingEncoding::Binary] {
            let json = serde_json::to_value(enc).unwrap();
            assert_eq!(json, enc.to_string());
        }
    }

    #[test]
    fn resolved_path_expands_tilde() {
        let settings = StoreSettings::default();
        let resolved = settings.resolved_database_path();
        assert!(!resolved.starts_with("~"), "tilde should be expanded: {resolved:?}");
        assert!(resolved.ends_with(".facegate/faces.db"));
    }

    #[test]
    fn resolved_path_absolute_passthrough() {
        let settings = StoreSettings {
            database_path: "/srv/faces.db".into(),
            ..StoreSettings::default()
        };
        assert_eq!(settings.resolved_database_path(), PathBuf::from("/srv/faces.db"));
    }

    #[test]
    fn validate_rejects_zero_pool_and_blank_path() {
        let zero_pool = StoreSettings {
            pool_size: 0,
            ..StoreSettings::default()
        };
        assert!(zero_pool.validate().is_err());

        let blank_path = StoreSettings {
            database_path: " ".into(),
            ..StoreSettings::default()
        };
        assert!(blank_path.validate().is_err());
    }

    #[test]
    fn zero_dimensions_disables_length_check() {
        assert_eq!(StoreSettings::default().required_dimensions(), Some(128));
        let any_dims = StoreSettings {
            dimensions: 0,
            ..StoreSettings::default()
        };
        assert!(any_dims.validate().is_ok());
        assert_eq!(any_dims.required_dimensions(), None);
    }
}
