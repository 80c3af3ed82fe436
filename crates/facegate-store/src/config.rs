//! Store configuration resolved from settings.

use std::path::PathBuf;
use std::time::Duration;

use facegate_settings::{EmbeddingEncoding, StoreSettings};

use crate::sqlite::ConnectionConfig;

/// Everything needed to open an [`EmbeddingStore`](crate::EmbeddingStore).
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Database file location (already `~`-expanded).
    pub database_path: PathBuf,
    /// Encoding for this deployment.
    pub encoding: EmbeddingEncoding,
    /// Required embedding length, if enforced.
    pub dimensions: Option<usize>,
    /// Pool and pragma settings.
    pub connection: ConnectionConfig,
}

impl StoreConfig {
    /// Build from the settings layer.
    pub fn from_settings(settings: &StoreSettings) -> Self {
        Self {
            database_path: settings.resolved_database_path(),
            encoding: settings.encoding,
            dimensions: settings.required_dimensions(),
            connection: ConnectionConfig {
                pool_size: settings.pool_size,
                busy_timeout_ms: settings.busy_timeout_ms,
                connection_timeout: Duration::from_millis(settings.connection_timeout_ms),
            },
        }
    }

    /// Same configuration with another encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: EmbeddingEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Same configuration with another length requirement.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: Option<usize>) -> Self {
        self.dimensions = dimensions;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_settings(&StoreSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_settings_maps_every_field() {
        let settings = StoreSettings {
            database_path: "/var/lib/facegate/faces.db".into(),
            encoding: EmbeddingEncoding::Binary,
            pool_size: 2,
            busy_timeout_ms: 750,
            connection_timeout_ms: 1_500,
            dimensions: 512,
        };
        let config = StoreConfig::from_settings(&settings);
        assert_eq!(config.database_path, PathBuf::from("/var/lib/facegate/faces.db"));
        assert_eq!(config.encoding, EmbeddingEncoding::Binary);
        assert_eq!(config.dimensions, Some(512));
        assert_eq!(config.connection.pool_size, 2);
        assert_eq!(config.connection.busy_timeout_ms, 750);
        assert_eq!(config.connection.connection_timeout, Duration::from_millis(1_500));
    }

    #[test]
    fn zero_dimensions_maps_to_none() {
        let settings = StoreSettings {
            dimensions: 0,
            ..StoreSettings::default()
        };
        assert_eq!(StoreConfig::from_settings(&settings).dimensions, None);
    }

    #[test]
    fn builders_override() {
        let config = StoreConfig::default()
            .with_encoding(EmbeddingEncoding::Binary)
            .with_dimensions(None);
        assert_eq!(config.encoding, EmbeddingEncoding::Binary);
        assert_eq!(config.dimensions, None);
    }
}
