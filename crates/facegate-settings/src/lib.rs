//! # facegate-settings
//!
//! Configuration with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`FacegateSettings::default()`]
//! 2. **User file**: `~/.facegate/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `FACEGATE_*` overrides (highest priority)
//!
//! Loaded settings are plain values; callers pass them to the store and
//! matcher constructors explicitly.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = FacegateSettings::default();
        let _path = settings_path();
        let _encoding = EmbeddingEncoding::Binary;
    }

    #[test]
    fn default_settings_are_valid() {
        let settings = FacegateSettings::default();
        settings.validate().unwrap();
        assert_eq!(settings.store.encoding, EmbeddingEncoding::Text);
        assert_eq!(settings.store.pool_size, 4);
        assert_eq!(settings.store.dimensions, 128);
        assert!((settings.matcher.tolerance - 0.6).abs() < f64::EPSILON);
        assert_eq!(settings.logging.level, "info");
    }
}
