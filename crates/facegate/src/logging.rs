//! Logging setup from settings.

use facegate_settings::LoggingSettings;

/// Install the process-wide subscriber described by `settings`.
///
/// Call once at startup; later calls are no-ops.
pub fn init_logging(settings: &LoggingSettings) {
    if settings.json {
        facegate_core::logging::init_json_subscriber(&settings.level);
    } else {
        facegate_core::logging::init_subscriber(&settings.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(&LoggingSettings::default());
        init_logging(&LoggingSettings {
            level: "debug".into(),
            json: true,
        });
    }
}
