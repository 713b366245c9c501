//! # arbor-settings
//!
//! Configuration management with layered sources for the arbor platform.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`ArborSettings::default()`]
//! 2. **Settings file** — `settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `ARBOR_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::sync::OnceLock;

/// Global settings singleton, initialized on first access.
static SETTINGS: OnceLock<ArborSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from the default path with env var
/// overrides; on failure falls back to compiled defaults.
pub fn get_settings() -> &'static ArborSettings {
    SETTINGS.get_or_init(|| load_settings().unwrap_or_default())
}

/// Initialize the global settings with a specific value.
///
/// # Errors
///
/// Returns the provided settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: ArborSettings) -> std::result::Result<(), ArborSettings> {
    SETTINGS.set(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = ArborSettings::default();
        assert_eq!(settings.name, "arbor");
        assert_eq!(settings.server.port, 8320);
        assert_eq!(settings.auth.token_ttl_days, 7);
        assert!(!settings.platform.root_invite_code.is_empty());
    }

    #[test]
    fn deep_merge_re_exported() {
        let a = serde_json::json!({"x": 1});
        let b = serde_json::json!({"y": 2});
        let merged = deep_merge(a, b);
        assert_eq!(merged["x"], 1);
        assert_eq!(merged["y"], 2);
    }
}
