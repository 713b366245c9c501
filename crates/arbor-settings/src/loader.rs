//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`ArborSettings::default()`]
//! 2. If the settings file exists, deep-merge user values over defaults
//! 3. Apply `ARBOR_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::ArborSettings;

/// Resolve the default settings file path (`$ARBOR_HOME/settings.json`,
/// falling back to `~/.arbor/settings.json`).
pub fn settings_path() -> PathBuf {
    if let Ok(dir) = std::env::var("ARBOR_HOME") {
        return PathBuf::from(dir).join("settings.json");
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".arbor").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<ArborSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<ArborSettings> {
    let defaults = serde_json::to_value(ArborSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: ArborSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Integers must be valid and within range; invalid values are silently
/// ignored (fall back to file/default).
pub fn apply_env_overrides(settings: &mut ArborSettings) {
    if let Some(v) = read_env_string("ARBOR_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_env_u16("ARBOR_PORT", 1, 65535) {
        settings.server.port = v;
    }
    if let Some(v) = read_env_string("ARBOR_DB_PATH") {
        settings.database.path = v;
    }
    if let Some(v) = read_env_u32("ARBOR_DB_POOL_SIZE", 1, 256) {
        settings.database.pool_size = v;
    }
    if let Some(v) = read_env_string("ARBOR_JWT_SECRET") {
        settings.auth.jwt_secret = v;
    }
    if let Some(v) = read_env_string("ARBOR_JWT_ISSUER") {
        settings.auth.issuer = v;
    }
    if let Some(v) = read_env_i64("ARBOR_TOKEN_TTL_DAYS", 1, 365) {
        settings.auth.token_ttl_days = v;
    }
    if let Some(v) = read_env_string("ARBOR_ROOT_INVITE_CODE") {
        settings.platform.root_invite_code = v;
    }
    if let Some(v) = read_env_string("ARBOR_LOG_FILTER") {
        settings.logging.filter = v;
    }
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    let v: u16 = std::env::var(name).ok()?.parse().ok()?;
    (min..=max).contains(&v).then_some(v)
}

fn read_env_u32(name: &str, min: u32, max: u32) -> Option<u32> {
    let v: u32 = std::env::var(name).ok()?.parse().ok()?;
    (min..=max).contains(&v).then_some(v)
}

fn read_env_i64(name: &str, min: i64, max: i64) -> Option<i64> {
    let v: i64 = std::env::var(name).ok()?.parse().ok()?;
    (min..=max).contains(&v).then_some(v)
}
