//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and implement
//! [`Default`] with production default values. `#[serde(default)]` allows
//! partial JSON: missing fields get their default value during
//! deserialization.

use serde::{Deserialize, Serialize};

/// Root settings type for the arbor platform.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArborSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Database settings.
    pub database: DatabaseSettings,
    /// Bearer-token settings.
    pub auth: AuthSettings,
    /// Platform-level tunables surfaced to clients.
    pub platform: PlatformSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

impl Default for ArborSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "arbor".to_string(),
            server: ServerSettings::default(),
            database: DatabaseSettings::default(),
            auth: AuthSettings::default(),
            platform: PlatformSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// HTTP server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Maximum JSON request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8320,
            max_body_bytes: 256 * 1024,
        }
    }
}

/// Database settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Path to the `SQLite` database file.
    pub path: String,
    /// Connection pool size.
    pub pool_size: u32,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
    /// Page cache size in KiB.
    pub cache_size_kib: i64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "arbor.db".to_string(),
            pool_size: 16,
            busy_timeout_ms: 30_000,
            cache_size_kib: 8192,
        }
    }
}

/// Bearer-token (JWT) settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthSettings {
    /// HMAC signing secret.
    pub jwt_secret: String,
    /// Token issuer claim.
    pub issuer: String,
    /// Token lifetime in days.
    pub token_ttl_days: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".to_string(),
            issuer: "arbor".to_string(),
            token_ttl_days: 7,
        }
    }
}

/// Platform-level tunables surfaced verbatim to clients.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformSettings {
    /// Invite code honoured without a referrer (bootstrap registrations).
    pub root_invite_code: String,
    /// USDT token contract address shown on the dashboard.
    pub usdt_contract: String,
    /// Platform collection account address shown on the dashboard.
    pub collection_account: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            root_invite_code: "abf00dd52c08a9213f225827bc3fb100".to_string(),
            usdt_contract: "0x55d398326f99059fF775485246999027B3197955".to_string(),
            collection_account: "0x6b2c086C9bDb2e09A85f84CD1b8eed1d9C9B7eae".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default filter directive (overridden by `RUST_LOG`).
    pub filter: String,
    /// Emit JSON-formatted log lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}
