//! # arbor-logging
//!
//! Structured logging with `tracing`.
//!
//! [`init_logging`] installs a `tracing-subscriber` with an env-filter
//! (settings default, `RUST_LOG` override) and either human-readable or
//! JSON line output.

#![deny(unsafe_code)]

use arbor_settings::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Safe to call more than once; subsequent calls are no-ops (the first
/// subscriber wins). `RUST_LOG` takes precedence over the configured
/// filter directive.
pub fn init_logging(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.filter.clone()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        tracing::debug!("logging already initialized: {e}");
    }
}
