// crates/studio-client/src/logging.rs
// ============================================================================
// Module: Studio Client Logging
// Description: Optional tracing subscriber installation for hosts.
// Purpose: Route client diagnostics to stderr with a configurable filter.
// Dependencies: tracing-subscriber
// ============================================================================

//! ## Overview
//! The client emits `tracing` events and never installs a subscriber on its
//! own. Hosts without one can call [`init_logging`]. The filter comes from
//! [`LoggingConfig::filter`], then `RUST_LOG`, then `warn`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing_subscriber::EnvFilter;

use crate::config::ConfigError;
use crate::config::LoggingConfig;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Filter applied when neither the config nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// SECTION: Initialization
// ============================================================================

/// Installs a global stderr subscriber.
///
/// Returns `false` when a global subscriber was already installed; the
/// existing one is left in place.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the configured filter does not parse.
pub fn init_logging(config: &LoggingConfig) -> Result<bool, ConfigError> {
    let filter = build_filter(config)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    Ok(installed)
}

/// Resolves the effective filter.
fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigError> {
    match config.filter.as_deref() {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|err| ConfigError::Invalid(format!("invalid log filter: {err}"))),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
