// crates/studio-client/src/logging/tests.rs
// ============================================================================
// Module: Logging Unit Tests
// Description: Unit tests for log filter resolution and subscriber install.
// Purpose: Validate filter errors and idempotent initialization.
// Dependencies: studio-client
// ============================================================================

//! ## Overview
//! Exercises [`super::init_logging`] and its filter resolution.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::build_filter;
use super::init_logging;
use crate::config::ConfigError;
use crate::config::LoggingConfig;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn explicit_filter_is_accepted() {
    let config = LoggingConfig {
        filter: Some("studio_client=debug,warn".to_string()),
    };
    assert!(build_filter(&config).is_ok());
}

#[test]
fn malformed_filter_is_invalid_config() {
    let config = LoggingConfig {
        filter: Some("studio_client=loudest".to_string()),
    };
    let err = build_filter(&config).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("log filter")));
}

#[test]
fn absent_filter_falls_back_without_error() {
    assert!(build_filter(&LoggingConfig::default()).is_ok());
}

#[test]
fn second_initialization_is_a_no_op() {
    let config = LoggingConfig {
        filter: Some("off".to_string()),
    };
    let _first = init_logging(&config).unwrap();
    assert!(!init_logging(&config).unwrap());
}

#[test]
fn malformed_filter_installs_nothing() {
    let config = LoggingConfig {
        filter: Some("studio_core=verbose".to_string()),
    };
    assert!(init_logging(&config).is_err());
}
