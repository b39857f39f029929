// crates/studio-client/src/config.rs
// ============================================================================
// Module: Studio Client Configuration
// Description: TOML client configuration and host credential intake.
// Purpose: Build clients from files and environment without hard-coding secrets.
// Dependencies: serde, studio-core, thiserror, toml
// ============================================================================

//! ## Overview
//! [`ClientConfig`] is loaded from TOML. The path is resolved from an explicit
//! argument, then `STUDIO_CLIENT_CONFIG`, then `studio-client.toml` in the
//! working directory.
//!
//! ```toml
//! server = "test"
//!
//! [storage]
//! kind = "file"
//! path = "/var/lib/studio/token"
//!
//! [logging]
//! filter = "studio_client=debug"
//! ```
//!
//! [`Credentials`] carries either a bearer token or a username/password pair
//! supplied by the host, typically through `STUDIO_TOKEN` or
//! `STUDIO_USERNAME`/`STUDIO_PASSWORD`, plus an optional `STUDIO_SERVER`.
//! Secrets never appear in `Debug` output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use studio_core::FileTokenStorage;
use studio_core::MemoryTokenStorage;
use studio_core::TokenStorage;
use studio_core::resolve_server_url;
use thiserror::Error;

use crate::client::Client;
use crate::transport::Transport;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "STUDIO_CLIENT_CONFIG";
/// Default config file name.
pub const DEFAULT_CONFIG_NAME: &str = "studio-client.toml";
/// Environment variable carrying a bearer token.
pub const TOKEN_ENV_VAR: &str = "STUDIO_TOKEN";
/// Environment variable carrying a username.
pub const USERNAME_ENV_VAR: &str = "STUDIO_USERNAME";
/// Environment variable carrying a password.
pub const PASSWORD_ENV_VAR: &str = "STUDIO_PASSWORD";
/// Environment variable carrying a server name.
pub const SERVER_ENV_VAR: &str = "STUDIO_SERVER";
/// Maximum config file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum length of a config or token path.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of one path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum length of a server name (one DNS label).
pub(crate) const MAX_SERVER_NAME_LENGTH: usize = 63;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Symbolic server name (`""`, `saas`, `test`, ...).
    #[serde(default)]
    pub server: String,
    /// Explicit service URL overriding `server`.
    #[serde(default)]
    pub url: Option<String>,
    /// Token storage selection.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Log filter settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Token storage selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Storage backend.
    #[serde(default)]
    pub kind: StorageKind,
    /// Token file path for the file backend; platform default when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Token storage backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Process-lifetime storage.
    #[default]
    Memory,
    /// File-backed storage.
    File,
}

/// Log filter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` applies when absent.
    #[serde(default)]
    pub filter: Option<String>,
}

impl ClientConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server_name(&self.server)?;
        let web_url = |url: &str| url.starts_with("https://") || url.starts_with("http://");
        if self.url.as_deref().is_some_and(|url| !web_url(url)) {
            return Err(ConfigError::Invalid("url must use http or https".to_string()));
        }
        match (self.storage.kind, &self.storage.path) {
            (StorageKind::Memory, Some(_)) => {
                Err(ConfigError::Invalid("storage.path requires kind = \"file\"".to_string()))
            }
            (StorageKind::File, Some(path)) => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Invalid("storage.path must not be empty".to_string()));
                }
                validate_path(path)
            }
            _ => Ok(()),
        }
    }

    /// Returns the service URL this configuration points at.
    #[must_use]
    pub fn resolved_url(&self) -> String {
        self.url.clone().unwrap_or_else(|| resolve_server_url(&self.server))
    }

    /// Builds the configured token storage.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the file backend has no usable location.
    pub fn build_storage(&self) -> Result<Arc<dyn TokenStorage>, ConfigError> {
        match (self.storage.kind, &self.storage.path) {
            (StorageKind::Memory, _) => Ok(Arc::new(MemoryTokenStorage::new())),
            (StorageKind::File, Some(path)) => Ok(Arc::new(FileTokenStorage::with_path(path))),
            (StorageKind::File, None) => FileTokenStorage::new()
                .map(|storage| Arc::new(storage) as Arc<dyn TokenStorage>)
                .map_err(|err| ConfigError::Invalid(err.to_string())),
        }
    }
}

impl Client {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configured storage cannot be built.
    pub fn from_config(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        let storage = config.build_storage()?;
        Ok(Self::new(transport).with_storage(storage).with_url(config.resolved_url()))
    }
}

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Credentials supplied by the host.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Server to authenticate against; the client's current server when absent.
    pub server: Option<String>,
    /// Secret material.
    pub secret: Secret,
}

/// Secret material for authentication.
#[derive(Clone, PartialEq, Eq)]
pub enum Secret {
    /// Pre-issued session token.
    Token(String),
    /// Username and password to exchange for a token.
    Password {
        /// Account name.
        username: String,
        /// Account password.
        password: String,
    },
}

impl Credentials {
    /// Reads credentials from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when neither a token nor a complete
    /// username/password pair is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads credentials through a variable lookup function.
    ///
    /// A non-empty token wins over a username/password pair. Empty values
    /// count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no usable credentials are found.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let server = read(SERVER_ENV_VAR);
        if let Some(server) = &server {
            validate_server_name(server)?;
        }
        let secret = if let Some(token) = read(TOKEN_ENV_VAR) {
            Secret::Token(token)
        } else {
            match (read(USERNAME_ENV_VAR), read(PASSWORD_ENV_VAR)) {
                (Some(username), Some(password)) => Secret::Password {
                    username,
                    password,
                },
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "set {TOKEN_ENV_VAR} or both {USERNAME_ENV_VAR} and {PASSWORD_ENV_VAR}"
                    )));
                }
            }
        };
        Ok(Self {
            server,
            secret,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("server", &self.server)
            .field("secret", &self.secret)
            .finish()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
            Self::Password {
                username,
                ..
            } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from an explicit argument or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates a path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a symbolic server name as a DNS label (or empty).
fn validate_server_name(name: &str) -> Result<(), ConfigError> {
    if name.len() > MAX_SERVER_NAME_LENGTH {
        return Err(ConfigError::Invalid("server name exceeds max length".to_string()));
    }
    let valid = name.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'-')
        && !name.starts_with('-')
        && !name.ends_with('-');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("invalid server name: {name}")))
    }
}
