// crates/studio-core/src/errors.rs
// ============================================================================
// Module: Studio Error Taxonomy
// Description: Closed error sets for client operations and token storage.
// Purpose: Give callers a stable kind to branch on plus an opaque message.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Two disjoint error sets live here. [`ClientError`] is what every client
//! operation returns; [`StorageError`] is raised by token storage backends and
//! wrapped into [`ClientError::Storage`] when it surfaces through the client.
//!
//! Invariants:
//! - Only the kind is load-bearing for control flow. Messages are opaque UTF-8
//!   and round-trip unchanged, including empty and non-ASCII text.
//! - Two errors are equal iff they have the same kind and the same message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Client Errors
// ============================================================================

/// Errors returned by Studio client operations.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ClientError {
    /// Credentials were missing, rejected or expired.
    #[error("Authentication error: {0}")]
    Authentication(String),
    /// The transport failed before a response was decoded.
    #[error("Network error: {0}")]
    Network(String),
    /// Caller-supplied input was rejected.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    /// The requested entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The backing token storage failed.
    #[error("Storage error: {0}")]
    Storage(String),
    /// Any other failure, including undecodable responses.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Discriminant of [`ClientError`] used for branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClientErrorKind {
    /// See [`ClientError::Authentication`].
    Authentication,
    /// See [`ClientError::Network`].
    Network,
    /// See [`ClientError::InvalidParameters`].
    InvalidParameters,
    /// See [`ClientError::NotFound`].
    NotFound,
    /// See [`ClientError::Storage`].
    Storage,
    /// See [`ClientError::Internal`].
    Internal,
}

impl ClientError {
    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ClientErrorKind {
        match self {
            Self::Authentication(_) => ClientErrorKind::Authentication,
            Self::Network(_) => ClientErrorKind::Network,
            Self::InvalidParameters(_) => ClientErrorKind::InvalidParameters,
            Self::NotFound(_) => ClientErrorKind::NotFound,
            Self::Storage(_) => ClientErrorKind::Storage,
            Self::Internal(_) => ClientErrorKind::Internal,
        }
    }

    /// Returns the opaque message carried by the error.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Authentication(message)
            | Self::Network(message)
            | Self::InvalidParameters(message)
            | Self::NotFound(message)
            | Self::Storage(message)
            | Self::Internal(message) => message,
        }
    }

    /// Builds an error of the given kind with the given message.
    #[must_use]
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ClientErrorKind::Authentication => Self::Authentication(message),
            ClientErrorKind::Network => Self::Network(message),
            ClientErrorKind::InvalidParameters => Self::InvalidParameters(message),
            ClientErrorKind::NotFound => Self::NotFound(message),
            ClientErrorKind::Storage => Self::Storage(message),
            ClientErrorKind::Internal => Self::Internal(message),
        }
    }
}

impl From<StorageError> for ClientError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

// ============================================================================
// SECTION: Storage Errors
// ============================================================================

/// Errors raised by token storage backends.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum StorageError {
    /// The backend cannot be used at all (no location, poisoned lock).
    #[error("Token storage not available: {0}")]
    NotAvailable(String),
    /// Reading the stored token failed.
    #[error("Failed to read token: {0}")]
    ReadError(String),
    /// Persisting the token failed.
    #[error("Failed to write token: {0}")]
    WriteError(String),
    /// Removing the stored token failed.
    #[error("Failed to clear token: {0}")]
    ClearError(String),
}

/// Discriminant of [`StorageError`] used for branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageErrorKind {
    /// See [`StorageError::NotAvailable`].
    NotAvailable,
    /// See [`StorageError::ReadError`].
    Read,
    /// See [`StorageError::WriteError`].
    Write,
    /// See [`StorageError::ClearError`].
    Clear,
}

impl StorageError {
    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> StorageErrorKind {
        match self {
            Self::NotAvailable(_) => StorageErrorKind::NotAvailable,
            Self::ReadError(_) => StorageErrorKind::Read,
            Self::WriteError(_) => StorageErrorKind::Write,
            Self::ClearError(_) => StorageErrorKind::Clear,
        }
    }

    /// Returns the opaque message carried by the error.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::NotAvailable(message)
            | Self::ReadError(message)
            | Self::WriteError(message)
            | Self::ClearError(message) => message,
        }
    }
}
