// crates/studio-core/src/storage.rs
// ============================================================================
// Module: Studio Token Storage
// Description: Pluggable persistence for the single session token.
// Purpose: Let hosts choose where the session secret lives.
// Dependencies: dirs, tracing
// ============================================================================

//! ## Overview
//! [`TokenStorage`] is a three-operation capability: `store`, `load`,
//! `clear`. The client treats it as the only source of truth for the session
//! token and makes no other assumption about it. Two implementations ship
//! here: [`MemoryTokenStorage`] for process-lifetime sessions and
//! [`FileTokenStorage`] for sessions that survive restarts.
//!
//! Invariants:
//! - After `store(t)`, `load()` returns `Some(t)` until the next `store` or `clear`.
//! - After `clear()`, `load()` returns `None`. Clearing an empty store succeeds.
//! - Implementations serialize their own state; one instance may be shared by
//!   several clients across threads.
//! - Tokens never appear in `Debug` output or logs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use crate::errors::StorageError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Application directory created under the platform config directory.
pub const APP_DIR_NAME: &str = "EdgeFirst Studio";

/// File name of the persisted token.
pub const TOKEN_FILE_NAME: &str = "token";

// ============================================================================
// SECTION: Capability
// ============================================================================

/// Persistence strategy for the session token.
pub trait TokenStorage: Send + Sync {
    /// Persists `token`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the token cannot be persisted.
    fn store(&self, token: &str) -> Result<(), StorageError>;

    /// Returns the stored token, or `None` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Removes the stored token. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the token cannot be removed.
    fn clear(&self) -> Result<(), StorageError>;
}

// ============================================================================
// SECTION: In-Memory Storage
// ============================================================================

/// Token storage that lives for the lifetime of the process.
#[derive(Default)]
pub struct MemoryTokenStorage {
    /// Stored token.
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory store pre-loaded with `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl fmt::Debug for MemoryTokenStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = self.token.lock().is_ok_and(|guard| guard.is_some());
        f.debug_struct("MemoryTokenStorage")
            .field("token", &if present { "<redacted>" } else { "<empty>" })
            .finish()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn store(&self, token: &str) -> Result<(), StorageError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| StorageError::NotAvailable("token store lock poisoned".to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .token
            .lock()
            .map_err(|_| StorageError::NotAvailable("token store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| StorageError::NotAvailable("token store lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}

// ============================================================================
// SECTION: File Storage
// ============================================================================

/// Token storage backed by a single file.
///
/// # Invariants
/// - A missing or empty file loads as `None`.
/// - Writes go to a sibling temp file that is synced and renamed into place.
#[derive(Debug)]
pub struct FileTokenStorage {
    /// Token file location.
    path: PathBuf,
    /// Serializes operations issued through this instance.
    lock: Mutex<()>,
}

impl FileTokenStorage {
    /// Creates a store at the platform default location.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotAvailable`] when the platform has no config directory.
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self::with_path(Self::default_path()?))
    }

    /// Creates a store at an explicit file path.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the platform default token path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotAvailable`] when the platform has no config directory.
    pub fn default_path() -> Result<PathBuf, StorageError> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(TOKEN_FILE_NAME)).ok_or_else(
            || StorageError::NotAvailable("no configuration directory on this platform".to_string()),
        )
    }

    /// Returns the token file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquires the per-instance operation lock.
    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, StorageError> {
        self.lock
            .lock()
            .map_err(|_| StorageError::NotAvailable("token file lock poisoned".to_string()))
    }
}

impl TokenStorage for FileTokenStorage {
    fn store(&self, token: &str) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        write_atomic(&self.path, token.as_bytes())
            .map_err(|err| StorageError::WriteError(format!("{}: {err}", self.path.display())))?;
        debug!(path = %self.path.display(), "stored session token");
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, StorageError> {
        let _guard = self.guard()?;
        match fs::read_to_string(&self.path) {
            Ok(token) if token.is_empty() => Ok(None),
            Ok(token) => Ok(Some(token)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::ReadError(format!("{}: {err}", self.path.display()))),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cleared session token");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::ClearError(format!("{}: {err}", self.path.display()))),
        }
    }
}

/// Writes `bytes` to `path` through a synced temp file and rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&tmp_path)?;
    restrict_permissions(&file)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(&tmp_path, path)
}

/// Limits the token file to its owner.
#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

/// Limits the token file to its owner.
#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps, reason = "Signature matches the unix variant.")]
const fn restrict_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
