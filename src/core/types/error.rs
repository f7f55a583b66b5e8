//! Error taxonomy for relocation and handle tracking

use super::identifier::Id;
use super::version::VersionKey;
use std::path::Path;
use thiserror::Error;

/// Main error type for the relocation layer.
///
/// Everything here except [`RelocError::InvalidAddress`] falls in the fatal
/// category: the caller cannot safely keep addressing the host process once
/// one of these surfaces. Stale handles are deliberately *not* an error;
/// `HandleManager::resolve` reports them as `None`.
#[derive(Error, Debug)]
pub enum RelocError {
    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Malformed version string: {0:?}")]
    VersionMalformed(String),

    #[error("Version metadata unavailable for {module}: {reason}")]
    VersionUnavailable { module: String, reason: String },

    #[error("Offset database not found at {path}: {source}")]
    DatabaseMissing {
        path: String,
        source: std::io::Error,
    },

    #[error("Offset database at {path} is corrupt: {reason}")]
    DatabaseCorrupt { path: String, reason: String },

    #[error("Offset database format {found} not supported (expected {expected})")]
    DatabaseFormatMismatch { expected: u32, found: u32 },

    #[error("Offset database identity {found} does not match host binary {expected}")]
    IdentityMismatch { expected: String, found: String },

    #[error("Duplicate offset entry for id {id}, version {version}")]
    DuplicateEntry { id: Id, version: VersionKey },

    #[error("Identifier {id} has no offset for host version {version}")]
    UnresolvedId { id: Id, version: VersionKey },

    #[error("No host module attached; call HostModule::init first")]
    NotAttached,

    #[error("Host module already attached")]
    AlreadyAttached,

    #[error("Platform query failed: {0}")]
    PlatformQuery(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for relocation operations
pub type RelocResult<T> = Result<T, RelocError>;

impl RelocError {
    /// Creates a missing-database error from the failing path
    pub fn database_missing(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        RelocError::DatabaseMissing {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Creates a corrupt-database error from the failing path
    pub fn database_corrupt(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        RelocError::DatabaseCorrupt {
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an unresolved-identifier error
    pub fn unresolved(id: Id, version: VersionKey) -> Self {
        RelocError::UnresolvedId { id, version }
    }

    /// Creates a version-unavailable error
    pub fn version_unavailable(module: impl Into<String>, reason: impl Into<String>) -> Self {
        RelocError::VersionUnavailable {
            module: module.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means the database resource itself is unusable
    pub fn is_database_load_failure(&self) -> bool {
        matches!(
            self,
            RelocError::DatabaseMissing { .. }
                | RelocError::DatabaseCorrupt { .. }
                | RelocError::DatabaseFormatMismatch { .. }
                | RelocError::IdentityMismatch { .. }
                | RelocError::DuplicateEntry { .. }
        )
    }
}
