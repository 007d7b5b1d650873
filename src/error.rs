//! Structured error types for import runs.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Input errors
    EnvRootNotFound,
    NoEnvFiles,

    // Target store errors
    DatabaseNotFound,
    InvalidDatabase,
    InvalidDocument,

    // Internal errors
    IoError,
    DatabaseError,
    SerializationError,
}

/// Error raised by the import core.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("env root not found: {}", .0.display())]
    EnvRootNotFound(PathBuf),

    #[error("no .{extension} files found under: {}", .root.display())]
    NoEnvFiles { root: PathBuf, extension: String },

    #[error("database not found: {}", .0.display())]
    DatabaseNotFound(PathBuf),

    #[error("not a cc-switch database (missing providers table): {}", .0.display())]
    MissingProvidersTable(PathBuf),

    #[error("invalid json: {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid json root type (expect object): {}", .0.display())]
    InvalidRoot(PathBuf),

    #[error("invalid providers field (expect array): {}", .0.display())]
    InvalidProviders(PathBuf),

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to serialize json: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ImportError {
    /// Wrap an I/O error with the path and the action that failed.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EnvRootNotFound(_) => ErrorCode::EnvRootNotFound,
            Self::NoEnvFiles { .. } => ErrorCode::NoEnvFiles,
            Self::DatabaseNotFound(_) => ErrorCode::DatabaseNotFound,
            Self::MissingProvidersTable(_) => ErrorCode::InvalidDatabase,
            Self::InvalidJson { .. } | Self::InvalidRoot(_) | Self::InvalidProviders(_) => {
                ErrorCode::InvalidDocument
            }
            Self::Io { .. } => ErrorCode::IoError,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Serialize(_) => ErrorCode::SerializationError,
        }
    }

    /// Process exit code for this error.
    ///
    /// A missing or empty env root exits with 2, everything else with 1.
    pub fn exit_code(&self) -> u8 {
        match self.code() {
            ErrorCode::EnvRootNotFound | ErrorCode::NoEnvFiles => 2,
            _ => 1,
        }
    }
}

/// Result type for import operations.
pub type ImportResult<T> = std::result::Result<T, ImportError>;
