//! Store error handling
//!
//! Provides typed errors for store operations with descriptive messages
//! and recovery suggestions.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing a store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store cannot be reached at all
    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Store file is not valid JSON, or not a string map
    #[error("Invalid store format in '{path}': {details}")]
    InvalidFormat { path: PathBuf, details: String },

    /// File not found (when expected to exist)
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind. `writing` picks between
    /// `WriteError` and `ReadError` for the unclassified remainder.
    pub fn from_io(error: io::Error, path: PathBuf, writing: bool) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => StoreError::NotFound { path },
            _ if writing => StoreError::WriteError {
                path,
                source: error,
            },
            _ => StoreError::ReadError {
                path,
                source: error,
            },
        }
    }

    /// Whether the store itself cannot be used
    ///
    /// Everything except a malformed store file counts: the data may be fine,
    /// the medium is not.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, StoreError::InvalidFormat { .. })
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StoreError::PermissionDenied { .. } => {
                Some("Check file and directory permissions for the data directory.")
            }
            StoreError::InvalidFormat { .. } => {
                Some("The store file is damaged. Move it aside to start with an empty store.")
            }
            StoreError::Database(_) => {
                Some("The SQLite store could not be used. Check that no other process holds a lock on it.")
            }
            _ => None,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
