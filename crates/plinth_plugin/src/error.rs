//! Error types for backend lifecycle operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for backend lifecycle operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors a storage backend can report while it is being brought up.
#[derive(Debug, Error)]
pub enum PluginError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The configuration file is missing, unreadable, or invalid.
    #[error("configuration error in {}: {message}", .path.display())]
    Config {
        /// The configuration file that was being loaded.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },

    /// `construct` was called on an instance that was already constructed.
    #[error("backend already constructed")]
    AlreadyConstructed,

    /// `load_config` was called before `construct`.
    #[error("backend not constructed")]
    NotConstructed,

    /// Backend-specific failure.
    #[error("backend error: {0}")]
    Backend(String),
}

impl PluginError {
    /// Creates a configuration error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a backend-specific error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
