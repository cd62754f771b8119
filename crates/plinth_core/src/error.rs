//! Error types for Plinth core.

use plinth_plugin::PluginError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while resolving and publishing the storage layer.
///
/// Every variant is fatal to process startup: none are retried and none
/// are swallowed.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The plugin directory could not be listed.
    #[error("cannot list plugin directory {}: {source}", .path.display())]
    DiscoveryFailed {
        /// The directory that was scanned.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A module file could not be read or parsed.
    #[error("invalid module {}: {message}", .path.display())]
    InvalidModule {
        /// Path of the module file.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },

    /// A module names a provider the host does not know.
    #[error("module {} provides unknown backend {provider:?}", .module.display())]
    UnknownProvider {
        /// Path of the module file.
        module: PathBuf,
        /// The provider id that could not be resolved.
        provider: String,
    },

    /// No external backend was found and no fallback applies.
    #[error(
        "no database plugin found in {}; please reinstall or add a backend module",
        .plugin_dir.display()
    )]
    NoBackendFound {
        /// The directory that was scanned.
        plugin_dir: PathBuf,
    },

    /// More than one external backend was found.
    #[error(
        "multiple database plugins found ({}); exactly one backend module may be installed",
        .candidates.join(", ")
    )]
    AmbiguousBackend {
        /// Descriptions of the conflicting candidates.
        candidates: Vec<String>,
    },

    /// The selected backend failed to construct.
    #[error("backend {backend} failed to construct: {source}")]
    Construction {
        /// Name of the backend.
        backend: String,
        /// The backend's error.
        #[source]
        source: PluginError,
    },

    /// The selected backend failed to load its configuration.
    #[error("backend {backend} failed to load configuration {}: {source}", .path.display())]
    Configuration {
        /// Name of the backend.
        backend: String,
        /// The configuration file.
        path: PathBuf,
        /// The backend's error.
        #[source]
        source: PluginError,
    },

    /// A resource was read before it was initialized.
    #[error("resource {key} accessed before init() completed")]
    UninitializedAccess {
        /// The resource key.
        key: String,
    },

    /// A resource exists under the key but has a different type.
    #[error("resource {key} holds a value of an unexpected type")]
    ResourceTypeMismatch {
        /// The resource key.
        key: String,
    },
}

impl CoreError {
    /// Creates an invalid module error.
    pub fn invalid_module(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidModule {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an uninitialized access error.
    pub fn uninitialized(key: impl Into<String>) -> Self {
        Self::UninitializedAccess { key: key.into() }
    }

    /// Returns true if the error came from scanning or loading modules.
    #[must_use]
    pub fn is_discovery_failure(&self) -> bool {
        matches!(
            self,
            Self::DiscoveryFailed { .. } | Self::InvalidModule { .. } | Self::UnknownProvider { .. }
        )
    }
}
