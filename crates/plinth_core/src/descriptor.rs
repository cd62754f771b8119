//! Backend candidates and the selected backend.

use plinth_plugin::{EmbeddedBackend, Storage};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a backend came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendOrigin {
    /// Supplied by a module in the plugin directory.
    External {
        /// Path of the module file.
        module: PathBuf,
        /// Provider id the module declared.
        provider: String,
    },
    /// The built-in embedded backend.
    Embedded,
}

impl BackendOrigin {
    /// Returns true for the built-in embedded backend.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded)
    }
}

impl fmt::Display for BackendOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External { module, provider } => {
                write!(f, "{} ({provider})", module.display())
            }
            Self::Embedded => f.write_str("embedded"),
        }
    }
}

/// A discovered, not yet selected, backend.
///
/// Exists only while the storage layer is being resolved.
pub struct BackendDescriptor {
    storage: Box<dyn Storage>,
    origin: BackendOrigin,
}

impl BackendDescriptor {
    /// Creates a descriptor for an externally supplied backend.
    #[must_use]
    pub fn external(
        storage: Box<dyn Storage>,
        module: impl Into<PathBuf>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            origin: BackendOrigin::External {
                module: module.into(),
                provider: provider.into(),
            },
        }
    }

    /// Creates a descriptor for a fresh embedded backend.
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            storage: Box::new(EmbeddedBackend::new()),
            origin: BackendOrigin::Embedded,
        }
    }

    /// Returns the candidate backend.
    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Returns where the candidate came from.
    #[must_use]
    pub fn origin(&self) -> &BackendOrigin {
        &self.origin
    }

    pub(crate) fn into_parts(self) -> (Box<dyn Storage>, BackendOrigin) {
        (self.storage, self.origin)
    }
}

impl fmt::Debug for BackendDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendDescriptor")
            .field("name", &self.storage.name())
            .field("origin", &self.origin)
            .finish()
    }
}

/// The backend chosen for a process, after both startup phases ran.
///
/// Only the lifecycle initializer can produce one, so holding a
/// `SelectedBackend` proves `construct` and `load_config` both succeeded.
#[derive(Clone)]
pub struct SelectedBackend {
    storage: Arc<dyn Storage>,
    origin: BackendOrigin,
}

impl SelectedBackend {
    pub(crate) fn new(storage: Arc<dyn Storage>, origin: BackendOrigin) -> Self {
        Self { storage, origin }
    }

    /// Returns a shared handle to the backend.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Returns where the backend came from.
    #[must_use]
    pub fn origin(&self) -> &BackendOrigin {
        &self.origin
    }
}

impl fmt::Debug for SelectedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedBackend")
            .field("name", &self.storage.name())
            .field("origin", &self.origin)
            .finish()
    }
}
