//! Backend module discovery.
//!
//! Discovery turns a plugin directory into a lazily enumerated set of
//! backend candidates:
//!
//! ```text
//! <plugin_dir>/
//! ├─ postgresql.plugin   # JSON manifest naming one or more provider ids
//! └─ README.md           # ignored: wrong suffix
//! ```
//!
//! Listing the directory is strict. A directory that cannot be listed is a
//! discovery failure; a directory with no module files is simply empty.

mod loader;
mod manifest;
mod provider;

pub use loader::{ManifestLoader, ModuleLoader, ModuleNamespace, NamespaceEntry};
pub use manifest::ModuleManifest;
pub use provider::{BackendFactory, ProviderRegistry};

use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-name suffix recognized as a module, compared case-insensitively.
pub const MODULE_SUFFIX: &str = ".plugin";

/// Lists the module files in `dir`, sorted by path.
///
/// # Errors
///
/// Returns `DiscoveryFailed` if `dir` does not exist, is not a directory,
/// or cannot be read, and `InvalidModule` for a module entry that cannot be
/// inspected, such as a dangling symlink.
pub fn scan_modules(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let failed = |source| CoreError::DiscoveryFailed {
        path: dir.to_path_buf(),
        source,
    };

    let mut modules = Vec::new();
    for entry in fs::read_dir(dir).map_err(failed)? {
        let path = entry.map_err(failed)?.path();

        if !is_module_file(&path) {
            continue;
        }
        // Follows symlinks, so a link to a directory is skipped like the directory.
        let metadata = fs::metadata(&path)
            .map_err(|e| CoreError::invalid_module(&path, format!("cannot stat: {e}")))?;
        if !metadata.is_dir() {
            modules.push(path);
        }
    }

    modules.sort();
    debug!(dir = %dir.display(), count = modules.len(), "scanned plugin directory");
    Ok(modules)
}

/// Scans `dir` and loads every module into one namespace.
///
/// # Errors
///
/// Returns a discovery error if the directory cannot be listed or a module
/// cannot be loaded.
pub fn discover(dir: &Path, loader: &dyn ModuleLoader) -> CoreResult<ModuleNamespace> {
    let modules = scan_modules(dir)?;
    loader.load(&modules)
}

fn is_module_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|name| name.ends_with(MODULE_SUFFIX))
}
