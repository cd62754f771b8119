//! Embedded in-memory fallback backend.

use crate::config::read_config_section;
use crate::error::{PluginError, PluginResult};
use crate::process::ProcessId;
use crate::storage::Storage;
use serde::Deserialize;
use std::any::Any;
use std::path::Path;
use tracing::debug;

/// Configuration section read by [`EmbeddedBackend`].
///
/// Lives under the `"embedded"` key of the configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddedConfig {
    /// Name of the in-memory database.
    #[serde(default = "default_database_name")]
    pub database_name: String,
}

fn default_database_name() -> String {
    "plinth".to_string()
}

impl Default for EmbeddedConfig {
    fn default() -> Self {
        Self {
            database_name: default_database_name(),
        }
    }
}

/// The built-in storage backend.
///
/// Always available and always eligible. The host falls back to it when no
/// external backend is installed, when the installed one reports that it
/// cannot be used, or when the process forces in-memory storage.
///
/// # Example
///
/// ```rust
/// use plinth_plugin::{EmbeddedBackend, ProcessId, Storage};
///
/// let mut backend = EmbeddedBackend::new();
/// backend.construct(&ProcessId::new(), true).unwrap();
/// assert!(!backend.is_ready());
/// ```
#[derive(Debug, Default)]
pub struct EmbeddedBackend {
    process_id: Option<ProcessId>,
    silent: bool,
    config: Option<EmbeddedConfig>,
}

impl EmbeddedBackend {
    /// Provider id under which the embedded backend is registered.
    pub const PROVIDER: &'static str = "plinth.embedded";

    /// Configuration section name.
    pub const CONFIG_SECTION: &'static str = "embedded";

    /// Creates a new, unconstructed embedded backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process id passed to `construct`, if it has run.
    #[must_use]
    pub fn process_id(&self) -> Option<&ProcessId> {
        self.process_id.as_ref()
    }

    /// Returns whether console output was silenced at construction.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Returns the loaded configuration, if `load_config` has run.
    #[must_use]
    pub fn config(&self) -> Option<&EmbeddedConfig> {
        self.config.as_ref()
    }

    /// Returns true once both startup phases have completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.process_id.is_some() && self.config.is_some()
    }
}

impl Storage for EmbeddedBackend {
    fn name(&self) -> &str {
        "embedded"
    }

    fn construct(&mut self, process_id: &ProcessId, silent: bool) -> PluginResult<()> {
        if self.process_id.is_some() {
            return Err(PluginError::AlreadyConstructed);
        }

        self.process_id = Some(*process_id);
        self.silent = silent;

        if !silent {
            debug!(%process_id, "embedded backend constructed");
        }
        Ok(())
    }

    fn load_config(&mut self, config_path: &Path) -> PluginResult<()> {
        if self.process_id.is_none() {
            return Err(PluginError::NotConstructed);
        }

        let config: EmbeddedConfig = read_config_section(config_path, Self::CONFIG_SECTION)?;
        if config.database_name.trim().is_empty() {
            return Err(PluginError::config(
                config_path,
                "embedded.database_name must not be empty",
            ));
        }

        if !self.silent {
            debug!(database = %config.database_name, "embedded backend configured");
        }
        self.config = Some(config);
        Ok(())
    }

    fn can_be_used(&self, _config_path: &Path) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("config.json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn embedded_new_is_unconstructed() {
        let backend = EmbeddedBackend::new();
        assert!(backend.process_id().is_none());
        assert!(backend.config().is_none());
        assert!(!backend.is_ready());
    }

    #[test]
    fn embedded_two_phase_startup() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"embedded": {"database_name": "cache"}}"#);
        let pid = ProcessId::new();

        let mut backend = EmbeddedBackend::new();
        backend.construct(&pid, true).unwrap();
        backend.load_config(&path).unwrap();

        assert!(backend.is_ready());
        assert!(backend.is_silent());
        assert_eq!(backend.process_id(), Some(&pid));
        assert_eq!(backend.config().unwrap().database_name, "cache");
    }

    #[test]
    fn embedded_construct_twice_fails() {
        let mut backend = EmbeddedBackend::new();
        backend.construct(&ProcessId::new(), false).unwrap();

        let result = backend.construct(&ProcessId::new(), false);
        assert!(matches!(result, Err(PluginError::AlreadyConstructed)));
    }

    #[test]
    fn embedded_load_before_construct_fails() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "{}");

        let mut backend = EmbeddedBackend::new();
        let result = backend.load_config(&path);
        assert!(matches!(result, Err(PluginError::NotConstructed)));
        assert!(backend.config().is_none());
    }

    #[test]
    fn embedded_missing_section_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"postgresql": {"host": "db"}}"#);

        let mut backend = EmbeddedBackend::new();
        backend.construct(&ProcessId::new(), true).unwrap();
        backend.load_config(&path).unwrap();

        assert_eq!(backend.config(), Some(&EmbeddedConfig::default()));
    }

    #[test]
    fn embedded_missing_file_is_config_error() {
        let dir = tempdir().unwrap();
        let mut backend = EmbeddedBackend::new();
        backend.construct(&ProcessId::new(), true).unwrap();

        let result = backend.load_config(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(PluginError::Config { .. })));
    }

    #[test]
    fn embedded_rejects_unknown_section_fields() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"embedded": {"size": 3}}"#);

        let mut backend = EmbeddedBackend::new();
        backend.construct(&ProcessId::new(), true).unwrap();
        assert!(matches!(
            backend.load_config(&path),
            Err(PluginError::Config { .. })
        ));
    }

    #[test]
    fn embedded_rejects_empty_database_name() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"embedded": {"database_name": "  "}}"#);

        let mut backend = EmbeddedBackend::new();
        backend.construct(&ProcessId::new(), true).unwrap();
        assert!(matches!(
            backend.load_config(&path),
            Err(PluginError::Config { .. })
        ));
    }

    #[test]
    fn embedded_is_always_usable() {
        let backend = EmbeddedBackend::new();
        assert!(backend.can_be_used(Path::new("/does/not/exist.json")));
    }

    #[test]
    fn embedded_downcasts_through_any() {
        let backend: Box<dyn Storage> = Box::new(EmbeddedBackend::new());
        assert!(backend.as_any().downcast_ref::<EmbeddedBackend>().is_some());
    }
}
