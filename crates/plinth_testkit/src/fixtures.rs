//! Plugin directory and configuration fixtures.
//!
//! Provides a temporary installation layout:
//!
//! ```text
//! <tmp>/
//! ├─ plugin/          # modules_path()
//! │  └─ *.plugin
//! └─ config.json      # write_config()
//! ```

use plinth_core::ModuleManifest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary installation with a plugin directory and automatic cleanup.
pub struct PluginDir {
    temp_dir: TempDir,
    modules: PathBuf,
}

impl PluginDir {
    /// Creates a temporary installation with an empty plugin directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let modules = temp_dir.path().join("plugin");
        fs::create_dir(&modules).expect("Failed to create plugin directory");
        Self { temp_dir, modules }
    }

    /// Returns the installation root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Returns the plugin directory.
    pub fn modules_path(&self) -> &Path {
        &self.modules
    }

    /// Returns a path inside the root that does not exist.
    pub fn missing_path(&self) -> PathBuf {
        self.root().join("does-not-exist")
    }

    /// Writes a module manifest into the plugin directory.
    pub fn add_module(&self, file: &str, name: &str, provides: &[&str]) -> PathBuf {
        let manifest = ModuleManifest::new(name, provides.iter().copied());
        self.add_file(file, &manifest.to_json())
    }

    /// Writes an arbitrary file into the plugin directory.
    pub fn add_file(&self, file: &str, contents: &str) -> PathBuf {
        let path = self.modules.join(file);
        fs::write(&path, contents).expect("Failed to write plugin file");
        path
    }

    /// Writes `config.json` at the root and returns its path.
    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.root().join("config.json");
        fs::write(&path, contents).expect("Failed to write config");
        path
    }

    /// Writes an empty JSON object as `config.json`.
    pub fn default_config(&self) -> PathBuf {
        self.write_config(&serde_json::json!({}).to_string())
    }
}

impl Default for PluginDir {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_created() {
        let dir = PluginDir::new();
        assert!(dir.modules_path().is_dir());
        assert!(!dir.missing_path().exists());
    }

    #[test]
    fn module_round_trips_through_manifest() {
        let dir = PluginDir::new();
        let path = dir.add_module("pg.plugin", "pg", &["acme.pg"]);
        let manifest = ModuleManifest::read(&path).unwrap();
        assert_eq!(manifest.name, "pg");
        assert_eq!(manifest.provides, vec!["acme.pg"]);
    }

    #[test]
    fn config_is_written_at_root() {
        let dir = PluginDir::new();
        let path = dir.default_config();
        assert_eq!(path.parent(), Some(dir.root()));
        assert_eq!(fs::read_to_string(path).unwrap(), "{}");
    }
}
