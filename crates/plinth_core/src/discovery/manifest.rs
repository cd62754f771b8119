//! Module manifest format.
//!
//! Every module file in the plugin directory is a small JSON document that
//! names the backend implementations the module ships:
//!
//! ```text
//! {
//!   "name": "postgresql-plugin",
//!   "version": "4.0.1",
//!   "provides": ["acme.postgresql"]
//! }
//! ```

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parsed content of one module file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleManifest {
    /// Module name, for diagnostics only.
    pub name: String,
    /// Module version, for diagnostics only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Provider ids of the backends this module ships.
    #[serde(default)]
    pub provides: Vec<String>,
}

impl ModuleManifest {
    /// Creates a manifest.
    pub fn new(
        name: impl Into<String>,
        provides: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            version: None,
            provides: provides.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Reads and validates the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidModule` if the file cannot be read, is not a valid
    /// manifest, has an empty name, or lists an empty provider id.
    pub fn read(path: &Path) -> CoreResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| CoreError::invalid_module(path, format!("cannot read: {e}")))?;
        Self::parse(path, &text)
    }

    fn parse(path: &Path, text: &str) -> CoreResult<Self> {
        let manifest: Self = serde_json::from_str(text)
            .map_err(|e| CoreError::invalid_module(path, format!("invalid manifest: {e}")))?;

        if manifest.name.trim().is_empty() {
            return Err(CoreError::invalid_module(path, "module name is empty"));
        }
        if manifest.provides.iter().any(|p| p.trim().is_empty()) {
            return Err(CoreError::invalid_module(path, "empty provider id"));
        }

        Ok(manifest)
    }

    /// Serializes the manifest as pretty JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        // Serializing plain strings cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> CoreResult<ModuleManifest> {
        ModuleManifest::parse(Path::new("test.plugin"), text)
    }

    #[test]
    fn parses_full_manifest() {
        let manifest =
            parse(r#"{"name": "pg", "version": "1.2.0", "provides": ["acme.pg"]}"#).unwrap();
        assert_eq!(manifest.name, "pg");
        assert_eq!(manifest.version.as_deref(), Some("1.2.0"));
        assert_eq!(manifest.provides, vec!["acme.pg"]);
    }

    #[test]
    fn provides_defaults_to_empty() {
        let manifest = parse(r#"{"name": "docs-only"}"#).unwrap();
        assert!(manifest.provides.is_empty());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse("not json"),
            Err(CoreError::InvalidModule { .. })
        ));
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(matches!(
            parse(r#"{"name": "pg", "main": "lib.so"}"#),
            Err(CoreError::InvalidModule { .. })
        ));
    }

    #[test]
    fn rejects_empty_name_and_provider() {
        assert!(parse(r#"{"name": " ", "provides": []}"#).is_err());
        assert!(parse(r#"{"name": "pg", "provides": [""]}"#).is_err());
    }

    #[test]
    fn json_output_parses_back() {
        let manifest = ModuleManifest::new("pg", ["acme.pg"]).with_version("2.0");
        assert_eq!(parse(&manifest.to_json()).unwrap(), manifest);
    }
}
