//! Shared helpers for reading backend configuration files.
//!
//! A configuration file is a single JSON object. Each backend owns one
//! top-level section and ignores the rest, so several backends can share
//! one file across installations.

use crate::error::{PluginError, PluginResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Reads the configuration document at `path`.
///
/// # Errors
///
/// Returns [`PluginError::Config`] if the file cannot be read, is not valid
/// JSON, or its top level is not an object.
pub fn read_config_document(path: &Path) -> PluginResult<Value> {
    let text = fs::read_to_string(path)
        .map_err(|e| PluginError::config(path, format!("cannot read file: {e}")))?;

    let document: Value = serde_json::from_str(&text)
        .map_err(|e| PluginError::config(path, format!("invalid JSON: {e}")))?;

    if !document.is_object() {
        return Err(PluginError::config(path, "top level must be a JSON object"));
    }

    Ok(document)
}

/// Reads the configuration document and deserializes one section of it.
///
/// A missing section yields `T::default()`.
///
/// # Errors
///
/// Returns [`PluginError::Config`] if the document cannot be read or the
/// section does not match `T`.
pub fn read_config_section<T>(path: &Path, section: &str) -> PluginResult<T>
where
    T: DeserializeOwned + Default,
{
    let document = read_config_document(path)?;
    match document.get(section) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            PluginError::config(path, format!("invalid \"{section}\" section: {e}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Section {
        #[serde(default)]
        port: u16,
    }

    #[test]
    fn reads_object_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"postgres": {"port": 5432}}"#).unwrap();

        let document = read_config_document(&path).unwrap();
        assert_eq!(document["postgres"]["port"], 5432);
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempdir().unwrap();
        let result = read_config_document(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(PluginError::Config { .. })));
    }

    #[test]
    fn malformed_json_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            read_config_document(&path),
            Err(PluginError::Config { .. })
        ));
    }

    #[test]
    fn non_object_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(matches!(
            read_config_document(&path),
            Err(PluginError::Config { .. })
        ));
    }

    #[test]
    fn missing_section_is_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"other": true}"#).unwrap();

        let section: Section = read_config_section(&path, "postgres").unwrap();
        assert_eq!(section, Section::default());
    }

    #[test]
    fn mistyped_section_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"postgres": {"port": "high"}}"#).unwrap();

        let result: PluginResult<Section> = read_config_section(&path, "postgres");
        assert!(matches!(result, Err(PluginError::Config { .. })));
    }
}
