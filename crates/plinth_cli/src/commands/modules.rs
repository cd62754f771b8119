//! Modules command implementation.

use crate::Format;
use plinth_core::discovery::{scan_modules, ModuleLoader};
use plinth_core::{CoreResult, ManifestLoader};
use serde::Serialize;
use std::path::Path;

/// One backend declared by an installed module.
#[derive(Debug, Serialize)]
pub struct ModuleEntry {
    /// Module file path.
    pub module: String,
    /// Module name from its manifest.
    pub name: String,
    /// Declared provider id.
    pub provider: String,
    /// Whether this build knows the provider.
    pub resolved: bool,
}

/// Lists what the plugin directory declares, without selecting a backend.
pub fn list(plugin_dir: &Path, loader: &dyn ModuleLoader) -> CoreResult<Vec<ModuleEntry>> {
    let files = scan_modules(plugin_dir)?;
    let namespace = loader.load(&files)?;

    Ok(namespace
        .entries()
        .iter()
        .map(|entry| ModuleEntry {
            module: entry.module().display().to_string(),
            name: entry.module_name().to_string(),
            provider: entry.provider().to_string(),
            resolved: entry.is_resolved(),
        })
        .collect())
}

/// Runs the modules command with the built-in provider table.
pub fn run(plugin_dir: &Path, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let entries = list(plugin_dir, &ManifestLoader::builtin())?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        Format::Text => {
            if entries.is_empty() {
                println!("No backend modules in {}", plugin_dir.display());
            }
            for entry in &entries {
                let status = if entry.resolved { "ok" } else { "unknown provider" };
                println!("{}  {}  {}  [{}]", entry.module, entry.name, entry.provider, status);
            }
            if entries.len() > 1 {
                println!(
                    "warning: {} backends declared; startup requires exactly one",
                    entries.len()
                );
            }
        }
    }

    Ok(())
}
