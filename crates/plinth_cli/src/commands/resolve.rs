//! Resolve command implementation.

use crate::Format;
use plinth_core::{BackendOrigin, ContextOptions, CoreResult, ProcessContext, StorageLayer};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Outcome of resolving the storage layer.
#[derive(Debug, Serialize)]
pub struct ResolveReport {
    /// Name reported by the selected backend.
    pub backend: String,
    /// Where the backend came from.
    pub origin: BackendOrigin,
    /// Process id handed to `construct`.
    pub process_id: String,
    /// Plugin directory that was scanned.
    pub plugin_dir: String,
    /// Configuration file that was loaded.
    pub config: String,
}

/// Resolves the storage layer for `ctx` and describes the result.
pub fn resolve(
    ctx: &ProcessContext,
    plugin_dir: &Path,
    config: &Path,
) -> CoreResult<ResolveReport> {
    let layer = StorageLayer::init(ctx, plugin_dir, config)?;

    Ok(ResolveReport {
        backend: layer.storage().name().to_string(),
        origin: layer.origin().clone(),
        process_id: ctx.process_id().to_string(),
        plugin_dir: plugin_dir.display().to_string(),
        config: config.display().to_string(),
    })
}

/// Runs the resolve command with the built-in provider table.
///
/// Modules naming any provider other than the embedded one fail with
/// `UnknownProvider`.
pub fn run(
    plugin_dir: &Path,
    config: &Path,
    options: ContextOptions,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = ProcessContext::builder().options(options).build();
    info!(process_id = %ctx.process_id(), "resolving storage layer");

    let report = resolve(&ctx, plugin_dir, config)?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => {
            println!("✓ Storage layer ready");
            println!("  Backend: {}", report.backend);
            println!("  Origin: {}", report.origin);
            println!("  Process: {}", report.process_id);
            println!("  Plugins: {}", report.plugin_dir);
            println!("  Config: {}", report.config);
        }
    }

    Ok(())
}
