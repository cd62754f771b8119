//! Two-phase backend startup.

use crate::descriptor::{BackendDescriptor, SelectedBackend};
use crate::error::{CoreError, CoreResult};
use plinth_plugin::ProcessId;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Runs `construct` then `load_config` on the chosen backend.
///
/// The backend is only moved behind a shared `Arc` after both phases
/// succeed. On failure it is dropped; there is no rollback.
///
/// # Errors
///
/// Returns `Construction` if `construct` fails, or `Configuration` if
/// `load_config` fails. `load_config` is never called after a failed
/// `construct`.
pub fn initialize(
    descriptor: BackendDescriptor,
    process_id: &ProcessId,
    silent: bool,
    config_path: &Path,
) -> CoreResult<SelectedBackend> {
    let (mut storage, origin) = descriptor.into_parts();
    let backend = storage.name().to_string();

    storage
        .construct(process_id, silent)
        .map_err(|source| CoreError::Construction {
            backend: backend.clone(),
            source,
        })?;
    debug!(%backend, "backend constructed");

    storage
        .load_config(config_path)
        .map_err(|source| CoreError::Configuration {
            backend: backend.clone(),
            path: config_path.to_path_buf(),
            source,
        })?;
    debug!(%backend, config = %config_path.display(), "backend configuration loaded");

    Ok(SelectedBackend::new(Arc::from(storage), origin))
}
