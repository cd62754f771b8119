//! Storage backend capability contract.

use crate::error::PluginResult;
use crate::process::ProcessId;
use std::any::Any;
use std::path::Path;

/// The capability every storage backend must provide to be selectable.
///
/// A backend goes through a fixed two-phase startup before anything else in
/// the process may see it: `construct`, then `load_config`. Both phases take
/// `&mut self`, so once the host has published the backend behind a shared
/// reference neither can run again.
///
/// # Invariants
///
/// - `construct` runs exactly once per instance
/// - `load_config` runs only after `construct` has succeeded
/// - `can_be_used` never mutates backend state
/// - Backends must be `Send + Sync` so one instance can serve the whole process
///
/// # Implementors
///
/// - [`super::EmbeddedBackend`] - Built-in fallback, always usable
pub trait Storage: Send + Sync + Any {
    /// Returns a short human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// Allocates internal state for this process.
    ///
    /// # Arguments
    ///
    /// * `process_id` - Identity of the running process
    /// * `silent` - Whether the backend should suppress its own console output
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot allocate its state, or
    /// [`crate::PluginError::AlreadyConstructed`] if called a second time.
    fn construct(&mut self, process_id: &ProcessId, silent: bool) -> PluginResult<()>;

    /// Parses and applies the configuration file at `config_path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PluginError::Config`] if the file is missing,
    /// unreadable, or semantically invalid for this backend.
    fn load_config(&mut self, config_path: &Path) -> PluginResult<()>;

    /// Reports whether this backend is viable in the current environment.
    ///
    /// This is a pure probe: it may read `config_path` but must not change
    /// any state of the backend.
    fn can_be_used(&self, config_path: &Path) -> bool;

    /// Returns `self` as [`Any`] so consumers can reach the concrete engine.
    fn as_any(&self) -> &dyn Any;
}
