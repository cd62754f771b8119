//! The storage layer: the per-process backend singleton.

use crate::context::ProcessContext;
use crate::descriptor::{BackendOrigin, SelectedBackend};
use crate::discovery::discover;
use crate::error::CoreResult;
use crate::lifecycle::initialize;
use crate::selector::{select, SelectionPolicy};
use plinth_plugin::Storage;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// The storage backend published for one [`ProcessContext`].
///
/// # Lifecycle
///
/// 1. Early in startup, call [`StorageLayer::init`] once with the plugin
///    directory and configuration path.
/// 2. Everywhere else, call [`StorageLayer::get`].
///
/// `init` is idempotent: once a backend is published, further calls return
/// it without rediscovering modules or re-running either startup phase,
/// whatever arguments they pass.
///
/// # Example
///
/// ```rust,ignore
/// use plinth_core::{ProcessContext, StorageLayer};
/// use std::path::Path;
///
/// let ctx = ProcessContext::new();
/// StorageLayer::init(&ctx, Path::new("plugin"), Path::new("config.json"))?;
///
/// let storage = StorageLayer::get(&ctx)?;
/// println!("using {}", storage.name());
/// ```
pub struct StorageLayer {
    selected: SelectedBackend,
}

impl StorageLayer {
    /// Registry key the storage layer is published under.
    pub const RESOURCE_KEY: &'static str = "plinth.storage_layer";

    /// Resolves, initializes, and publishes the backend for `ctx`.
    ///
    /// Runs discovery, selection, and the two startup phases while holding
    /// the initialization lock for [`Self::RESOURCE_KEY`]. Returns the already-published
    /// layer immediately if there is one.
    ///
    /// # Errors
    ///
    /// Returns any discovery, selection, construction, or configuration
    /// error. Nothing is published on error.
    pub fn init(
        ctx: &ProcessContext,
        plugin_dir: &Path,
        config_path: &Path,
    ) -> CoreResult<Arc<Self>> {
        ctx.resources()
            .get_or_try_init(Self::RESOURCE_KEY, || Self::resolve(ctx, plugin_dir, config_path))
    }

    fn resolve(ctx: &ProcessContext, plugin_dir: &Path, config_path: &Path) -> CoreResult<Self> {
        info!(plugin_dir = %plugin_dir.display(), "Loading storage layer");

        let namespace = discover(plugin_dir, ctx.loader())?;
        let options = ctx.options();
        let chosen = select(
            namespace.backends(),
            plugin_dir,
            config_path,
            SelectionPolicy::from(options),
        )?;
        let selected = initialize(chosen, ctx.process_id(), options.silent, config_path)?;

        info!(
            backend = selected.storage().name(),
            origin = %selected.origin(),
            process_id = %ctx.process_id(),
            "storage layer ready"
        );
        Ok(Self { selected })
    }

    /// Returns the published layer for `ctx`.
    ///
    /// # Errors
    ///
    /// Returns `UninitializedAccess` if [`StorageLayer::init`] has not
    /// completed successfully for `ctx`.
    pub fn layer(ctx: &ProcessContext) -> CoreResult<Arc<Self>> {
        ctx.resources().get_typed(Self::RESOURCE_KEY)
    }

    /// Returns the published backend for `ctx`.
    ///
    /// # Errors
    ///
    /// Returns `UninitializedAccess` if [`StorageLayer::init`] has not
    /// completed successfully for `ctx`.
    pub fn get(ctx: &ProcessContext) -> CoreResult<Arc<dyn Storage>> {
        Ok(Arc::clone(Self::layer(ctx)?.storage()))
    }

    /// Returns true if a backend has been published for `ctx`.
    #[must_use]
    pub fn is_initialized(ctx: &ProcessContext) -> bool {
        ctx.resources().contains(Self::RESOURCE_KEY)
    }

    /// Returns the backend.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        self.selected.storage()
    }

    /// Returns where the backend came from.
    #[must_use]
    pub fn origin(&self) -> &BackendOrigin {
        self.selected.origin()
    }

    /// Returns true if the embedded fallback was chosen.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.selected.origin().is_embedded()
    }
}

impl std::fmt::Debug for StorageLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageLayer")
            .field("selected", &self.selected)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::options::ContextOptions;
    use plinth_plugin::EmbeddedBackend;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn get_before_init_is_uninitialized() {
        let ctx = ProcessContext::new();
        assert!(matches!(
            StorageLayer::get(&ctx),
            Err(CoreError::UninitializedAccess { .. })
        ));
        assert!(!StorageLayer::is_initialized(&ctx));
    }

    #[test]
    fn forced_embedded_with_empty_directory() {
        let temp = tempdir().unwrap();
        let plugins = temp.path().join("plugin");
        fs::create_dir(&plugins).unwrap();
        let config = temp.path().join("config.json");
        fs::write(&config, "{}").unwrap();

        let ctx = ProcessContext::builder()
            .options(ContextOptions::new().force_embedded(true).silent(true))
            .build();

        let layer = StorageLayer::init(&ctx, &plugins, &config).unwrap();
        assert!(layer.is_embedded());

        let storage = StorageLayer::get(&ctx).unwrap();
        let embedded = storage.as_any().downcast_ref::<EmbeddedBackend>().unwrap();
        assert!(embedded.is_ready());
        assert!(embedded.is_silent());
        assert_eq!(embedded.process_id(), Some(ctx.process_id()));
    }

    #[test]
    fn failed_init_publishes_nothing() {
        let temp = tempdir().unwrap();
        let ctx = ProcessContext::builder()
            .options(ContextOptions::new().force_embedded(true))
            .build();

        let result = StorageLayer::init(&ctx, &temp.path().join("missing"), Path::new("c.json"));
        assert!(matches!(result, Err(CoreError::DiscoveryFailed { .. })));
        assert!(!StorageLayer::is_initialized(&ctx));
    }
}
