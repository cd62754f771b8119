//! Process context.

use crate::discovery::{ManifestLoader, ModuleLoader};
use crate::options::ContextOptions;
use crate::registry::ResourceRegistry;
use plinth_plugin::ProcessId;
use std::sync::Arc;

/// One running instance of the application.
///
/// Owns the identity, the startup flags, the module-loading capability, and
/// the [`ResourceRegistry`] that holds per-process singletons. Nothing here
/// is global: two contexts in the same process (for example in tests) are
/// fully independent.
///
/// # Example
///
/// ```rust
/// use plinth_core::{ContextOptions, ProcessContext};
///
/// let ctx = ProcessContext::builder()
///     .options(ContextOptions::new().force_embedded(true))
///     .build();
/// assert!(ctx.options().force_embedded);
/// ```
pub struct ProcessContext {
    process_id: ProcessId,
    options: ContextOptions,
    loader: Arc<dyn ModuleLoader>,
    resources: ResourceRegistry,
}

impl ProcessContext {
    /// Creates a context with a fresh process id, default options, and the
    /// built-in provider table.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building a context.
    #[must_use]
    pub fn builder() -> ProcessContextBuilder {
        ProcessContextBuilder::default()
    }

    /// Returns the process id.
    #[must_use]
    pub fn process_id(&self) -> &ProcessId {
        &self.process_id
    }

    /// Returns the startup options.
    #[must_use]
    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// Returns the module loader used for backend discovery.
    #[must_use]
    pub fn loader(&self) -> &dyn ModuleLoader {
        self.loader.as_ref()
    }

    /// Returns the per-context resource registry.
    #[must_use]
    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }
}

impl Default for ProcessContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProcessContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessContext")
            .field("process_id", &self.process_id)
            .field("options", &self.options)
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ProcessContext`].
#[derive(Default)]
pub struct ProcessContextBuilder {
    process_id: Option<ProcessId>,
    options: ContextOptions,
    loader: Option<Arc<dyn ModuleLoader>>,
}

impl ProcessContextBuilder {
    /// Uses a specific process id instead of a random one.
    #[must_use]
    pub fn process_id(mut self, process_id: ProcessId) -> Self {
        self.process_id = Some(process_id);
        self
    }

    /// Sets the startup options.
    #[must_use]
    pub fn options(mut self, options: ContextOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the module loader used for discovery.
    #[must_use]
    pub fn loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Sets a shared module loader.
    #[must_use]
    pub fn shared_loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Builds the context.
    #[must_use]
    pub fn build(self) -> ProcessContext {
        ProcessContext {
            process_id: self.process_id.unwrap_or_default(),
            options: self.options,
            loader: self
                .loader
                .unwrap_or_else(|| Arc::new(ManifestLoader::builtin())),
            resources: ResourceRegistry::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contexts_have_distinct_identities() {
        let a = ProcessContext::new();
        let b = ProcessContext::new();
        assert_ne!(a.process_id(), b.process_id());
    }

    #[test]
    fn builder_sets_fields() {
        let pid = ProcessId::new();
        let ctx = ProcessContext::builder()
            .process_id(pid)
            .options(ContextOptions::new().silent(true))
            .build();

        assert_eq!(ctx.process_id(), &pid);
        assert!(ctx.options().silent);
        assert!(ctx.resources().is_empty());
    }

    #[test]
    fn contexts_do_not_share_registries() {
        let a = ProcessContext::new();
        let b = ProcessContext::new();

        a.resources()
            .get_or_try_init::<u8, crate::CoreError, _>("key", || Ok(1))
            .unwrap();

        assert!(a.resources().contains("key"));
        assert!(!b.resources().contains("key"));
    }
}
