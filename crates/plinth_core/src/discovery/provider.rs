//! Provider table: backend factories the host program links in.

use plinth_plugin::{EmbeddedBackend, Storage};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Creates a fresh, unconstructed backend instance.
pub type BackendFactory = Arc<dyn Fn() -> Box<dyn Storage> + Send + Sync>;

/// Maps provider ids to backend factories.
///
/// Module manifests name providers by id; the loader resolves those ids
/// here. A factory is only invoked when its candidate is actually pulled
/// from a namespace.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, BackendFactory>,
}

impl ProviderRegistry {
    /// Creates an empty provider table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding the built-in providers.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new().with(EmbeddedBackend::PROVIDER, || Box::new(EmbeddedBackend::new()))
    }

    /// Registers a factory under `id`, replacing any previous one.
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Storage> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
    }

    /// Registers a factory and returns the table.
    #[must_use]
    pub fn with<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Storage> + Send + Sync + 'static,
    {
        self.register(id, factory);
        self
    }

    /// Returns the factory registered under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<BackendFactory> {
        self.factories.get(id).cloned()
    }

    /// Returns true if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Returns the registered ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}
