//! Module loading and the namespace of loaded backends.

use super::manifest::ModuleManifest;
use super::provider::{BackendFactory, ProviderRegistry};
use crate::descriptor::BackendDescriptor;
use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads module files and exposes the backends they provide.
///
/// This is the only seam between Plinth and whatever mechanism actually
/// brings backend code into the process. Implementations must not evaluate
/// backend eligibility; that is left to the selector.
pub trait ModuleLoader: Send + Sync {
    /// Loads every file in `modules` into one fresh namespace.
    ///
    /// # Errors
    ///
    /// Returns a discovery error if any module cannot be loaded.
    fn load(&self, modules: &[PathBuf]) -> CoreResult<ModuleNamespace>;
}

/// One backend implementation declared by a loaded module.
pub struct NamespaceEntry {
    module: PathBuf,
    module_name: String,
    provider: String,
    factory: Option<BackendFactory>,
}

impl NamespaceEntry {
    /// Returns the path of the module that declared this entry.
    #[must_use]
    pub fn module(&self) -> &Path {
        &self.module
    }

    /// Returns the declaring module's name.
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Returns the provider id.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Returns true if the provider id resolved to a factory.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.factory.is_some()
    }

    fn instantiate(&self) -> CoreResult<BackendDescriptor> {
        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| CoreError::UnknownProvider {
                module: self.module.clone(),
                provider: self.provider.clone(),
            })?;

        debug!(module = %self.module.display(), provider = %self.provider, "instantiating backend");
        Ok(BackendDescriptor::external(factory(), self.module.clone(), self.provider.clone()))
    }
}

/// An isolated set of loaded modules.
///
/// Each call to [`ModuleLoader::load`] produces its own namespace. Entries
/// are identified by module path and provider id, so two modules that share
/// a name never shadow each other.
#[derive(Default)]
pub struct ModuleNamespace {
    entries: Vec<NamespaceEntry>,
}

impl ModuleNamespace {
    /// Creates an empty namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one declared backend.
    ///
    /// `factory` is `None` when the provider id could not be resolved; the
    /// failure surfaces when the entry is enumerated.
    pub fn insert(
        &mut self,
        module: impl Into<PathBuf>,
        module_name: impl Into<String>,
        provider: impl Into<String>,
        factory: Option<BackendFactory>,
    ) {
        self.entries.push(NamespaceEntry {
            module: module.into(),
            module_name: module_name.into(),
            provider: provider.into(),
            factory,
        });
    }

    /// Returns the declared entries in load order.
    #[must_use]
    pub fn entries(&self) -> &[NamespaceEntry] {
        &self.entries
    }

    /// Returns the number of declared backends.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no module declared a backend.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enumerates the declared backends.
    ///
    /// The sequence is lazy: a backend instance is created only when its
    /// item is pulled, and an unresolved provider fails at that point.
    pub fn backends(&self) -> impl Iterator<Item = CoreResult<BackendDescriptor>> + '_ {
        self.entries.iter().map(NamespaceEntry::instantiate)
    }
}

impl std::fmt::Debug for ModuleNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{}:{}", e.module.display(), e.provider))
            .collect();
        f.debug_struct("ModuleNamespace")
            .field("entries", &entries)
            .finish()
    }
}

/// Loads `.plugin` manifests and resolves their providers against a table
/// of linked-in factories.
#[derive(Debug, Clone, Default)]
pub struct ManifestLoader {
    providers: ProviderRegistry,
}

impl ManifestLoader {
    /// Creates a loader over the given provider table.
    #[must_use]
    pub fn new(providers: ProviderRegistry) -> Self {
        Self { providers }
    }

    /// Creates a loader over the built-in providers.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(ProviderRegistry::builtin())
    }

    /// Returns the provider table.
    #[must_use]
    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }
}

impl ModuleLoader for ManifestLoader {
    fn load(&self, modules: &[PathBuf]) -> CoreResult<ModuleNamespace> {
        let mut namespace = ModuleNamespace::new();

        for path in modules {
            let manifest = ModuleManifest::read(path)?;
            debug!(
                module = %path.display(),
                name = %manifest.name,
                providers = manifest.provides.len(),
                "loaded module"
            );

            for provider in &manifest.provides {
                namespace.insert(
                    path.clone(),
                    manifest.name.clone(),
                    provider.clone(),
                    self.providers.get(provider),
                );
            }
        }

        Ok(namespace)
    }
}
