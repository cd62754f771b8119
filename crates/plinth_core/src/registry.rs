//! Per-context singleton resource registry.

use crate::error::{CoreError, CoreResult};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

type Resource = Arc<dyn Any + Send + Sync>;

/// Maps resource keys to lazily created singletons.
///
/// Owned by exactly one [`crate::ProcessContext`]. A key, once set, is never
/// overwritten or removed for the lifetime of the registry.
///
/// # Thread Safety
///
/// Reads go through an `RwLock` and never block on a running initializer.
/// First-time initialization of a key is serialized behind that key's own
/// mutex, held for the whole initializer, so concurrent callers run it at
/// most once and nobody observes a half-built value. Initializers for
/// different keys do not block each other, so one initializer may obtain
/// another resource. Re-entering `get_or_try_init` for the key that is
/// being initialized deadlocks.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: RwLock<HashMap<String, Resource>>,
    init_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the resource stored under `key` if it exists and is a `T`.
    #[must_use]
    pub fn get<T>(&self, key: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let resource = self.resources.read().get(key).cloned()?;
        resource.downcast::<T>().ok()
    }

    /// Returns the resource stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `UninitializedAccess` if nothing is stored under `key`, or
    /// `ResourceTypeMismatch` if the stored value is not a `T`.
    pub fn get_typed<T>(&self, key: &str) -> CoreResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let resource = self
            .resources
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| CoreError::uninitialized(key))?;

        resource
            .downcast::<T>()
            .map_err(|_| CoreError::ResourceTypeMismatch {
                key: key.to_string(),
            })
    }

    /// Returns the resource under `key`, creating it with `init` if absent.
    ///
    /// `init` runs at most once per key across all threads. If it fails,
    /// nothing is stored and the error is returned; a later call may try
    /// again. `init` may itself call `get_or_try_init` for other keys.
    ///
    /// # Errors
    ///
    /// Returns whatever `init` returns, or `ResourceTypeMismatch` (converted
    /// into `E`) if the key already holds a value of another type.
    pub fn get_or_try_init<T, E, F>(&self, key: &str, init: F) -> Result<Arc<T>, E>
    where
        T: Any + Send + Sync,
        E: From<CoreError>,
        F: FnOnce() -> Result<T, E>,
    {
        if self.contains(key) {
            return Ok(self.get_typed(key)?);
        }

        let key_lock = self.init_lock(key);
        let _guard = key_lock.lock();

        // Another caller may have finished while we waited.
        if self.contains(key) {
            return Ok(self.get_typed(key)?);
        }

        let value = Arc::new(init()?);
        let resource: Resource = value.clone();
        self.resources.write().insert(key.to_string(), resource);
        Ok(value)
    }

    fn init_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.init_locks.lock();
        Arc::clone(locks.entry(key.to_string()).or_default())
    }

    /// Returns true if a resource is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.resources.read().contains_key(key)
    }

    /// Returns the number of stored resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    /// Returns true if no resource has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }

    /// Returns the stored keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.resources.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
