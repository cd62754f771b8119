//! # Plinth Core
//!
//! Resolves which storage backend a process will use and publishes it as a
//! per-process singleton.
//!
//! This crate provides:
//! - Module discovery over a plugin directory
//! - The selection policy (exactly one external backend, or the embedded fallback)
//! - Two-phase backend startup (`construct`, then `load_config`)
//! - A per-context resource registry with serialized first-time initialization
//!
//! ## Resolution flow
//!
//! ```text
//! StorageLayer::init(ctx, plugin_dir, config)
//!   ├─ discovery   scan *.plugin, load into a fresh namespace
//!   ├─ selector    cardinality check, then force flags and eligibility
//!   ├─ lifecycle   construct → load_config
//!   └─ registry    publish under StorageLayer::RESOURCE_KEY
//! StorageLayer::get(ctx) → Arc<dyn Storage>
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod context;
mod descriptor;
pub mod discovery;
mod error;
pub mod lifecycle;
mod options;
mod registry;
pub mod selector;
mod storage_layer;

pub use context::{ProcessContext, ProcessContextBuilder};
pub use descriptor::{BackendDescriptor, BackendOrigin, SelectedBackend};
pub use discovery::{
    BackendFactory, ManifestLoader, ModuleLoader, ModuleManifest, ModuleNamespace,
    ProviderRegistry, MODULE_SUFFIX,
};
pub use error::{CoreError, CoreResult};
pub use options::ContextOptions;
pub use registry::ResourceRegistry;
pub use selector::SelectionPolicy;
pub use storage_layer::StorageLayer;

pub use plinth_plugin::{ProcessId, Storage};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
