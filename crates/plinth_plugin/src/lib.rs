//! # Plinth Plugin
//!
//! The contract between Plinth and the storage backends it can select.
//!
//! External backend modules depend on this crate alone. They implement
//! [`Storage`] and are registered with the host under a provider id; the
//! host discovers, selects, and initializes exactly one of them per process.
//!
//! ## Design Principles
//!
//! - Backends expose only lifecycle and eligibility, never storage operations
//! - Startup is two-phase: `construct`, then `load_config`
//! - Eligibility probes are side-effect free
//! - Must be `Send + Sync`: one instance serves the whole process
//!
//! ## Available Backends
//!
//! - [`EmbeddedBackend`] - Built-in in-memory fallback
//!
//! ## Example
//!
//! ```rust
//! use plinth_plugin::{EmbeddedBackend, Storage};
//! use std::path::Path;
//!
//! let backend = EmbeddedBackend::new();
//! assert!(backend.can_be_used(Path::new("config.json")));
//! assert_eq!(backend.name(), "embedded");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod embedded;
mod error;
mod process;
mod storage;

pub use config::{read_config_document, read_config_section};
pub use embedded::{EmbeddedBackend, EmbeddedConfig};
pub use error::{PluginError, PluginResult};
pub use process::ProcessId;
pub use storage::Storage;
