//! # Plinth Testkit
//!
//! Test utilities for Plinth.
//!
//! This crate provides:
//! - Temporary plugin directories with module and config writers
//! - A recording backend that counts and orders lifecycle calls
//! - Provider tables wired to recording backends
//!
//! ## Usage
//!
//! ```rust,ignore
//! use plinth_testkit::prelude::*;
//!
//! #[test]
//! fn selects_installed_backend() {
//!     let probe = CallProbe::new();
//!     let dir = PluginDir::new();
//!     dir.add_module("pg.plugin", "pg", &["test.recording"]);
//!     let config = dir.write_config("{}");
//!
//!     let providers = recording_providers(&probe, Behavior::eligible());
//!     let ctx = context_with(providers, Default::default());
//!     StorageLayer::init(&ctx, dir.modules_path(), &config).unwrap();
//!     assert_eq!(probe.construct_calls(), 1);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod backends;
pub mod fixtures;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backends::*;
    pub use crate::fixtures::*;
}

pub use backends::*;
pub use fixtures::*;
