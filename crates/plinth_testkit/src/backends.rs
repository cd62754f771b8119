//! Recording backends for lifecycle tests.
//!
//! A [`RecordingBackend`] logs every call it receives into a shared
//! [`CallProbe`], tagged with the instance that received it. Tests hand the
//! probe to [`recording_providers`] and inspect it after driving the storage
//! layer.

use parking_lot::Mutex;
use plinth_core::{ContextOptions, ManifestLoader, ProcessContext, ProviderRegistry};
use plinth_plugin::{PluginError, PluginResult, ProcessId, Storage};
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Provider id of the recording backend.
pub const RECORDING_PROVIDER: &str = "test.recording";

/// A lifecycle call observed by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    /// A new instance was created by its factory.
    Created,
    /// `construct` was called.
    Construct,
    /// `load_config` was called.
    LoadConfig,
    /// `can_be_used` was called.
    CanBeUsed,
}

/// Shared log of calls across all recording backend instances.
#[derive(Debug, Clone, Default)]
pub struct CallProbe {
    calls: Arc<Mutex<Vec<(usize, Call)>>>,
    instances: Arc<Mutex<usize>>,
}

impl CallProbe {
    /// Creates an empty probe.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_instance(&self) -> usize {
        let mut instances = self.instances.lock();
        *instances += 1;
        *instances
    }

    fn record(&self, instance: usize, call: Call) {
        self.calls.lock().push((instance, call));
    }

    /// Returns every recorded call in order, tagged by instance id.
    pub fn calls(&self) -> Vec<(usize, Call)> {
        self.calls.lock().clone()
    }

    /// Returns the calls received by one instance, in order.
    pub fn calls_for(&self, instance: usize) -> Vec<Call> {
        self.calls
            .lock()
            .iter()
            .filter(|(id, _)| *id == instance)
            .map(|(_, call)| *call)
            .collect()
    }

    /// Returns how many times `call` was recorded across all instances.
    pub fn count(&self, call: Call) -> usize {
        self.calls.lock().iter().filter(|(_, c)| *c == call).count()
    }

    /// Returns how many instances were created.
    pub fn instances(&self) -> usize {
        *self.instances.lock()
    }

    /// Returns the number of `construct` calls.
    pub fn construct_calls(&self) -> usize {
        self.count(Call::Construct)
    }

    /// Returns the number of `load_config` calls.
    pub fn load_config_calls(&self) -> usize {
        self.count(Call::LoadConfig)
    }

    /// Returns the number of `can_be_used` calls.
    pub fn can_be_used_calls(&self) -> usize {
        self.count(Call::CanBeUsed)
    }
}

/// How a recording backend responds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Behavior {
    /// Value returned by `can_be_used`.
    pub eligible: bool,
    /// Whether `construct` fails.
    pub fail_construct: bool,
    /// Whether `load_config` fails.
    pub fail_load_config: bool,
}

impl Behavior {
    /// A backend that reports itself usable.
    pub fn eligible() -> Self {
        Self {
            eligible: true,
            ..Self::default()
        }
    }

    /// A backend that reports itself unusable.
    pub fn ineligible() -> Self {
        Self::default()
    }

    /// Makes `construct` fail.
    pub fn failing_construct(mut self) -> Self {
        self.fail_construct = true;
        self
    }

    /// Makes `load_config` fail.
    pub fn failing_load_config(mut self) -> Self {
        self.fail_load_config = true;
        self
    }
}

/// A backend that records its lifecycle into a [`CallProbe`].
#[derive(Debug)]
pub struct RecordingBackend {
    instance: usize,
    probe: CallProbe,
    behavior: Behavior,
    process_id: Option<ProcessId>,
    silent: bool,
    config_path: Option<PathBuf>,
}

impl RecordingBackend {
    /// Creates an instance and records its creation.
    pub fn new(probe: &CallProbe, behavior: Behavior) -> Self {
        let instance = probe.next_instance();
        probe.record(instance, Call::Created);
        Self {
            instance,
            probe: probe.clone(),
            behavior,
            process_id: None,
            silent: false,
            config_path: None,
        }
    }

    /// Returns this instance's id in the probe.
    pub fn instance(&self) -> usize {
        self.instance
    }

    /// Returns the process id passed to `construct`.
    pub fn process_id(&self) -> Option<&ProcessId> {
        self.process_id.as_ref()
    }

    /// Returns the silent flag passed to `construct`.
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Returns the path passed to a successful `load_config`.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

impl Storage for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn construct(&mut self, process_id: &ProcessId, silent: bool) -> PluginResult<()> {
        self.probe.record(self.instance, Call::Construct);
        if self.process_id.is_some() {
            return Err(PluginError::AlreadyConstructed);
        }
        if self.behavior.fail_construct {
            return Err(PluginError::backend("construct failed on purpose"));
        }
        self.process_id = Some(*process_id);
        self.silent = silent;
        Ok(())
    }

    fn load_config(&mut self, config_path: &Path) -> PluginResult<()> {
        self.probe.record(self.instance, Call::LoadConfig);
        if self.process_id.is_none() {
            return Err(PluginError::NotConstructed);
        }
        if self.behavior.fail_load_config {
            return Err(PluginError::config(config_path, "rejected on purpose"));
        }
        self.config_path = Some(config_path.to_path_buf());
        Ok(())
    }

    fn can_be_used(&self, _config_path: &Path) -> bool {
        self.probe.record(self.instance, Call::CanBeUsed);
        self.behavior.eligible
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Returns the built-in providers plus [`RECORDING_PROVIDER`] wired to `probe`.
pub fn recording_providers(probe: &CallProbe, behavior: Behavior) -> ProviderRegistry {
    let probe = probe.clone();
    ProviderRegistry::builtin().with(RECORDING_PROVIDER, move || {
        Box::new(RecordingBackend::new(&probe, behavior))
    })
}

/// Builds a context whose loader resolves against `providers`.
pub fn context_with(providers: ProviderRegistry, options: ContextOptions) -> ProcessContext {
    ProcessContext::builder()
        .options(options)
        .loader(ManifestLoader::new(providers))
        .build()
}
