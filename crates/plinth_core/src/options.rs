//! Process-level startup options.

/// Flags that influence backend selection for one process context.
///
/// Usually sourced from command-line overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextOptions {
    /// Always use the embedded backend, even if an eligible external one exists.
    pub force_embedded: bool,

    /// Use the external backend even if it reports that it cannot be used.
    pub force_external: bool,

    /// Ask backends to suppress their own console output.
    pub silent: bool,

    /// Fall back to the embedded backend when no module is installed.
    ///
    /// When false, an empty plugin directory is fatal unless
    /// `force_embedded` is set.
    pub fallback_on_empty: bool,
}

impl ContextOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to force the embedded backend.
    #[must_use]
    pub const fn force_embedded(mut self, value: bool) -> Self {
        self.force_embedded = value;
        self
    }

    /// Sets whether to force the external backend.
    #[must_use]
    pub const fn force_external(mut self, value: bool) -> Self {
        self.force_external = value;
        self
    }

    /// Sets the silent-logging flag.
    #[must_use]
    pub const fn silent(mut self, value: bool) -> Self {
        self.silent = value;
        self
    }

    /// Sets whether an empty plugin directory falls back to the embedded backend.
    #[must_use]
    pub const fn fallback_on_empty(mut self, value: bool) -> Self {
        self.fallback_on_empty = value;
        self
    }
}
