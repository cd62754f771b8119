//! Backend selection policy.
//!
//! At most one external backend may be installed. Selection first enforces
//! that cardinality, then decides between the external candidate and the
//! embedded fallback:
//!
//! | external  | force_embedded | eligible or force_external | result                 |
//! |-----------|----------------|----------------------------|------------------------|
//! | 2+        | any            | any                        | `AmbiguousBackend`     |
//! | any       | yes            | any                        | embedded               |
//! | 1         | no             | yes                        | external               |
//! | 1         | no             | no                         | embedded               |
//! | 0         | no             | -                          | see below              |
//!
//! With no external candidate, the embedded backend is chosen when
//! `fallback_on_empty` is set and `force_external` is not; otherwise
//! selection fails with `NoBackendFound`.

use crate::descriptor::BackendDescriptor;
use crate::error::{CoreError, CoreResult};
use crate::options::ContextOptions;
use std::path::Path;
use tracing::{info, warn};

/// The flags that drive selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Always choose the embedded backend.
    pub force_embedded: bool,
    /// Choose the external backend even if it reports it cannot be used.
    pub force_external: bool,
    /// Choose the embedded backend when no external candidate exists.
    pub fallback_on_empty: bool,
}

impl From<&ContextOptions> for SelectionPolicy {
    fn from(options: &ContextOptions) -> Self {
        Self {
            force_embedded: options.force_embedded,
            force_external: options.force_external,
            fallback_on_empty: options.fallback_on_empty,
        }
    }
}

/// Pulls at most two candidates and returns the only one, if any.
///
/// # Errors
///
/// Returns `AmbiguousBackend` as soon as a second candidate appears, or the
/// first error the sequence yields.
pub fn single_candidate<I>(candidates: I) -> CoreResult<Option<BackendDescriptor>>
where
    I: IntoIterator<Item = CoreResult<BackendDescriptor>>,
{
    let mut candidates = candidates.into_iter();

    let Some(first) = candidates.next().transpose()? else {
        return Ok(None);
    };

    match candidates.next().transpose()? {
        None => Ok(Some(first)),
        Some(second) => Err(CoreError::AmbiguousBackend {
            candidates: vec![first.origin().to_string(), second.origin().to_string()],
        }),
    }
}

/// Chooses the backend for this process.
///
/// `plugin_dir` is used only for diagnostics.
///
/// # Errors
///
/// Returns `AmbiguousBackend` for two or more candidates, `NoBackendFound`
/// when there is no candidate and no fallback applies, or any error the
/// candidate sequence yields.
pub fn select<I>(
    candidates: I,
    plugin_dir: &Path,
    config_path: &Path,
    policy: SelectionPolicy,
) -> CoreResult<BackendDescriptor>
where
    I: IntoIterator<Item = CoreResult<BackendDescriptor>>,
{
    let external = single_candidate(candidates)?;

    if policy.force_embedded {
        info!("Using in memory storage (forced)");
        return Ok(BackendDescriptor::embedded());
    }

    match external {
        Some(candidate) => {
            if policy.force_external || candidate.storage().can_be_used(config_path) {
                info!(
                    backend = candidate.storage().name(),
                    origin = %candidate.origin(),
                    "using external storage"
                );
                Ok(candidate)
            } else {
                warn!(
                    backend = candidate.storage().name(),
                    config = %config_path.display(),
                    "external backend cannot be used with this configuration"
                );
                info!("Using in memory storage");
                Ok(BackendDescriptor::embedded())
            }
        }
        None if policy.fallback_on_empty && !policy.force_external => {
            info!("No database plugin installed; using in memory storage");
            Ok(BackendDescriptor::embedded())
        }
        None => Err(CoreError::NoBackendFound {
            plugin_dir: plugin_dir.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plinth_plugin::{PluginResult, ProcessId, Storage};
    use proptest::prelude::*;
    use std::any::Any;

    struct Probe {
        usable: bool,
    }

    impl Storage for Probe {
        fn name(&self) -> &str {
            "probe"
        }

        fn construct(&mut self, _process_id: &ProcessId, _silent: bool) -> PluginResult<()> {
            Ok(())
        }

        fn load_config(&mut self, _config_path: &Path) -> PluginResult<()> {
            Ok(())
        }

        fn can_be_used(&self, _config_path: &Path) -> bool {
            self.usable
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn candidate(usable: bool, module: &str) -> CoreResult<BackendDescriptor> {
        Ok(BackendDescriptor::external(Box::new(Probe { usable }), module, "test.probe"))
    }

    fn run(
        candidates: Vec<CoreResult<BackendDescriptor>>,
        policy: SelectionPolicy,
    ) -> CoreResult<BackendDescriptor> {
        select(candidates, Path::new("plugin"), Path::new("config.json"), policy)
    }

    #[test]
    fn single_eligible_candidate_is_chosen() {
        let chosen = run(vec![candidate(true, "a.plugin")], SelectionPolicy::default()).unwrap();
        assert_eq!(chosen.storage().name(), "probe");
        assert!(!chosen.origin().is_embedded());
    }

    #[test]
    fn ineligible_candidate_falls_back() {
        let chosen = run(vec![candidate(false, "a.plugin")], SelectionPolicy::default()).unwrap();
        assert!(chosen.origin().is_embedded());
    }

    #[test]
    fn force_external_overrides_eligibility() {
        let policy = SelectionPolicy {
            force_external: true,
            ..SelectionPolicy::default()
        };
        let chosen = run(vec![candidate(false, "a.plugin")], policy).unwrap();
        assert_eq!(chosen.storage().name(), "probe");
    }

    #[test]
    fn force_embedded_overrides_eligible_candidate() {
        let policy = SelectionPolicy {
            force_embedded: true,
            ..SelectionPolicy::default()
        };
        let chosen = run(vec![candidate(true, "a.plugin")], policy).unwrap();
        assert!(chosen.origin().is_embedded());
    }

    #[test]
    fn force_embedded_wins_over_force_external() {
        let policy = SelectionPolicy {
            force_embedded: true,
            force_external: true,
            fallback_on_empty: false,
        };
        let chosen = run(vec![candidate(true, "a.plugin")], policy).unwrap();
        assert!(chosen.origin().is_embedded());
    }

    #[test]
    fn zero_candidates_is_fatal_by_default() {
        let result = run(vec![], SelectionPolicy::default());
        assert!(matches!(result, Err(CoreError::NoBackendFound { .. })));
    }

    #[test]
    fn zero_candidates_with_force_embedded() {
        let policy = SelectionPolicy {
            force_embedded: true,
            ..SelectionPolicy::default()
        };
        assert!(run(vec![], policy).unwrap().origin().is_embedded());
    }

    #[test]
    fn zero_candidates_with_fallback_switch() {
        let policy = SelectionPolicy {
            fallback_on_empty: true,
            ..SelectionPolicy::default()
        };
        assert!(run(vec![], policy).unwrap().origin().is_embedded());

        let forced_external = SelectionPolicy {
            force_external: true,
            ..policy
        };
        assert!(matches!(
            run(vec![], forced_external),
            Err(CoreError::NoBackendFound { .. })
        ));
    }

    #[test]
    fn two_candidates_are_ambiguous_even_when_forced() {
        let policy = SelectionPolicy {
            force_embedded: true,
            ..SelectionPolicy::default()
        };
        let result = run(
            vec![candidate(true, "a.plugin"), candidate(true, "b.plugin")],
            policy,
        );
        match result {
            Err(CoreError::AmbiguousBackend { candidates }) => {
                assert_eq!(candidates.len(), 2);
                assert!(candidates[0].starts_with("a.plugin"));
                assert!(candidates[1].starts_with("b.plugin"));
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn ambiguity_stops_after_second_candidate() {
        let mut pulled = 0;
        let candidates = (0..10).map(|i| {
            pulled += 1;
            candidate(true, &format!("{i}.plugin"))
        });

        let result = single_candidate(candidates);
        assert!(matches!(result, Err(CoreError::AmbiguousBackend { .. })));
        assert_eq!(pulled, 2);
    }

    #[test]
    fn candidate_errors_propagate() {
        let result = run(
            vec![Err(CoreError::invalid_module("bad.plugin", "broken"))],
            SelectionPolicy::default(),
        );
        assert!(matches!(result, Err(CoreError::InvalidModule { .. })));
    }

    #[test]
    fn policy_from_options() {
        let options = ContextOptions::new().force_external(true).fallback_on_empty(true);
        let policy = SelectionPolicy::from(&options);
        assert!(!policy.force_embedded);
        assert!(policy.force_external);
        assert!(policy.fallback_on_empty);
    }

    proptest! {
        #[test]
        fn selection_follows_policy(
            eligible in prop::collection::vec(any::<bool>(), 0..4),
            force_embedded in any::<bool>(),
            force_external in any::<bool>(),
            fallback_on_empty in any::<bool>(),
        ) {
            let policy = SelectionPolicy { force_embedded, force_external, fallback_on_empty };
            let candidates: Vec<_> = eligible
                .iter()
                .enumerate()
                .map(|(i, usable)| candidate(*usable, &format!("{i}.plugin")))
                .collect();

            let result = run(candidates, policy);

            match eligible.len() {
                0 => {
                    let fallback = force_embedded || (fallback_on_empty && !force_external);
                    match result {
                        Ok(chosen) => {
                            prop_assert!(fallback);
                            prop_assert!(chosen.origin().is_embedded());
                        }
                        Err(CoreError::NoBackendFound { .. }) => prop_assert!(!fallback),
                        Err(other) => prop_assert!(false, "unexpected error {other:?}"),
                    }
                }
                1 => {
                    let chosen = result.unwrap();
                    let external = !force_embedded && (eligible[0] || force_external);
                    prop_assert_eq!(chosen.origin().is_embedded(), !external);
                }
                _ => {
                    let is_ambiguous = matches!(result, Err(CoreError::AmbiguousBackend { .. }));
                    prop_assert!(is_ambiguous);
                }
            }
        }
    }
}
