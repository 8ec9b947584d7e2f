use std::sync::Arc;

use crate::identity::{compute_identity, MockId};
use crate::resolution::ResolutionSignal;
use crate::variables::{strip_ignored, variables_equal, Variables};
use crate::Mock;

/// Given the behaviour specification as a [`Mock`], keep track of what we need at
/// runtime to match it against incoming operations.
#[derive(Debug, Clone)]
pub(crate) struct MountedMock {
    pub(crate) id: MockId,
    pub(crate) specification: Arc<Mock>,
    /// The properties left out when comparing variables.
    ///
    /// A mock that does not match on variables (and has no predicate) ignores all of
    /// them: its identity must not depend on the variables it was registered with.
    ignored_variables: Vec<String>,
    /// Set for mocks mounted with controlled resolution.
    pub(crate) resolution_signal: Option<Arc<ResolutionSignal>>,
}

impl MountedMock {
    pub(crate) fn new(
        specification: Mock,
        resolution_signal: Option<Arc<ResolutionSignal>>,
    ) -> Self {
        let ignored_variables =
            if !specification.match_on_variables && !specification.has_predicate() {
                specification.variables.keys().cloned().collect()
            } else {
                specification.ignored_variables.clone()
            };
        let id = compute_identity(
            &specification.name,
            Some(&specification.variables),
            &ignored_variables,
        );
        Self {
            id,
            specification: Arc::new(specification),
            ignored_variables,
            resolution_signal,
        }
    }

    /// Compare the variables of an incoming operation with the ones this mock expects,
    /// leaving out the ignored properties on both sides.
    pub(crate) fn variables_match(&self, variables: &Variables) -> bool {
        variables_equal(&self.filtered(variables), &self.expected_variables())
    }

    pub(crate) fn expected_variables(&self) -> Variables {
        strip_ignored(&self.specification.variables, &self.ignored_variables)
    }

    pub(crate) fn filtered(&self, variables: &Variables) -> Variables {
        strip_ignored(variables, &self.ignored_variables)
    }

    /// Can this mock be picked by the catch-all fallback?
    pub(crate) fn is_catch_all(&self) -> bool {
        !self.specification.match_on_variables
    }

    /// Is this mock matched comparing variables?
    pub(crate) fn is_structural(&self) -> bool {
        self.specification.match_on_variables && !self.specification.has_predicate()
    }
}
