//! Driver configuration.

use std::num::NonZeroUsize;

use super::UpdatePolicy;

/// Options for a [`ResetDriver`](super::ResetDriver) run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "config does nothing unless you use it"]
pub struct DriverConfig {
    /// When to rewrite a mapped object.
    pub policy: UpdatePolicy,
    /// Decide and report, but never call the update.
    pub dry_run: bool,
    /// Maximum number of objects processed at the same time.
    pub concurrency: NonZeroUsize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            policy: UpdatePolicy::default(),
            dry_run: false,
            concurrency: NonZeroUsize::MIN,
        }
    }
}

impl DriverConfig {
    /// Sets the update policy.
    pub fn with_policy(mut self, policy: UpdatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the number of objects processed at the same time.
    pub fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }
}
