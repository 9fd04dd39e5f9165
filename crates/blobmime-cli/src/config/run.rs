//! Run behavior configuration.

use std::num::NonZeroUsize;

use anyhow::Context;
use blobmime_core::{ContentTypeOverride, ContentTypeResolver, DriverConfig, UpdatePolicy};
use clap::Args;

use crate::TRACING_TARGET_CONFIG;

/// How a reset run behaves.
///
/// # Environment Variables
///
/// - `BLOBMIME_CONCURRENCY` - Objects processed at the same time (default: 1, max: 64)
#[derive(Debug, Clone, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct RunConfig {
    /// Rewrite the content-type of every blob with a known extension, even
    /// when it is already correct.
    #[arg(long)]
    pub force: bool,

    /// Show what would change without updating anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Number of blobs processed at the same time.
    #[arg(
        long,
        env = "BLOBMIME_CONCURRENCY",
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..=64)
    )]
    pub concurrency: u16,

    /// Extra extension mapping, e.g. `.webmanifest=application/manifest+json`.
    ///
    /// Takes precedence over the built-in table. May be repeated.
    #[arg(long = "map", value_name = ".EXT=TYPE")]
    pub overrides: Vec<ContentTypeOverride>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print only the run summary, as JSON.
    #[arg(long, requires = "yes")]
    pub json: bool,

    /// Disable colored output.
    #[arg(long)]
    pub plain: bool,
}

impl RunConfig {
    /// Update policy selected by `--force`.
    pub fn policy(&self) -> UpdatePolicy {
        if self.force {
            UpdatePolicy::Always
        } else {
            UpdatePolicy::CompareThenUpdate
        }
    }

    /// Builds the driver configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the concurrency is zero.
    pub fn driver_config(&self) -> anyhow::Result<DriverConfig> {
        let concurrency = NonZeroUsize::new(usize::from(self.concurrency))
            .context("concurrency must be at least 1")?;

        Ok(DriverConfig::default()
            .with_policy(self.policy())
            .with_dry_run(self.dry_run)
            .with_concurrency(concurrency))
    }

    /// Builds the resolver with the `--map` overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is invalid.
    pub fn resolver(&self) -> anyhow::Result<ContentTypeResolver> {
        ContentTypeResolver::new()
            .with_overrides(&self.overrides)
            .context("invalid --map value")
    }

    /// Logs run configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            policy = %self.policy(),
            dry_run = self.dry_run,
            concurrency = self.concurrency,
            overrides = self.overrides.len(),
            json = self.json,
            "Run configuration"
        );
    }
}
