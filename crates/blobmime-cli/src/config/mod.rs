//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── storage: StorageConfig  # Connection string, container, prefix
//! └── run: RunConfig          # Policy, dry run, concurrency, mappings, prompts
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Missing storage settings are prompted for interactively.
//!
//! # Example
//!
//! ```bash
//! blobmime --connection "AccountName=...;AccountKey=..." --container assets
//!
//! # Or via environment variables
//! AZURE_STORAGE_CONNECTION_STRING="..." AZURE_STORAGE_CONTAINER=assets blobmime --yes
//! ```

mod run;
mod storage;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use run::RunConfig;
pub use storage::{ResolvedStorage, StorageConfig};

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "blobmime")]
#[command(about = "Reset blob content-types in an Azure Storage container from file extensions")]
#[command(version)]
pub struct Cli {
    /// Storage account and container selection.
    #[clap(flatten)]
    pub storage: StorageConfig,

    /// Run behavior.
    #[clap(flatten)]
    pub run: RunConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// .env files are loaded before clap parses arguments, so their values
    /// act as defaults for `env`-backed options.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.storage
            .validate()
            .context("invalid storage configuration")?;
        Ok(())
    }

    /// Logs configuration at info level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            container = ?self.storage.container,
            prefix = ?self.storage.prefix,
            connection_provided = self.storage.connection.is_some(),
            "Storage configuration"
        );

        self.run.log();
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use blobmime_core::UpdatePolicy;
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_full_invocation() {
        let cli = Cli::try_parse_from([
            "blobmime",
            "--connection",
            "AccountName=acct;AccountKey=abc",
            "--container",
            "assets",
            "--prefix",
            "img/",
            "--force",
            "--dry-run",
            "--concurrency",
            "4",
            "--map",
            ".webmanifest=application/manifest+json",
            "--map",
            "md=text/markdown",
            "--yes",
            "--plain",
        ])
        .unwrap();

        assert_eq!(cli.storage.container.as_deref(), Some("assets"));
        assert_eq!(cli.storage.prefix.as_deref(), Some("img/"));
        assert!(cli.run.yes);
        assert!(cli.run.plain);
        assert_eq!(cli.run.overrides.len(), 2);

        let config = cli.run.driver_config().unwrap();
        assert_eq!(config.policy, UpdatePolicy::Always);
        assert!(config.dry_run);
        assert_eq!(config.concurrency.get(), 4);
    }

    #[test]
    fn defaults_are_conservative() {
        let cli = Cli::try_parse_from(["blobmime"]).unwrap();
        let config = cli.run.driver_config().unwrap();
        assert_eq!(config.policy, UpdatePolicy::CompareThenUpdate);
        assert!(!config.dry_run);
        assert_eq!(config.concurrency.get(), 1);
        assert!(!cli.run.yes);
        assert!(!cli.run.json);
    }

    #[test]
    fn json_requires_yes() {
        assert!(Cli::try_parse_from(["blobmime", "--json"]).is_err());
        let cli = Cli::try_parse_from(["blobmime", "--json", "--yes"]).unwrap();
        assert!(cli.run.json);
    }

    #[test]
    fn rejects_out_of_range_concurrency() {
        assert!(Cli::try_parse_from(["blobmime", "--concurrency", "0"]).is_err());
        assert!(Cli::try_parse_from(["blobmime", "--concurrency", "65"]).is_err());
    }

    #[test]
    fn rejects_invalid_mapping() {
        assert!(Cli::try_parse_from(["blobmime", "--map", "json"]).is_err());
        assert!(Cli::try_parse_from(["blobmime", "--map", ".json=notamime"]).is_err());
    }
}
