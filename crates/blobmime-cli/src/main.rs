#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod console;
mod prompt;
mod telemetry;

use std::process;

use anyhow::Context;
use blobmime_core::{ContainerStore, Reporter, ResetDriver, RunSummary};
use blobmime_object::providers::AzureCredentials;

use crate::config::{Cli, ResolvedStorage, RunConfig};
use crate::console::{ConsoleReporter, ParameterTable};
use crate::prompt::{Prompt, Terminal};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "blobmime_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "blobmime_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "blobmime_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    tracing::error!(
        target: TRACING_TARGET_SHUTDOWN,
        error = %error,
        "application terminated with error"
    );
    eprintln!("Error: {error:#}");

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    if cli.run.plain {
        console::disable_colors();
    }

    cli.validate()?;
    cli.log();

    let mut terminal = Terminal::new();
    let storage = cli.storage.resolve(&mut terminal)?;

    if cli.run.json {
        let summary = reset(&storage, &cli.run, ()).await?;
        let json =
            serde_json::to_string_pretty(&summary).context("failed to encode run summary")?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", ParameterTable::new(&storage, &cli.run));
    if !cli.run.yes && !terminal.confirm("Good to go?")? {
        tracing::info!(target: TRACING_TARGET_SHUTDOWN, "run declined by user");
        return Ok(());
    }

    let reporter = ConsoleReporter::new(cli.run.dry_run);
    let summary = reset(&storage, &cli.run, reporter).await?;

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        updated = summary.updated,
        failed = summary.failed,
        "run finished"
    );

    Ok(())
}

/// Opens the container and runs the reset driver over it.
async fn reset<R: Reporter>(
    storage: &ResolvedStorage,
    run: &RunConfig,
    reporter: R,
) -> anyhow::Result<RunSummary> {
    let resolver = run.resolver()?;
    let config = run.driver_config()?;

    let creds = AzureCredentials::from_connection_string(&storage.connection, &storage.container)
        .context("invalid storage connection string")?;

    let store = ContainerStore::connect_azure(&creds)
        .await?
        .with_prefix(storage.prefix.clone());

    let driver = ResetDriver::new(store, resolver, reporter, config);
    let summary = driver.run().await?;

    Ok(summary)
}
