//! Tracing initialization and configuration.

use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Level used when `RUST_LOG` is unset; stdout belongs to the progress report.
const DEFAULT_FILTER: &str = "warn";

/// Initializes the tracing subscriber for structured logging on stderr.
///
/// # Configuration
///
/// The log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `warn` level.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=info blobmime --container assets
/// RUST_LOG=blobmime_core=debug,blobmime_object=debug blobmime --container assets
/// ```
///
/// # Errors
///
/// Returns an error if the tracing subscriber fails to initialize.
pub(super) fn init_tracing() -> anyhow::Result<()> {
    let env_filter = create_env_filter()?;
    let fmt_layer = create_fmt_layer();

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    Ok(())
}

/// Creates an environment filter for tracing.
fn create_env_filter() -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}"))
}

/// Creates a formatted tracing layer writing to stderr.
fn create_fmt_layer() -> fmt::Layer<Registry, DefaultFields, Format, fn() -> io::Stderr> {
    fmt::layer()
        .with_writer(io::stderr as fn() -> io::Stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(io::stderr().is_terminal())
}
