//! stderr diagnostics for the authwatch CLI.
//!
//! Reports and generated log lines own stdout. Everything emitted through
//! `tracing` goes to stderr, filtered by `[general] log_level` or `RUST_LOG`.

use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use authwatch_core::config::GeneralConfig;

/// Install the process-wide subscriber described by `config`.
///
/// `log_format` is `"json"` (one object per line) or `"pretty"` (multi-line,
/// colored). A second call fails because the global subscriber is already set.
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.log_format.as_str() {
        "json" => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        "pretty" => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        other => bail!("log_format '{other}' is not one of: json, pretty"),
    };

    installed.map_err(|e| anyhow::anyhow!("cannot install {} log subscriber: {e}", config.log_format))
}
