//! authwatch CLI -- auth-log incident detection from the command line.
//!
//! Parses syslog-style auth logs, runs the correlation rules and reports
//! incidents. Also generates synthetic attack scenarios for testing.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use authwatch_core::config::AuthwatchConfig;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG_PATH};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            // exit_code() is always within 0..=255
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // `config` loads and reports on the file itself, so a broken file must not stop it here.
    let mut config = match cli.command {
        Commands::Config(_) => AuthwatchConfig::default(),
        _ => resolve_config(&cli.config).await?,
    };

    if let Some(ref level) = cli.log_level {
        config.general.log_level = level.clone();
    }

    logging::init_tracing(&config.general)
        .map_err(|e| CliError::Config(format!("logging: {}", e)))?;

    debug!(config = %cli.config.display(), "authwatch starting");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, &config, &writer).await,
        Commands::Generate(args) => commands::generate::execute(args, &config, &writer).await,
        Commands::Rules => commands::rules::execute(&config, &writer),
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}

/// Load the configuration file.
///
/// A missing file at the default path falls back to built-in defaults
/// (still subject to environment overrides); an explicit `-c` path must exist.
async fn resolve_config(path: &Path) -> Result<AuthwatchConfig, CliError> {
    if path == Path::new(DEFAULT_CONFIG_PATH) && !tokio::fs::try_exists(path).await? {
        let mut config = AuthwatchConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        return Ok(config);
    }

    Ok(AuthwatchConfig::load(path).await?)
}
