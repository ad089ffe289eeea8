use std::io::Write;
use std::process::ExitCode;

use cadence_app::cli::Cli;
use cadence_app::commands::{Outcome, execute};
use cadence_core::config::load_config;
use cadence_core::constants::DEFAULT_LOG_LEVEL;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let initial =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let (filter_layer, filter_handle) = reload::Layer::new(initial);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let config = load_config(cli.config.as_deref())?;

    if std::env::var_os("RUST_LOG").is_none() {
        if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
            if let Err(e) = filter_handle.modify(|current| *current = filter) {
                tracing::warn!(error = %e, "Failed to update log filter from config");
            }
        } else {
            tracing::warn!(
                level = %config.logging.level,
                "Invalid log level in config, keeping default"
            );
        }
    }

    tracing::debug!(command = ?cli.command, "Running command");

    let mut stdout = std::io::stdout().lock();
    let outcome = execute(&cli.command, &config, &mut stdout)?;
    stdout.flush()?;

    Ok(match outcome {
        Outcome::Success => ExitCode::SUCCESS,
        Outcome::Rejected => ExitCode::FAILURE,
    })
}
