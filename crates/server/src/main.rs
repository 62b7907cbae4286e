//! Handles registry server binary.
//!
//! Opens the registry database, sweeps expired identifiers at startup, and
//! keeps sweeping in the background until shut down.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (./handles.db, sweep every 5 minutes)
//! HMAC_SECRET=change-me-to-something-long handles-server
//!
//! # Environment variables of the deployed service are honored
//! MIN_USERNAME_Z_VALUE=1000 CLEANUP_INTERVAL_SECONDS=60 handles-server --log-format json
//!
//! # Print the configuration schema
//! handles-server config schema
//! ```

use std::{io::IsTerminal, net::SocketAddr};

use clap::Parser;
use handles_server::{
    bootstrap::{self, BootstrapError},
    config::{self, Cli, CliCommand, Config, ConfigAction, LogFormat},
    shutdown,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use snafu::{ResultExt, Snafu};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Top-level error type for the server binary.
#[derive(Debug, Snafu)]
enum ServerError {
    #[snafu(display("bootstrap error: {source}"))]
    Bootstrap { source: BootstrapError },

    #[snafu(display("failed to install Prometheus exporter: {message}"))]
    Metrics { message: String },
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();

    if let Some(CliCommand::Config { action }) = cli.command {
        match action {
            ConfigAction::Schema => print!("{}", config::generate_config_schema()),
            ConfigAction::Example => print!("{}", config::generate_config_example()),
        }
        return Ok(());
    }

    let config = cli.config;
    init_logging(&config);

    if let Some(metrics_addr) = config.metrics_addr {
        init_metrics_exporter(metrics_addr)?;
    }

    tracing::info!(database = %config.database.display(), "Starting handles registry");
    let node = bootstrap::bootstrap_registry(&config).await.context(BootstrapSnafu)?;

    let interval = node.registry.config().sweep.interval;
    let sweep_handle = node.sweep.start();
    tracing::info!(interval = ?interval, "Sweep job started");

    shutdown::stop_sweep_on(shutdown::shutdown_signal(), sweep_handle).await;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Initializes the logging system.
///
/// `Auto` selects JSON when stdout is not a terminal.
fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = match config.log_format {
        LogFormat::Json => true,
        LogFormat::Text => false,
        LogFormat::Auto => !std::io::stdout().is_terminal(),
    };

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().flatten_event(true).with_current_span(false))
            .init();
    } else {
        tracing_subscriber::registry().with(env_filter).with(fmt::layer()).init();
    }
}

/// Starts an HTTP listener exposing metrics at `/metrics`.
fn init_metrics_exporter(addr: SocketAddr) -> Result<(), ServerError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| ServerError::Metrics { message: e.to_string() })?;

    tracing::info!(metrics_addr = %addr, "Prometheus metrics exporter started");
    Ok(())
}
