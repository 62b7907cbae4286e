//! Registry bootstrap.
//!
//! Opens and migrates the database, builds the registry, and runs the
//! startup sweep before the background job takes over.

use std::sync::Arc;

use handles_registry::{Registry, SweepJob};
use handles_store::{SqliteClient, StorageError};
use handles_types::config::ConfigError;
use snafu::{ResultExt, Snafu};

use crate::config::Config;

/// Error type for bootstrap operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum BootstrapError {
    /// Configuration is invalid.
    #[snafu(display("configuration error: {source}"))]
    Config {
        /// Underlying validation error.
        source: ConfigError,
    },
    /// The database could not be opened or migrated.
    #[snafu(display("database error: {source}"))]
    Database {
        /// Underlying storage error.
        source: StorageError,
    },
}

/// Bootstrapped server components.
pub struct BootstrappedRegistry {
    /// The shared registry.
    pub registry: Arc<Registry>,
    /// Background sweep, not yet started.
    pub sweep: SweepJob,
}

/// Opens the configured database and bootstraps the registry on it.
///
/// # Errors
///
/// Returns [`BootstrapError`] if the configuration is invalid or the
/// database cannot be opened or migrated.
pub async fn bootstrap_registry(config: &Config) -> Result<BootstrappedRegistry, BootstrapError> {
    let client = SqliteClient::open(&config.database).context(DatabaseSnafu)?;
    tracing::info!(database = %config.database.display(), "Opened database");
    bootstrap_with_client(config, client).await
}

/// Bootstraps the registry on an already opened client.
///
/// # Errors
///
/// Returns [`BootstrapError`] if the configuration is invalid or the
/// migration fails.
pub async fn bootstrap_with_client(
    config: &Config,
    client: SqliteClient,
) -> Result<BootstrappedRegistry, BootstrapError> {
    let registry_config = config.registry_config().context(ConfigSnafu)?;
    let secret = config.secret().context(ConfigSnafu)?;
    if secret.is_none() {
        tracing::warn!("HMAC_SECRET is not set; link identifiers are disabled");
    }

    client.migrate().await.context(DatabaseSnafu)?;

    let interval = registry_config.sweep.interval;
    let registry = Arc::new(
        Registry::builder()
            .client(Arc::new(client))
            .config(registry_config)
            .maybe_secret(secret)
            .build()
            .context(ConfigSnafu)?,
    );

    let sweep = SweepJob::builder().registry(Arc::clone(&registry)).interval(interval).build();
    let report = sweep.run_cycle().await;
    tracing::info!(reclaimed = report.total_reclaimed(), "Startup sweep complete");

    Ok(BootstrappedRegistry { registry, sweep })
}
