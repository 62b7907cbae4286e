//! Server configuration.
//!
//! Every setting is a CLI flag with an environment variable fallback. The
//! registry settings keep the variable names of the deployed service.

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum};
use handles_types::config::{
    ConfigError, ExpirationConfig, RegistryConfig, SecretConfig, SuffixConfig, SweepConfig,
};

/// Command-line interface for the handles server.
#[derive(Debug, Parser)]
#[command(name = "handles-server", version, about = "Identifier registry and expiry sweeper")]
pub struct Cli {
    /// Optional subcommand. Without one the server runs.
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    /// Runtime configuration.
    #[command(flatten)]
    pub config: Config,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Inspect configuration.
    Config {
        /// What to print.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration inspection actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Print the JSON schema of the registry configuration.
    Schema,
    /// Print the default registry configuration as JSON.
    Example,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// JSON when stdout is not a terminal, text otherwise.
    #[default]
    Auto,
    /// Human-readable text.
    Text,
    /// One JSON object per event.
    Json,
}

/// Runtime configuration.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// SQLite database file.
    #[arg(long = "database", env = "HANDLES_DATABASE", default_value = "handles.db")]
    pub database: PathBuf,

    /// Address for the Prometheus exporter. Disabled when unset.
    #[arg(long = "metrics-addr", env = "HANDLES_METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,

    /// Log output format.
    #[arg(long = "log-format", env = "HANDLES_LOG_FORMAT", value_enum, default_value_t)]
    pub log_format: LogFormat,

    /// Smallest suffix handed out.
    #[arg(long = "min-suffix", env = "MIN_USERNAME_Z_VALUE", default_value_t = 10)]
    pub min_suffix: u32,

    /// Largest suffix handed out.
    #[arg(long = "max-suffix", env = "MAX_USERNAME_Z_VALUE", default_value_t = 99_999)]
    pub max_suffix: u32,

    /// Random draws before issuance gives up.
    #[arg(long = "max-suffix-attempts", env = "MAX_USERNAME_SUFFIX_ATTEMPTS", default_value_t = 10)]
    pub max_suffix_attempts: u32,

    /// Lifetime of `inco` identifiers in minutes.
    #[arg(long = "inco-ttl-minutes", env = "INCO_DOMAIN_EXPIRATION_MINUTES")]
    pub inco_ttl_minutes: Option<u32>,

    /// Fallback `inco` lifetime, honored when the specific setting is absent.
    #[arg(long = "general-ttl-minutes", env = "GENERAL_DOMAIN_EXPIRATION_MINUTES", hide = true)]
    pub general_ttl_minutes: Option<u32>,

    /// Lifetime of `link` identifiers in minutes.
    #[arg(long = "link-ttl-minutes", env = "LINK_DOMAIN_EXPIRATION_MINUTES", default_value_t = 60)]
    pub link_ttl_minutes: u32,

    /// Seconds between background sweeps.
    #[arg(long = "cleanup-interval-seconds", env = "CLEANUP_INTERVAL_SECONDS", default_value_t = 300)]
    pub cleanup_interval_seconds: u64,

    /// Secret for password hashing. `link` operations are disabled without it.
    #[arg(long = "hmac-secret", env = "HMAC_SECRET", hide_env_values = true)]
    pub hmac_secret: Option<String>,
}

impl Config {
    /// Builds and validates the registry configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for out-of-range values.
    pub fn registry_config(&self) -> Result<RegistryConfig, ConfigError> {
        let suffix = SuffixConfig::builder()
            .min(self.min_suffix)
            .max(self.max_suffix)
            .max_attempts(self.max_suffix_attempts)
            .build()?;
        let expiration = ExpirationConfig::builder()
            .maybe_inco_ttl_minutes(self.inco_ttl_minutes.or(self.general_ttl_minutes))
            .link_ttl_minutes(self.link_ttl_minutes)
            .build()?;
        let sweep = SweepConfig::builder()
            .interval(Duration::from_secs(self.cleanup_interval_seconds))
            .build()?;
        Ok(RegistryConfig { suffix, expiration, sweep })
    }

    /// The HMAC secret, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the secret is too short.
    pub fn secret(&self) -> Result<Option<SecretConfig>, ConfigError> {
        self.hmac_secret.as_deref().map(SecretConfig::new).transpose()
    }
}

/// JSON schema of [`RegistryConfig`].
pub fn generate_config_schema() -> String {
    let schema = schemars::schema_for!(RegistryConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default() + "\n"
}

/// Default [`RegistryConfig`] as JSON.
pub fn generate_config_example() -> String {
    serde_json::to_string_pretty(&RegistryConfig::default()).unwrap_or_default() + "\n"
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["handles-server"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_match_registry_defaults() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config.log_format, LogFormat::Auto);
        assert_eq!(cli.config.registry_config().unwrap(), RegistryConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = parse(&[
            "--min-suffix",
            "100",
            "--max-suffix",
            "200",
            "--link-ttl-minutes",
            "5",
            "--cleanup-interval-seconds",
            "30",
            "--log-format",
            "json",
        ]);
        let config = cli.config.registry_config().unwrap();
        assert_eq!(config.suffix.min, 100);
        assert_eq!(config.suffix.max, 200);
        assert_eq!(config.expiration.link_ttl_minutes, 5);
        assert_eq!(config.sweep.interval, Duration::from_secs(30));
        assert_eq!(cli.config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_general_ttl_is_inco_fallback() {
        let cli = parse(&["--general-ttl-minutes", "90"]);
        assert_eq!(cli.config.registry_config().unwrap().expiration.inco_ttl_minutes, 90);

        let cli = parse(&["--general-ttl-minutes", "90", "--inco-ttl-minutes", "30"]);
        assert_eq!(cli.config.registry_config().unwrap().expiration.inco_ttl_minutes, 30);
    }

    #[test]
    fn test_invalid_range_is_rejected() {
        let cli = parse(&["--min-suffix", "500", "--max-suffix", "100"]);
        assert!(cli.config.registry_config().is_err());
    }

    #[test]
    fn test_secret_is_optional_but_validated() {
        assert!(parse(&[]).config.secret().unwrap().is_none());
        assert!(parse(&["--hmac-secret", "short"]).config.secret().is_err());
        assert!(parse(&["--hmac-secret", "0123456789abcdef"]).config.secret().unwrap().is_some());
    }

    #[test]
    fn test_config_subcommands_parse() {
        let cli = parse(&["config", "schema"]);
        assert!(matches!(cli.command, Some(CliCommand::Config { action: ConfigAction::Schema })));
    }

    #[test]
    fn test_schema_and_example_are_json() {
        let schema: serde_json::Value = serde_json::from_str(&generate_config_schema()).unwrap();
        assert!(schema["properties"].get("suffix").is_some());
        let example: RegistryConfig = serde_json::from_str(&generate_config_example()).unwrap();
        assert_eq!(example, RegistryConfig::default());
    }
}
