//! Configuration types for the handles registry.
//!
//! Configuration is loaded from CLI flags and environment variables by the
//! server binary. All config structs validate their values at construction
//! time via fallible builders. Post-deserialization validation is available
//! via the `validate()` method on each struct.

// The schemars `JsonSchema` derive macro internally uses `.unwrap()` in its
// expansions.
#![allow(clippy::disallowed_methods)]

mod expiration;
mod secret;
mod suffix;
mod sweep;

pub use expiration::*;
use schemars::JsonSchema;
pub use secret::*;
use serde::{Deserialize, Serialize};
use snafu::Snafu;
pub use suffix::*;
pub use sweep::*;

/// Configuration validation error.
///
/// Returned when a configuration value is outside its valid range or
/// violates a cross-field constraint.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[snafu(display("invalid config: {message}"))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },
}

/// Aggregate registry configuration.
///
/// The HMAC secret is deliberately not part of this struct; see
/// [`SecretConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RegistryConfig {
    /// Suffix allocation range and attempt budget.
    #[serde(default)]
    pub suffix: SuffixConfig,
    /// Namespace lifetimes.
    #[serde(default)]
    pub expiration: ExpirationConfig,
    /// Background sweep cadence.
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl RegistryConfig {
    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Validation`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.suffix.validate()?;
        self.expiration.validate()?;
        self.sweep.validate()
    }
}

/// Duration serialization using humantime format.
mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use std::time::Duration;

    use super::*;

    // =========================================================================
    // SuffixConfig validation tests
    // =========================================================================

    #[test]
    fn test_suffix_config_defaults_are_valid() {
        let config = SuffixConfig::builder().build().expect("defaults should be valid");
        assert_eq!(config.min, 10);
        assert_eq!(config.max, 99_999);
        assert_eq!(config.max_attempts, 10);
    }

    #[test]
    fn test_suffix_config_single_value_range() {
        let config = SuffixConfig::builder().min(7884).max(7884).build().expect("valid");
        assert_eq!(config.span(), 1);
    }

    #[test]
    fn test_suffix_config_min_must_not_exceed_max() {
        let err = SuffixConfig::builder().min(100).max(99).build().unwrap_err();
        assert!(err.to_string().contains("min"));
        assert!(err.to_string().contains("max"));
    }

    #[test]
    fn test_suffix_config_zero_min_rejected() {
        assert!(SuffixConfig::builder().min(0).build().is_err());
    }

    #[test]
    fn test_suffix_config_zero_attempts_rejected() {
        let err = SuffixConfig::builder().max_attempts(0).build().unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    // =========================================================================
    // ExpirationConfig validation tests
    // =========================================================================

    #[test]
    fn test_expiration_config_defaults() {
        let config = ExpirationConfig::builder().build().expect("defaults should be valid");
        assert_eq!(config.inco_ttl_minutes, 1440);
        assert_eq!(config.link_ttl_minutes, 60);
    }

    #[test]
    fn test_expiration_config_zero_ttl_rejected() {
        let err = ExpirationConfig::builder().inco_ttl_minutes(0).build().unwrap_err();
        assert!(err.to_string().contains("inco_ttl_minutes"));
        assert!(ExpirationConfig::builder().link_ttl_minutes(0).build().is_err());
    }

    #[test]
    fn test_expiration_config_ttl_capped_at_ten_years() {
        assert!(ExpirationConfig::builder().inco_ttl_minutes(MAX_TTL_MINUTES).build().is_ok());
        let err =
            ExpirationConfig::builder().link_ttl_minutes(MAX_TTL_MINUTES + 1).build().unwrap_err();
        assert!(err.to_string().contains("link_ttl_minutes"));
        assert!(ExpirationConfig::builder().inco_ttl_minutes(u32::MAX).build().is_err());

        let json = r#"{ "expiration": { "inco_ttl_minutes": 4294967295 } }"#;
        let config: RegistryConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // SweepConfig validation tests
    // =========================================================================

    #[test]
    fn test_sweep_config_defaults() {
        let config = SweepConfig::builder().build().expect("defaults should be valid");
        assert_eq!(config.interval, Duration::from_secs(300));
    }

    #[test]
    fn test_sweep_config_sub_second_interval_rejected() {
        assert!(SweepConfig::builder().interval(Duration::from_millis(500)).build().is_err());
        assert!(SweepConfig::builder().interval(Duration::from_secs(1)).build().is_ok());
    }

    // =========================================================================
    // SecretConfig tests
    // =========================================================================

    #[test]
    fn test_secret_config_requires_sixteen_chars_after_trim() {
        assert!(SecretConfig::new("  short-secret  ").is_err());
        assert!(SecretConfig::new("0123456789abcdef").is_ok());
        assert!(SecretConfig::new("   0123456789abcde   ").is_err());
    }

    #[test]
    fn test_secret_config_keeps_key_bytes_untrimmed() {
        let secret = SecretConfig::new("1234567890abcdef\n").unwrap();
        assert_eq!(secret.as_bytes(), b"1234567890abcdef\n");

        let padded = SecretConfig::new("  0123456789abcdef").unwrap();
        assert_eq!(padded.as_bytes(), b"  0123456789abcdef");
    }

    #[test]
    fn test_secret_config_debug_is_redacted() {
        let secret = SecretConfig::new("super-secret-value-123").unwrap();
        let debug = format!("{secret:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }

    // =========================================================================
    // RegistryConfig serde tests
    // =========================================================================

    #[test]
    fn test_registry_config_deserializes_partial_json() {
        let json = r#"{ "suffix": { "min": 100, "max": 200 }, "sweep": { "interval": "2m" } }"#;
        let config: RegistryConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.suffix.min, 100);
        assert_eq!(config.suffix.max_attempts, 10);
        assert_eq!(config.expiration.link_ttl_minutes, 60);
        assert_eq!(config.sweep.interval, Duration::from_secs(120));
        config.validate().unwrap();
    }

    #[test]
    fn test_registry_config_validate_catches_bad_section() {
        let json = r#"{ "suffix": { "min": 5, "max": 1 } }"#;
        let config: RegistryConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_registry_config_sweep_interval_serializes_humantime() {
        let json = serde_json::to_value(RegistryConfig::default()).unwrap();
        assert_eq!(json["sweep"]["interval"], "5m");
    }

    #[test]
    fn test_registry_config_schema_lists_sections() {
        let schema = schemars::schema_for!(RegistryConfig);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("suffix"));
        assert!(json.contains("expiration"));
        assert!(json.contains("sweep"));
    }
}
