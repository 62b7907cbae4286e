//! Namespace lifetimes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::identifier::Namespace;

/// Longest accepted TTL: ten years. Stored expiries must stay within
/// four-digit years to compare lexicographically.
pub const MAX_TTL_MINUTES: u32 = 10 * 366 * 24 * 60;

/// Time-to-live per namespace, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExpirationConfig {
    /// Lifetime of `inco` records. Default: 1440 (one day).
    #[serde(default = "default_inco_ttl_minutes")]
    pub inco_ttl_minutes: u32,
    /// Lifetime of `link` records and of each renewal. Default: 60.
    #[serde(default = "default_link_ttl_minutes")]
    pub link_ttl_minutes: u32,
}

#[bon::bon]
impl ExpirationConfig {
    /// Creates a new expiration configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if either TTL is zero or exceeds
    /// [`MAX_TTL_MINUTES`].
    #[builder]
    pub fn new(
        #[builder(default = default_inco_ttl_minutes())] inco_ttl_minutes: u32,
        #[builder(default = default_link_ttl_minutes())] link_ttl_minutes: u32,
    ) -> Result<Self, ConfigError> {
        let config = Self { inco_ttl_minutes, link_ttl_minutes };
        config.validate()?;
        Ok(config)
    }
}

impl ExpirationConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if either TTL is zero or exceeds
    /// [`MAX_TTL_MINUTES`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, minutes) in
            [("inco_ttl_minutes", self.inco_ttl_minutes), ("link_ttl_minutes", self.link_ttl_minutes)]
        {
            if minutes == 0 {
                return Err(ConfigError::Validation { message: format!("{name} must be >= 1") });
            }
            if minutes > MAX_TTL_MINUTES {
                return Err(ConfigError::Validation {
                    message: format!("{name} must be <= {MAX_TTL_MINUTES}"),
                });
            }
        }
        Ok(())
    }

    /// TTL for the given namespace.
    pub fn ttl_minutes(&self, namespace: Namespace) -> u32 {
        match namespace {
            Namespace::Inco => self.inco_ttl_minutes,
            Namespace::Link => self.link_ttl_minutes,
        }
    }
}

impl Default for ExpirationConfig {
    fn default() -> Self {
        Self {
            inco_ttl_minutes: default_inco_ttl_minutes(),
            link_ttl_minutes: default_link_ttl_minutes(),
        }
    }
}

fn default_inco_ttl_minutes() -> u32 {
    1440
}

fn default_link_ttl_minutes() -> u32 {
    60
}
