//! Background sweep cadence.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Minimum interval between sweeps.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Expired-record sweep configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SweepConfig {
    /// Interval between sweep cycles. Must be >= 1s. Default: 5 minutes.
    #[serde(default = "default_sweep_interval")]
    #[serde(with = "super::humantime_serde")]
    #[schemars(with = "String")]
    pub interval: Duration,
}

#[bon::bon]
impl SweepConfig {
    /// Creates a new sweep configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `interval` is under one second.
    #[builder]
    pub fn new(
        #[builder(default = default_sweep_interval())] interval: Duration,
    ) -> Result<Self, ConfigError> {
        let config = Self { interval };
        config.validate()?;
        Ok(config)
    }
}

impl SweepConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `interval` is under one second.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval < MIN_SWEEP_INTERVAL {
            return Err(ConfigError::Validation {
                message: format!("interval must be >= 1s, got {:?}", self.interval),
            });
        }
        Ok(())
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { interval: default_sweep_interval() }
    }
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(300)
}
