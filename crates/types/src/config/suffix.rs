//! Suffix allocation range.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Inclusive suffix range and probe budget.
///
/// # Validation Rules
///
/// - `min` must be >= 1
/// - `min` must be <= `max`
/// - `max_attempts` must be >= 1
///
/// # Example
///
/// ```no_run
/// # use handles_types::config::SuffixConfig;
/// let config = SuffixConfig::builder()
///     .min(1000)
///     .max(9999)
///     .max_attempts(20)
///     .build()
///     .expect("valid suffix config");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SuffixConfig {
    /// Smallest suffix that may be drawn.
    #[serde(default = "default_min")]
    pub min: u32,
    /// Largest suffix that may be drawn.
    #[serde(default = "default_max")]
    pub max: u32,
    /// Number of candidates probed before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

#[bon::bon]
impl SuffixConfig {
    /// Creates a new suffix configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if:
    /// - `min` is zero
    /// - `min` > `max`
    /// - `max_attempts` is zero
    #[builder]
    pub fn new(
        #[builder(default = default_min())] min: u32,
        #[builder(default = default_max())] max: u32,
        #[builder(default = default_max_attempts())] max_attempts: u32,
    ) -> Result<Self, ConfigError> {
        let config = Self { min, max, max_attempts };
        config.validate()?;
        Ok(config)
    }
}

impl SuffixConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min == 0 {
            return Err(ConfigError::Validation { message: "min must be >= 1".to_string() });
        }
        if self.min > self.max {
            return Err(ConfigError::Validation {
                message: format!("min ({}) must be <= max ({})", self.min, self.max),
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Validation {
                message: "max_attempts must be >= 1".to_string(),
            });
        }
        Ok(())
    }

    /// Number of distinct suffixes in the range.
    pub fn span(&self) -> u64 {
        u64::from(self.max) - u64::from(self.min) + 1
    }
}

impl Default for SuffixConfig {
    fn default() -> Self {
        Self { min: default_min(), max: default_max(), max_attempts: default_max_attempts() }
    }
}

fn default_min() -> u32 {
    10
}

fn default_max() -> u32 {
    99_999
}

fn default_max_attempts() -> u32 {
    10
}
