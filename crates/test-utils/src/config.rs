//! Test configuration helpers.
//!
//! Provides sensible default configurations for tests, centralizing
//! magic values that would otherwise be scattered across test modules.

use std::time::Duration;

use handles_types::config::{ExpirationConfig, RegistryConfig, SuffixConfig, SweepConfig};

/// HMAC secret used by tests. Long enough to pass validation.
pub const TEST_HMAC_SECRET: &str = "test-hmac-secret-0123456789";

/// Returns a registry configuration suitable for tests.
///
/// - suffix range `1..=99_999` with 5 attempts
/// - `inco` lives one day, `link` lives 60 minutes
/// - sweep every second
#[must_use]
pub fn test_registry_config() -> RegistryConfig {
    RegistryConfig {
        suffix: SuffixConfig { min: 1, max: 99_999, max_attempts: 5 },
        expiration: ExpirationConfig { inco_ttl_minutes: 1440, link_ttl_minutes: 60 },
        sweep: SweepConfig { interval: Duration::from_secs(1) },
    }
}

/// Same as [`test_registry_config`] with a fixed suffix range.
#[must_use]
pub fn test_registry_config_with_range(min: u32, max: u32, max_attempts: u32) -> RegistryConfig {
    let mut config = test_registry_config();
    config.suffix = SuffixConfig { min, max, max_attempts };
    config
}
