//! Service secret used to key password hashes.

use std::fmt;

use super::ConfigError;

/// Minimum secret length in characters, measured after trimming.
pub const MIN_SECRET_CHARS: usize = 16;

/// HMAC key for `link` password hashes.
///
/// Kept out of [`super::RegistryConfig`] so deployments serving only the
/// `inco` namespace can start without one. Never serialized; `Debug` output
/// is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretConfig {
    hmac_secret: String,
}

impl SecretConfig {
    /// Wraps a secret after checking its trimmed length.
    ///
    /// Only the length check trims. The key is kept byte for byte.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the trimmed secret has fewer
    /// than [`MIN_SECRET_CHARS`] characters.
    pub fn new(raw: impl Into<String>) -> Result<Self, ConfigError> {
        let hmac_secret = raw.into();
        if hmac_secret.trim().chars().count() < MIN_SECRET_CHARS {
            return Err(ConfigError::Validation {
                message: format!("hmac_secret must be at least {MIN_SECRET_CHARS} chars"),
            });
        }
        Ok(Self { hmac_secret })
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.hmac_secret.as_bytes()
    }
}

impl fmt::Debug for SecretConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretConfig").field("hmac_secret", &"<redacted>").finish()
    }
}
