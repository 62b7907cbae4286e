//! Authentication gate for `link` mutations.
//!
//! Every mutation other than creation runs the same three checks, strictly
//! in order: the record must exist, must not be expired, and the supplied
//! password must hash to the stored value. Nothing is written before all
//! three pass.

use chrono::{DateTime, Utc};
use handles_types::{config::SecretConfig, crypto, ExpiringRecord, MutableRecord};
use tracing::debug;

use crate::{
    error::{RegistryError, Result},
    metrics,
    store::IdentifierStore,
};

/// Verifies owner credentials against stored HMAC digests.
#[derive(Debug, Clone)]
pub struct AuthGate {
    secret: SecretConfig,
}

impl AuthGate {
    /// Creates a gate keyed by `secret`.
    pub fn new(secret: SecretConfig) -> Self {
        Self { secret }
    }

    /// Computes the digest persisted for `password`.
    pub fn hash_password(&self, password: &str) -> String {
        crypto::hmac_sha256_hex(self.secret.as_bytes(), password.as_bytes())
    }

    /// Compares `password` against `stored_hash` in constant time.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        crypto::timing_safe_eq_hex(&self.hash_password(password), stored_hash)
    }

    /// Runs the lookup, liveness, and credential checks.
    ///
    /// Returns the authenticated record on success.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if no record exists.
    /// - [`RegistryError::Expired`] if `expires_at <= now`.
    /// - [`RegistryError::AuthFailed`] if the password does not match.
    pub async fn authenticate<S>(
        &self,
        store: &S,
        identifier: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<MutableRecord>
    where
        S: IdentifierStore<Record = MutableRecord> + ?Sized,
    {
        let record = store
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| RegistryError::not_found(identifier))?;

        if record.is_expired_at(now) {
            debug!(identifier, "Rejected mutation of expired identifier");
            return Err(RegistryError::Expired { identifier: identifier.to_string() });
        }

        if !self.verify(password, &record.password_hash) {
            metrics::record_auth_failure();
            debug!(identifier, "Rejected mutation with invalid credentials");
            return Err(RegistryError::AuthFailed { identifier: identifier.to_string() });
        }

        Ok(record)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone};
    use handles_store::{Row, SqlValue};
    use handles_test_utils::{RecordingClient, TEST_HMAC_SECRET};
    use handles_types::time::format_timestamp;

    use super::*;
    use crate::mutable::MutableStore;

    fn gate() -> AuthGate {
        AuthGate::new(SecretConfig::new(TEST_HMAC_SECRET).unwrap())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 16, 12, 0, 0).unwrap()
    }

    fn stored_row(password_hash: &str, expires_at: DateTime<Utc>) -> Row {
        let created = format_timestamp(expires_at - Duration::hours(1));
        Row::new()
            .with("id", "id-1")
            .with("username", "alice")
            .with("suffix", SqlValue::Integer(11))
            .with("identifier", "alice.11.link")
            .with("password_hash", password_hash)
            .with("simplex_uri", "https://example.com/alice")
            .with("created_at", created.clone())
            .with("expires_at", format_timestamp(expires_at))
            .with("last_ping_at", created)
    }

    #[test]
    fn test_hash_is_keyed_hex() {
        let gate = gate();
        let digest = gate.hash_password("my-password");
        assert_eq!(digest.len(), 64);
        assert!(gate.verify("my-password", &digest));
        assert!(!gate.verify("other-password", &digest));
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let client = Arc::new(RecordingClient::new());
        let store = MutableStore::new(client);
        let err = gate().authenticate(&store, "alice.11.link", "password1", now()).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_expiry_is_checked_before_credentials() {
        let client = Arc::new(RecordingClient::new());
        // Wrong hash and expired: liveness must win.
        client.respond_row("SELECT id", stored_row(&"00".repeat(32), now()));
        let store = MutableStore::new(client);
        let err = gate().authenticate(&store, "alice.11.link", "password1", now()).await.unwrap_err();
        assert!(matches!(err, RegistryError::Expired { .. }));
    }

    #[tokio::test]
    async fn test_wrong_password_is_auth_failed() {
        let gate = gate();
        let client = Arc::new(RecordingClient::new());
        client.respond_row(
            "SELECT id",
            stored_row(&gate.hash_password("password1"), now() + Duration::minutes(5)),
        );
        let store = MutableStore::new(client);
        let err = gate.authenticate(&store, "alice.11.link", "password2", now()).await.unwrap_err();
        assert!(matches!(err, RegistryError::AuthFailed { .. }));
    }

    #[tokio::test]
    async fn test_valid_credentials_return_record_without_writes() {
        let gate = gate();
        let client = Arc::new(RecordingClient::new());
        client.respond_row(
            "SELECT id",
            stored_row(&gate.hash_password("password1"), now() + Duration::minutes(5)),
        );
        let store = MutableStore::new(client.clone());
        let record = gate.authenticate(&store, "alice.11.link", "password1", now()).await.unwrap();
        assert_eq!(record.suffix, 11);
        assert_eq!(client.statements().len(), 1);
    }

    #[tokio::test]
    async fn test_stored_hash_verifies_under_deployed_secret() {
        let gate = AuthGate::new(SecretConfig::new("1234567890abcdef").unwrap());
        let client = Arc::new(RecordingClient::new());
        client.respond_row(
            "SELECT id",
            stored_row(
                "d5224b7a35e3ea5bee05636b9f8adfb27bf38a8bc66b9ea5e9717f294f14e0bf",
                now() + Duration::minutes(1),
            ),
        );
        let store = MutableStore::new(client);
        gate.authenticate(&store, "alice.11.link", "my-password", now()).await.unwrap();

        // A trailing newline is part of the key, so the same digest no longer matches.
        let padded = AuthGate::new(SecretConfig::new("1234567890abcdef\n").unwrap());
        let err = padded.authenticate(&store, "alice.11.link", "my-password", now()).await.unwrap_err();
        assert!(matches!(err, RegistryError::AuthFailed { .. }));
    }
}
