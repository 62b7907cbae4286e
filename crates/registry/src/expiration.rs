//! Lifetime computation and lazy expiry-on-read.

use chrono::{DateTime, SubsecRound, Utc};
use handles_types::{config::ExpirationConfig, time::expiry_after, ExpiringRecord, Namespace};
use tracing::info;

use crate::{
    error::{RegistryError, Result},
    metrics::{self, ReclaimPath},
    store::IdentifierStore,
};

/// Computes expiry instants from the configured TTLs.
#[derive(Debug, Clone, Copy)]
pub struct ExpirationPolicy {
    config: ExpirationConfig,
}

impl ExpirationPolicy {
    /// Creates a policy from validated configuration.
    pub fn new(config: ExpirationConfig) -> Self {
        Self { config }
    }

    /// Expiry for a record of `namespace` created or renewed at `from`.
    ///
    /// Truncated to milliseconds, the precision timestamps are stored at.
    pub fn expires_at(&self, namespace: Namespace, from: DateTime<Utc>) -> DateTime<Utc> {
        expiry_after(from, self.config.ttl_minutes(namespace)).trunc_subsecs(3)
    }
}

/// Returns the live record for `identifier`.
///
/// An expired record is deleted on the spot and reported exactly like a
/// missing one.
///
/// # Errors
///
/// Returns [`RegistryError::NotFound`] if the record is missing or expired,
/// or a storage error from the lookup or the delete.
pub async fn find_live<S>(store: &S, identifier: &str, now: DateTime<Utc>) -> Result<S::Record>
where
    S: IdentifierStore + ?Sized,
{
    let record = store
        .find_by_identifier(identifier)
        .await?
        .ok_or_else(|| RegistryError::not_found(identifier))?;

    if record.is_expired_at(now) {
        if store.delete(identifier).await? {
            metrics::record_reclaimed(store.namespace(), ReclaimPath::Lazy, 1);
            info!(identifier, namespace = %store.namespace(), "Reclaimed expired identifier on read");
        }
        return Err(RegistryError::not_found(identifier));
    }

    Ok(record)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone};
    use handles_store::SqliteClient;
    use handles_types::ImmutableRecord;

    use super::*;
    use crate::immutable::ImmutableStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_policy_truncates_to_milliseconds() {
        let policy = ExpirationPolicy::new(ExpirationConfig::default());
        let from = now() + Duration::nanoseconds(123_456_789);
        let expires_at = policy.expires_at(Namespace::Link, from);
        assert_eq!(expires_at, now() + Duration::minutes(60) + Duration::milliseconds(123));
    }

    #[test]
    fn test_policy_uses_namespace_ttl() {
        let policy = ExpirationPolicy::new(
            ExpirationConfig::builder().inco_ttl_minutes(30).link_ttl_minutes(5).build().unwrap(),
        );
        assert_eq!(policy.expires_at(Namespace::Inco, now()), now() + Duration::minutes(30));
        assert_eq!(policy.expires_at(Namespace::Link, now()), now() + Duration::minutes(5));
    }

    async fn store_with(expires_at: DateTime<Utc>) -> ImmutableStore {
        let client = SqliteClient::open_in_memory().unwrap();
        client.migrate().await.unwrap();
        let store = ImmutableStore::new(Arc::new(client));
        store
            .create(&ImmutableRecord {
                id: "id-1".to_string(),
                username: "alice".to_string(),
                suffix: 11,
                identifier: "alice.11.inco".to_string(),
                destination_uri: "https://example.com/alice".to_string(),
                created_at: expires_at - Duration::days(1),
                expires_at,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_live_record_is_returned() {
        let store = store_with(now() + Duration::seconds(1)).await;
        let record = find_live(&store, "alice.11.inco", now()).await.unwrap();
        assert_eq!(record.destination_uri, "https://example.com/alice");
    }

    #[tokio::test]
    async fn test_expired_record_is_deleted_and_not_found() {
        let store = store_with(now()).await;
        let err = find_live(&store, "alice.11.inco", now()).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
        assert!(store.find_by_identifier("alice.11.inco").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let store = store_with(now() + Duration::days(1)).await;
        let err = find_live(&store, "bob.11.inco", now()).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }
}
