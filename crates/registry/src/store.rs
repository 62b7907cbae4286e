//! Store traits shared by both namespaces.
//!
//! [`IdentifierStore`] covers what every namespace supports. Only the
//! `link` store implements [`MutableIdentifierStore`]; the `inco` store has
//! no update path at the type level.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use handles_store::{Row, StorageError};
use handles_types::{time::parse_timestamp, ExpiringRecord, Namespace};

use crate::error::Result;

/// Operations available in every namespace.
#[async_trait]
pub trait IdentifierStore: Send + Sync {
    /// Record type persisted by this store.
    type Record: ExpiringRecord + Clone + Send + Sync + 'static;

    /// Namespace served by this store.
    fn namespace(&self) -> Namespace;

    /// Whether any record (live or not yet swept) holds `suffix`.
    async fn suffix_exists(&self, suffix: u32) -> Result<bool>;

    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::DuplicateSuffix`] if the uniqueness
    /// constraint rejects the insert.
    async fn create(&self, record: &Self::Record) -> Result<()>;

    /// Looks up a record by identifier, regardless of expiry.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Self::Record>>;

    /// Deletes a record. Returns whether a row was removed.
    async fn delete(&self, identifier: &str) -> Result<bool>;

    /// Deletes every record with `expires_at <= now`. Returns the count.
    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

/// Updates available only in the `link` namespace.
///
/// Each method returns whether a row was changed.
#[async_trait]
pub trait MutableIdentifierStore: IdentifierStore {
    /// Replaces the destination URI.
    async fn update_destination(&self, identifier: &str, destination_uri: &str) -> Result<bool>;

    /// Changes the username and the composed identifier together.
    async fn update_username(
        &self,
        identifier: &str,
        username: &str,
        new_identifier: &str,
    ) -> Result<bool>;

    /// Pushes expiry forward and stamps the renewal time.
    async fn renew(
        &self,
        identifier: &str,
        expires_at: DateTime<Utc>,
        renewed_at: DateTime<Utc>,
    ) -> Result<bool>;
}

/// Reads a persisted timestamp column.
pub(crate) fn timestamp_column(
    row: &Row,
    column: &str,
) -> std::result::Result<DateTime<Utc>, StorageError> {
    let raw = row.text(column)?;
    parse_timestamp(&raw).map_err(|e| StorageError::Decode {
        column: column.to_string(),
        reason: e.to_string(),
    })
}
