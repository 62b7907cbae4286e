//! Password-protected store for the `link` namespace.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use handles_store::{Row, SqlClient, SqlValue, StorageError};
use handles_types::{time::format_timestamp, MutableRecord, Namespace};

use crate::{
    error::{RegistryError, Result},
    store::{timestamp_column, IdentifierStore, MutableIdentifierStore},
};

const SUFFIX_EXISTS: &str = "SELECT 1 FROM link_identifiers WHERE suffix = ? LIMIT 1";

const INSERT: &str = "INSERT INTO link_identifiers
    (id, username, suffix, identifier, password_hash, simplex_uri, created_at, expires_at, last_ping_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

const FIND_BY_IDENTIFIER: &str = "SELECT id, username, suffix, identifier, password_hash,
    simplex_uri, created_at, expires_at, last_ping_at
    FROM link_identifiers WHERE identifier = ? LIMIT 1";

const UPDATE_DESTINATION: &str = "UPDATE link_identifiers SET simplex_uri = ? WHERE identifier = ?";

const UPDATE_USERNAME: &str =
    "UPDATE link_identifiers SET username = ?, identifier = ? WHERE identifier = ?";

const RENEW: &str =
    "UPDATE link_identifiers SET expires_at = ?, last_ping_at = ? WHERE identifier = ?";

const DELETE: &str = "DELETE FROM link_identifiers WHERE identifier = ?";

const CLEANUP_EXPIRED: &str = "DELETE FROM link_identifiers WHERE expires_at <= ?";

/// SQL-backed store for [`MutableRecord`]s.
#[derive(Clone)]
pub struct MutableStore {
    client: Arc<dyn SqlClient>,
}

impl MutableStore {
    /// Creates a store over `client`.
    pub fn new(client: Arc<dyn SqlClient>) -> Self {
        Self { client }
    }
}

fn record_from_row(row: &Row) -> std::result::Result<MutableRecord, StorageError> {
    Ok(MutableRecord {
        id: row.text("id")?,
        username: row.text("username")?,
        suffix: row.u32("suffix")?,
        identifier: row.text("identifier")?,
        password_hash: row.text("password_hash")?,
        destination_uri: row.text("simplex_uri")?,
        created_at: timestamp_column(row, "created_at")?,
        expires_at: timestamp_column(row, "expires_at")?,
        last_renewed_at: timestamp_column(row, "last_ping_at")?,
    })
}

#[async_trait]
impl IdentifierStore for MutableStore {
    type Record = MutableRecord;

    fn namespace(&self) -> Namespace {
        Namespace::Link
    }

    async fn suffix_exists(&self, suffix: u32) -> Result<bool> {
        let row = self.client.first(SUFFIX_EXISTS, vec![suffix.into()]).await?;
        Ok(row.is_some())
    }

    async fn create(&self, record: &MutableRecord) -> Result<()> {
        let params = vec![
            SqlValue::from(&record.id),
            SqlValue::from(&record.username),
            SqlValue::from(record.suffix),
            SqlValue::from(&record.identifier),
            SqlValue::from(&record.password_hash),
            SqlValue::from(&record.destination_uri),
            SqlValue::from(format_timestamp(record.created_at)),
            SqlValue::from(format_timestamp(record.expires_at)),
            SqlValue::from(format_timestamp(record.last_renewed_at)),
        ];
        match self.client.run(INSERT, params).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_unique_violation("suffix") || err.is_unique_violation("identifier") => {
                Err(RegistryError::DuplicateSuffix { namespace: Namespace::Link, suffix: record.suffix })
            },
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<MutableRecord>> {
        let row = self.client.first(FIND_BY_IDENTIFIER, vec![identifier.into()]).await?;
        Ok(row.as_ref().map(record_from_row).transpose()?)
    }

    async fn delete(&self, identifier: &str) -> Result<bool> {
        Ok(self.client.run(DELETE, vec![identifier.into()]).await? > 0)
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        Ok(self.client.run(CLEANUP_EXPIRED, vec![format_timestamp(now).into()]).await?)
    }
}

#[async_trait]
impl MutableIdentifierStore for MutableStore {
    async fn update_destination(&self, identifier: &str, destination_uri: &str) -> Result<bool> {
        let changed = self
            .client
            .run(UPDATE_DESTINATION, vec![destination_uri.into(), identifier.into()])
            .await?;
        Ok(changed > 0)
    }

    async fn update_username(
        &self,
        identifier: &str,
        username: &str,
        new_identifier: &str,
    ) -> Result<bool> {
        let params = vec![username.into(), new_identifier.into(), identifier.into()];
        match self.client.run(UPDATE_USERNAME, params).await {
            Ok(changed) => Ok(changed > 0),
            Err(err) if err.is_unique_violation("identifier") => {
                Err(RegistryError::IdentifierTaken { identifier: new_identifier.to_string() })
            },
            Err(err) => Err(err.into()),
        }
    }

    async fn renew(
        &self,
        identifier: &str,
        expires_at: DateTime<Utc>,
        renewed_at: DateTime<Utc>,
    ) -> Result<bool> {
        let params = vec![
            format_timestamp(expires_at).into(),
            format_timestamp(renewed_at).into(),
            identifier.into(),
        ];
        Ok(self.client.run(RENEW, params).await? > 0)
    }
}
