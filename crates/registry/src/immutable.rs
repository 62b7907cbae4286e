//! Append-only store for the `inco` namespace.
//!
//! Records are created once and removed only by expiry. Older databases may
//! still carry a trigger that rejects every delete on the table, which would
//! also block expiry. Deletes therefore recover from that one failure by
//! dropping the trigger and retrying exactly once.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use handles_store::{
    schema::{DROP_INCO_NO_DELETE_TRIGGER, INCO_NO_DELETE_TRIGGER},
    Row, SqlClient, SqlValue, StorageError,
};
use handles_types::{time::format_timestamp, ImmutableRecord, Namespace};
use tracing::{info, warn};

use crate::{
    error::{RegistryError, Result},
    metrics,
    store::{timestamp_column, IdentifierStore},
};

const SUFFIX_EXISTS: &str = "SELECT 1 FROM inco_identifiers WHERE suffix = ? LIMIT 1";

const INSERT: &str = "INSERT INTO inco_identifiers
    (id, username, suffix, identifier, simplex_uri, created_at, expires_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)";

const FIND_BY_IDENTIFIER: &str = "SELECT id, username, suffix, identifier, simplex_uri,
    created_at, expires_at
    FROM inco_identifiers WHERE identifier = ? LIMIT 1";

const DELETE: &str = "DELETE FROM inco_identifiers WHERE identifier = ?";

const CLEANUP_EXPIRED: &str = "DELETE FROM inco_identifiers WHERE expires_at <= ?";

/// SQL-backed store for [`ImmutableRecord`]s.
#[derive(Clone)]
pub struct ImmutableStore {
    client: Arc<dyn SqlClient>,
}

impl ImmutableStore {
    /// Creates a store over `client`.
    pub fn new(client: Arc<dyn SqlClient>) -> Self {
        Self { client }
    }

    /// Runs a delete, dropping the legacy trigger and retrying once if the
    /// trigger rejected it.
    async fn run_delete(&self, sql: &str, params: Vec<SqlValue>) -> Result<u64> {
        match self.client.run(sql, params.clone()).await {
            Ok(changed) => Ok(changed),
            Err(err) if err.is_delete_blocked() => {
                warn!(trigger = INCO_NO_DELETE_TRIGGER, error = %err, "Delete blocked by legacy trigger");
                self.client.run(DROP_INCO_NO_DELETE_TRIGGER, Vec::new()).await?;
                metrics::record_trigger_heal();
                info!(trigger = INCO_NO_DELETE_TRIGGER, "Dropped legacy trigger, retrying delete");
                Ok(self.client.run(sql, params).await?)
            },
            Err(err) => Err(err.into()),
        }
    }
}

fn record_from_row(row: &Row) -> std::result::Result<ImmutableRecord, StorageError> {
    Ok(ImmutableRecord {
        id: row.text("id")?,
        username: row.text("username")?,
        suffix: row.u32("suffix")?,
        identifier: row.text("identifier")?,
        destination_uri: row.text("simplex_uri")?,
        created_at: timestamp_column(row, "created_at")?,
        expires_at: timestamp_column(row, "expires_at")?,
    })
}

#[async_trait]
impl IdentifierStore for ImmutableStore {
    type Record = ImmutableRecord;

    fn namespace(&self) -> Namespace {
        Namespace::Inco
    }

    async fn suffix_exists(&self, suffix: u32) -> Result<bool> {
        let row = self.client.first(SUFFIX_EXISTS, vec![suffix.into()]).await?;
        Ok(row.is_some())
    }

    async fn create(&self, record: &ImmutableRecord) -> Result<()> {
        let params = vec![
            SqlValue::from(&record.id),
            SqlValue::from(&record.username),
            SqlValue::from(record.suffix),
            SqlValue::from(&record.identifier),
            SqlValue::from(&record.destination_uri),
            SqlValue::from(format_timestamp(record.created_at)),
            SqlValue::from(format_timestamp(record.expires_at)),
        ];
        match self.client.run(INSERT, params).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_unique_violation("suffix") || err.is_unique_violation("identifier") => {
                Err(RegistryError::DuplicateSuffix { namespace: Namespace::Inco, suffix: record.suffix })
            },
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<ImmutableRecord>> {
        let row = self.client.first(FIND_BY_IDENTIFIER, vec![identifier.into()]).await?;
        Ok(row.as_ref().map(record_from_row).transpose()?)
    }

    async fn delete(&self, identifier: &str) -> Result<bool> {
        Ok(self.run_delete(DELETE, vec![identifier.into()]).await? > 0)
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        self.run_delete(CLEANUP_EXPIRED, vec![format_timestamp(now).into()]).await
    }
}
