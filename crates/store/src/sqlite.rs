//! SQLite implementation of [`SqlClient`].

use std::{path::Path, sync::Arc, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params_from_iter, types::Value, Connection};
use tracing::debug;

use crate::{
    client::{Row, SqlClient, SqlValue},
    error::{Result, StorageError},
    schema::MIGRATIONS,
};

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A single SQLite connection shared by all stores.
///
/// Statements are serialized through the mutex and executed on Tokio's
/// blocking pool.
#[derive(Clone)]
pub struct SqliteClient {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteClient {
    /// Opens (or creates) a database file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open_err = |e: rusqlite::Error| StorageError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        let conn = Connection::open(path).map_err(open_err)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(open_err)?;
        debug!(path = %path.display(), "Opened SQLite database");
        Ok(Self::from_connection(conn))
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::Open {
            path: ":memory:".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_connection(conn))
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn: Arc::new(Mutex::new(conn)) }
    }

    /// Applies the schema. Safe to call on every start.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Query`] if a schema statement fails.
    pub async fn migrate(&self) -> Result<()> {
        self.with_connection(|conn| {
            for statement in MIGRATIONS {
                conn.execute_batch(statement)?;
            }
            Ok(())
        })
        .await?;
        debug!(statements = MIGRATIONS.len(), "Applied schema");
        Ok(())
    }

    async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            f(&guard)
        })
        .await
        .map_err(|e| StorageError::Task { message: e.to_string() })?
    }
}

fn to_value(value: SqlValue) -> Value {
    match value {
        SqlValue::Integer(v) => Value::Integer(v),
        SqlValue::Text(v) => Value::Text(v),
        SqlValue::Null => Value::Null,
    }
}

fn from_value(column: &str, value: Value) -> Result<SqlValue> {
    match value {
        Value::Integer(v) => Ok(SqlValue::Integer(v)),
        Value::Text(v) => Ok(SqlValue::Text(v)),
        Value::Null => Ok(SqlValue::Null),
        Value::Real(_) | Value::Blob(_) => Err(StorageError::Decode {
            column: column.to_string(),
            reason: "unsupported column type".to_string(),
        }),
    }
}

#[async_trait]
impl SqlClient for SqliteClient {
    async fn first(&self, sql: &str, params: Vec<SqlValue>) -> Result<Option<Row>> {
        let sql = sql.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare_cached(&sql)?;
            let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let mut rows = stmt.query(params_from_iter(params.into_iter().map(to_value)))?;
            let Some(row) = rows.next()? else {
                return Ok(None);
            };
            let mut out = Row::new();
            for (index, name) in names.iter().enumerate() {
                let value: Value = row.get(index)?;
                out.insert(name.clone(), from_value(name, value)?);
            }
            Ok(Some(out))
        })
        .await
    }

    async fn run(&self, sql: &str, params: Vec<SqlValue>) -> Result<u64> {
        let sql = sql.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare_cached(&sql)?;
            let changed = stmt.execute(params_from_iter(params.into_iter().map(to_value)))?;
            Ok(changed as u64)
        })
        .await
    }
}
