//! Statement-level SQL client abstraction.
//!
//! Stores issue exactly one statement per operation through [`SqlClient`],
//! binding positional parameters as [`SqlValue`]s. Implementations exist for
//! SQLite ([`crate::SqliteClient`]) and for tests (a recording mock in the
//! test-utils crate).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{Result, StorageError};

/// A bound parameter or a column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// 64-bit signed integer.
    Integer(i64),
    /// UTF-8 text.
    Text(String),
    /// SQL `NULL`.
    Null,
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::Integer(i64::from(value))
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(value.clone())
    }
}

/// A single result row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: HashMap<String, SqlValue>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column, consuming and returning the row.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.columns.insert(column.into(), value.into());
        self
    }

    /// Sets a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: SqlValue) {
        self.columns.insert(column.into(), value);
    }

    /// Raw column value, if present.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns.get(column)
    }

    /// Reads a text column.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Decode`] if the column is missing or not text.
    pub fn text(&self, column: &str) -> Result<String> {
        match self.get(column) {
            Some(SqlValue::Text(value)) => Ok(value.clone()),
            Some(other) => Err(decode(column, format!("expected text, got {other:?}"))),
            None => Err(decode(column, "column missing")),
        }
    }

    /// Reads an integer column.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Decode`] if the column is missing or not an integer.
    pub fn integer(&self, column: &str) -> Result<i64> {
        match self.get(column) {
            Some(SqlValue::Integer(value)) => Ok(*value),
            Some(other) => Err(decode(column, format!("expected integer, got {other:?}"))),
            None => Err(decode(column, "column missing")),
        }
    }

    /// Reads an integer column that must fit in a `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Decode`] if the column is missing, not an
    /// integer, or out of range.
    pub fn u32(&self, column: &str) -> Result<u32> {
        let value = self.integer(column)?;
        u32::try_from(value).map_err(|_| decode(column, format!("{value} out of range for u32")))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn decode(column: &str, reason: impl Into<String>) -> StorageError {
    StorageError::Decode { column: column.to_string(), reason: reason.into() }
}

/// Executes single SQL statements with positional `?` parameters.
#[async_trait]
pub trait SqlClient: Send + Sync {
    /// Runs a query and returns its first row, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the statement fails.
    async fn first(&self, sql: &str, params: Vec<SqlValue>) -> Result<Option<Row>>;

    /// Runs a statement and returns the number of rows it changed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the statement fails.
    async fn run(&self, sql: &str, params: Vec<SqlValue>) -> Result<u64>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let row = Row::new().with("identifier", "alice.11.link").with("suffix", 11u32);
        assert_eq!(row.text("identifier").unwrap(), "alice.11.link");
        assert_eq!(row.u32("suffix").unwrap(), 11);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_getter_type_mismatch_is_decode_error() {
        let row = Row::new().with("suffix", "eleven");
        let err = row.integer("suffix").unwrap_err();
        assert!(matches!(err, StorageError::Decode { .. }));
        assert!(err.to_string().contains("suffix"));
    }

    #[test]
    fn test_missing_column() {
        let err = Row::new().text("username").unwrap_err();
        assert!(err.to_string().contains("column missing"));
    }

    #[test]
    fn test_u32_out_of_range() {
        let row = Row::new().with("suffix", -1i64);
        assert!(row.u32("suffix").is_err());
    }
}
