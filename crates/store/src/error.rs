//! Error types for the storage driver.

use snafu::Snafu;

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors surfaced by a [`crate::SqlClient`].
///
/// Driver failures keep the driver's message verbatim so callers can match
/// on it (constraint names, trigger messages, missing tables).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    /// The statement was rejected or failed to execute.
    #[snafu(display("{message}"))]
    Query {
        /// Driver-provided message.
        message: String,
    },

    /// A column was missing or had an unexpected type.
    #[snafu(display("failed to decode column {column}: {reason}"))]
    Decode {
        /// Column name.
        column: String,
        /// What went wrong.
        reason: String,
    },

    /// The database could not be opened.
    #[snafu(display("failed to open database at {path}: {message}"))]
    Open {
        /// Path that was opened.
        path: String,
        /// Driver-provided message.
        message: String,
    },

    /// The blocking task running the statement panicked or was cancelled.
    #[snafu(display("storage task failed: {message}"))]
    Task {
        /// Join error description.
        message: String,
    },
}

impl StorageError {
    /// The message callers match against.
    pub fn message(&self) -> String {
        match self {
            Self::Query { message } | Self::Task { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether a delete was rejected by the legacy append-only trigger.
    pub fn is_delete_blocked(&self) -> bool {
        let message = self.message();
        message.contains("append-only") && message.contains("cannot be deleted")
    }

    /// Whether a UNIQUE constraint on `column` rejected the statement.
    ///
    /// SQLite reports these as `UNIQUE constraint failed: <table>.<column>`.
    pub fn is_unique_violation(&self, column: &str) -> bool {
        let message = self.message();
        message.contains("UNIQUE constraint failed") && message.contains(&format!(".{column}"))
    }

    /// Whether the failure indicates the store is not ready to serve
    /// (schema not applied yet, or database locked).
    pub fn is_schema_missing(&self) -> bool {
        let message = self.message();
        message.contains("no such table")
            || message.contains("no such column")
            || message.contains("D1_ERROR")
            || message.contains("database is locked")
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(source: rusqlite::Error) -> Self {
        StorageError::Query { message: source.to_string() }
    }
}
