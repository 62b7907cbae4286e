//! handles-store: SQL client abstraction and SQLite driver.
//!
//! The registry's stores never talk to a database directly. They issue one
//! statement per operation through [`SqlClient`], which keeps the storage
//! engine swappable and lets tests inject failures at statement level.
//!
//! ## Quick Start
//!
//! ```no_run
//! use handles_store::{SqlClient, SqliteClient};
//!
//! # async fn example() -> handles_store::Result<()> {
//! let client = SqliteClient::open_in_memory()?;
//! client.migrate().await?;
//! let row = client
//!     .first("SELECT 1 FROM inco_identifiers WHERE suffix = ? LIMIT 1", vec![7884u32.into()])
//!     .await?;
//! assert!(row.is_none());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod error;
pub mod schema;
mod sqlite;

pub use client::{Row, SqlClient, SqlValue};
pub use error::{Result, StorageError};
pub use sqlite::SqliteClient;
