//! Identifier allocation and lifecycle engine.
//!
//! Issues human-readable identifiers of the form `<username>.<suffix>.<tag>`
//! in two namespaces:
//!
//! - `inco`: append-only. Records are never updated and disappear only
//!   when they expire.
//! - `link`: password-protected. Owners can re-target, rename, renew, and
//!   delete their identifiers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use handles_registry::{IssueRequest, Registry};
//! use handles_store::SqliteClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SqliteClient::open_in_memory()?;
//! client.migrate().await?;
//! let registry = Registry::builder().client(Arc::new(client)).build()?;
//!
//! let id = registry.issue(IssueRequest::inco("alice", "https://example.com/alice")?).await?;
//! assert_eq!(registry.resolve(&id.to_string()).await?, "https://example.com/alice");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod allocator;
mod auth;
mod error;
mod expiration;
mod immutable;
pub mod metrics;
mod mutable;
mod registry;
mod request;
mod store;
mod sweep;

pub use allocator::allocate_suffix;
pub use auth::AuthGate;
pub use error::{RegistryError, Result};
pub use expiration::{find_live, ExpirationPolicy};
pub use immutable::ImmutableStore;
pub use mutable::MutableStore;
pub use registry::{Registry, SweepReport};
pub use request::{Destination, IssueRequest, DEFAULT_LINK_USERNAME};
pub use store::{IdentifierStore, MutableIdentifierStore};
pub use sweep::SweepJob;
