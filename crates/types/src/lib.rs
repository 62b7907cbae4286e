//! Core types, validation, and cryptographic primitives for the handles registry.
//!
//! This crate provides the foundational types used throughout the registry:
//! - Namespaces and composed identifiers (`alice.7884.link`)
//! - Persisted record shapes for both namespaces
//! - Input validation and the stable error-code catalog
//! - Keyed hashing with constant-time comparison
//! - Injected clock and randomness capabilities

pub mod config;
pub mod crypto;
pub mod error;
pub mod identifier;
pub mod random;
pub mod records;
pub mod time;
pub mod validation;

// Re-export commonly used types at crate root
pub use crypto::{hmac_sha256_hex, timing_safe_eq_hex};
pub use error::ErrorCode;
pub use identifier::{Identifier, Namespace};
pub use random::{OsRandom, SuffixSource};
pub use records::{ExpiringRecord, ImmutableRecord, MutableRecord};
pub use time::{Clock, SystemClock};
pub use validation::ValidationError;
