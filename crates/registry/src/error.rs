//! Registry error type.
//!
//! Every domain outcome a caller can act on has its own variant and maps to
//! a stable [`ErrorCode`]. Infrastructure faults are wrapped in
//! [`RegistryError::Storage`] and classified by the driver message.

use handles_store::StorageError;
use handles_types::{error::ErrorCode, Namespace, ValidationError};
use snafu::Snafu;

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors returned by the registry and its stores.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RegistryError {
    /// Every probed suffix was already taken.
    #[snafu(display("no free suffix in [{min}, {max}] after {attempts} attempts"))]
    SuffixExhausted {
        /// Number of candidates probed.
        attempts: u32,
        /// Lower bound of the range.
        min: u32,
        /// Upper bound of the range.
        max: u32,
    },

    /// A concurrent issuance won the race for the same suffix.
    #[snafu(display("suffix {suffix} is already taken in {namespace}"))]
    DuplicateSuffix {
        /// Namespace the insert targeted.
        namespace: Namespace,
        /// Contested suffix.
        suffix: u32,
    },

    /// No live record exists for the identifier.
    #[snafu(display("identifier {identifier} was not found"))]
    NotFound {
        /// Requested identifier.
        identifier: String,
    },

    /// The record exists but its lifetime has ended.
    #[snafu(display("identifier {identifier} has expired"))]
    Expired {
        /// Requested identifier.
        identifier: String,
    },

    /// The supplied password does not match.
    #[snafu(display("invalid credentials"))]
    AuthFailed {
        /// Identifier the caller tried to mutate.
        identifier: String,
    },

    /// A rename target is bound to another record.
    #[snafu(display("identifier {identifier} is unavailable"))]
    IdentifierTaken {
        /// The contested identifier.
        identifier: String,
    },

    /// A mutation was attempted on the append-only namespace.
    #[snafu(display("{identifier}: inco identifiers are immutable and append-only"))]
    ImmutableViolation {
        /// Identifier the caller tried to mutate.
        identifier: String,
    },

    /// Input failed validation.
    #[snafu(display("validation failed: {source}"))]
    Validation {
        /// The violated constraint.
        source: ValidationError,
    },

    /// The service lacks configuration required by the operation.
    #[snafu(display("service misconfigured: {message}"))]
    Misconfigured {
        /// What is missing or invalid.
        message: String,
    },

    /// The storage layer failed.
    #[snafu(display("storage error: {source}"))]
    Storage {
        /// The underlying driver error.
        source: StorageError,
    },
}

impl RegistryError {
    /// Stable symbolic code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::SuffixExhausted { .. } => ErrorCode::SuffixExhausted,
            Self::DuplicateSuffix { .. } => ErrorCode::DuplicateSuffix,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Expired { .. } => ErrorCode::Expired,
            Self::AuthFailed { .. } => ErrorCode::AuthFailed,
            Self::IdentifierTaken { .. } => ErrorCode::IdentifierTaken,
            Self::ImmutableViolation { .. } => ErrorCode::ImmutableDomain,
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::Misconfigured { .. } => ErrorCode::ServiceMisconfigured,
            Self::Storage { source } => {
                if source.is_schema_missing() {
                    ErrorCode::StorageNotReady
                } else {
                    ErrorCode::InternalError
                }
            },
        }
    }

    /// Whether the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }

    pub(crate) fn not_found(identifier: &str) -> Self {
        Self::NotFound { identifier: identifier.to_string() }
    }
}

impl From<ValidationError> for RegistryError {
    fn from(source: ValidationError) -> Self {
        Self::Validation { source }
    }
}

impl From<StorageError> for RegistryError {
    fn from(source: StorageError) -> Self {
        Self::Storage { source }
    }
}
