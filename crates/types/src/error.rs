//! Stable error code catalog for the handles registry.
//!
//! Every caller-actionable failure of the registry maps to exactly one
//! [`ErrorCode`]. Codes are symbolic strings (e.g. `"SUFFIX_EXHAUSTED"`) that
//! never change once published, so a boundary layer can translate them into
//! responses without inspecting error messages.
//!
//! | Code                   | Status | Retryable | Domain                          |
//! |------------------------|--------|-----------|---------------------------------|
//! | `SUFFIX_EXHAUSTED`     | 409    | yes       | Allocation                      |
//! | `DUPLICATE_SUFFIX`     | 409    | yes       | Allocation (storage race)       |
//! | `NOT_FOUND`            | 404    | no        | Resolution                      |
//! | `EXPIRED`              | 410    | no        | Authenticated mutation          |
//! | `AUTH_FAILED`          | 401    | no        | Authenticated mutation          |
//! | `IDENTIFIER_TAKEN`     | 409    | no        | Rename                          |
//! | `IMMUTABLE_DOMAIN`     | 405    | no        | Append-only namespace           |
//! | `VALIDATION_ERROR`     | 400    | no        | Input shape                     |
//! | `SERVICE_MISCONFIGURED`| 503    | no        | Configuration                   |
//! | `STORAGE_NOT_READY`    | 503    | yes       | Infrastructure                  |
//! | `INTERNAL_ERROR`       | 500    | no        | Infrastructure                  |

use core::fmt;

/// Machine-readable error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Every suffix probe within the attempt budget was already in use.
    SuffixExhausted,
    /// The storage uniqueness constraint rejected an insert that raced another issuance.
    DuplicateSuffix,
    /// The identifier is absent or has expired.
    NotFound,
    /// The identifier expired before an authenticated mutation could run.
    Expired,
    /// The supplied password does not match the stored hash.
    AuthFailed,
    /// A rename target identifier already belongs to another record.
    IdentifierTaken,
    /// A mutation or delete was attempted on the append-only namespace.
    ImmutableDomain,
    /// A request field failed validation.
    ValidationError,
    /// Required runtime configuration is missing or invalid.
    ServiceMisconfigured,
    /// The storage backend is unreachable or its schema is missing.
    StorageNotReady,
    /// Unexpected infrastructure fault.
    InternalError,
}

impl ErrorCode {
    /// All codes, in catalog order.
    pub const ALL: [ErrorCode; 11] = [
        Self::SuffixExhausted,
        Self::DuplicateSuffix,
        Self::NotFound,
        Self::Expired,
        Self::AuthFailed,
        Self::IdentifierTaken,
        Self::ImmutableDomain,
        Self::ValidationError,
        Self::ServiceMisconfigured,
        Self::StorageNotReady,
        Self::InternalError,
    ];

    /// Returns the stable symbolic name of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuffixExhausted => "SUFFIX_EXHAUSTED",
            Self::DuplicateSuffix => "DUPLICATE_SUFFIX",
            Self::NotFound => "NOT_FOUND",
            Self::Expired => "EXPIRED",
            Self::AuthFailed => "AUTH_FAILED",
            Self::IdentifierTaken => "IDENTIFIER_TAKEN",
            Self::ImmutableDomain => "IMMUTABLE_DOMAIN",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ServiceMisconfigured => "SERVICE_MISCONFIGURED",
            Self::StorageNotReady => "STORAGE_NOT_READY",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Parses a symbolic name back into a code, returning `None` for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_str() == name)
    }

    /// HTTP-equivalent status a boundary layer should use for this code.
    #[must_use]
    pub const fn status_hint(self) -> u16 {
        match self {
            Self::SuffixExhausted | Self::DuplicateSuffix | Self::IdentifierTaken => 409,
            Self::NotFound => 404,
            Self::Expired => 410,
            Self::AuthFailed => 401,
            Self::ImmutableDomain => 405,
            Self::ValidationError => 400,
            Self::ServiceMisconfigured | Self::StorageNotReady => 503,
            Self::InternalError => 500,
        }
    }

    /// Whether the same request may succeed if repeated later.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::SuffixExhausted | Self::DuplicateSuffix | Self::StorageNotReady)
    }

    /// Suggested recovery action for this error code.
    ///
    /// The guidance is stable and safe to show to end users.
    #[must_use]
    pub const fn suggested_action(self) -> &'static str {
        match self {
            Self::SuffixExhausted => {
                "Retry later. The suffix space for this namespace is crowded."
            },
            Self::DuplicateSuffix => {
                "Retry the issuance. Another request claimed the same suffix concurrently."
            },
            Self::NotFound => "Verify the identifier. It may never have existed or it has expired.",
            Self::Expired => "Issue a new identifier. Expired identifiers cannot be renewed.",
            Self::AuthFailed => "Check the password supplied for this identifier.",
            Self::IdentifierTaken => "Choose a different username for this suffix.",
            Self::ImmutableDomain => {
                "Identifiers in the append-only namespace cannot be changed or deleted."
            },
            Self::ValidationError => "Fix the request parameters and resubmit.",
            Self::ServiceMisconfigured => "Fix the service configuration and restart.",
            Self::StorageNotReady => {
                "Retry after a short delay. Verify the database is reachable and migrated."
            },
            Self::InternalError => "Unexpected failure. Collect context and report as an issue.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_catalog() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::from_name(code.as_str()), Some(code));
        }
        assert_eq!(ErrorCode::from_name("NOPE"), None);
    }

    #[test]
    fn test_display_uses_symbolic_name() {
        assert_eq!(ErrorCode::SuffixExhausted.to_string(), "SUFFIX_EXHAUSTED");
        assert_eq!(ErrorCode::ImmutableDomain.to_string(), "IMMUTABLE_DOMAIN");
    }

    #[test]
    fn test_status_hints_match_boundary_contract() {
        assert_eq!(ErrorCode::SuffixExhausted.status_hint(), 409);
        assert_eq!(ErrorCode::NotFound.status_hint(), 404);
        assert_eq!(ErrorCode::Expired.status_hint(), 410);
        assert_eq!(ErrorCode::AuthFailed.status_hint(), 401);
        assert_eq!(ErrorCode::ImmutableDomain.status_hint(), 405);
        assert_eq!(ErrorCode::StorageNotReady.status_hint(), 503);
    }

    #[test]
    fn test_only_capacity_and_infrastructure_codes_are_retryable() {
        let retryable: Vec<_> = ErrorCode::ALL.into_iter().filter(|c| c.is_retryable()).collect();
        assert_eq!(
            retryable,
            vec![ErrorCode::SuffixExhausted, ErrorCode::DuplicateSuffix, ErrorCode::StorageNotReady]
        );
    }

    #[test]
    fn test_every_code_has_guidance() {
        for code in ErrorCode::ALL {
            assert!(!code.suggested_action().is_empty(), "{code} has no guidance");
        }
    }
}
