//! Persisted identifier records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Common view over both record kinds used by expiry decisions.
pub trait ExpiringRecord {
    /// The composed identifier string (primary lookup key).
    fn identifier(&self) -> &str;

    /// When the record stops resolving.
    fn expires_at(&self) -> DateTime<Utc>;

    /// Whether the record is expired at `now`. A record expiring exactly at
    /// `now` is already expired.
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at() <= now
    }
}

/// A record in the append-only `inco` namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmutableRecord {
    /// Opaque unique token assigned at creation.
    pub id: String,
    /// Normalized lowercase handle.
    pub username: String,
    /// Numeric disambiguator, unique within the namespace.
    pub suffix: u32,
    /// `<username>.<suffix>.inco`.
    pub identifier: String,
    /// Absolute https URI the identifier resolves to.
    pub destination_uri: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Expiry time, strictly after `created_at`.
    pub expires_at: DateTime<Utc>,
}

impl ExpiringRecord for ImmutableRecord {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// A record in the password-protected `link` namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutableRecord {
    /// Opaque unique token assigned at creation.
    pub id: String,
    /// Current normalized lowercase handle.
    pub username: String,
    /// Numeric disambiguator, unique within the namespace and stable across renames.
    pub suffix: u32,
    /// `<username>.<suffix>.link`, recomputed on rename.
    pub identifier: String,
    /// Hex HMAC-SHA256 of the owner's password.
    pub password_hash: String,
    /// Current destination, replaceable by the owner.
    pub destination_uri: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Expiry time, pushed forward by renewals.
    pub expires_at: DateTime<Utc>,
    /// Time of the most recent renewal (creation time until the first ping).
    pub last_renewed_at: DateTime<Utc>,
}

impl ExpiringRecord for MutableRecord {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn record(expires_at: DateTime<Utc>) -> ImmutableRecord {
        ImmutableRecord {
            id: "id-1".to_string(),
            username: "alice".to_string(),
            suffix: 7999,
            identifier: "alice.7999.inco".to_string(),
            destination_uri: "https://example.com/user/alice".to_string(),
            created_at: expires_at - Duration::minutes(1),
            expires_at,
        }
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let at = Utc.with_ymd_and_hms(2026, 2, 16, 12, 0, 0).unwrap();
        let rec = record(at);
        assert!(!rec.is_expired_at(at - Duration::milliseconds(1)));
        assert!(rec.is_expired_at(at));
        assert!(rec.is_expired_at(at + Duration::seconds(1)));
    }

    #[test]
    fn test_serializes_with_snake_case_fields() {
        let at = Utc.with_ymd_and_hms(2026, 2, 16, 12, 0, 0).unwrap();
        let json = serde_json::to_value(record(at)).unwrap();
        assert_eq!(json["destination_uri"], "https://example.com/user/alice");
        assert_eq!(json["suffix"], 7999);
    }
}
