//! Table definitions for both namespaces.
//!
//! Timestamps are stored as fixed-width RFC 3339 text, so `expires_at <= ?`
//! comparisons are lexicographic and chronological at once.

/// Legacy trigger that rejected every delete on `inco_identifiers`.
///
/// Older deployments installed it to enforce append-only semantics, which
/// also blocked expiry. It is never created by [`MIGRATIONS`].
pub const INCO_NO_DELETE_TRIGGER: &str = "tr_inco_no_delete";

/// Statement removing [`INCO_NO_DELETE_TRIGGER`].
pub const DROP_INCO_NO_DELETE_TRIGGER: &str = "DROP TRIGGER IF EXISTS tr_inco_no_delete";

/// Message raised by [`INCO_NO_DELETE_TRIGGER`].
pub const DELETE_BLOCKED_MESSAGE: &str = "inco_identifiers is append-only and cannot be deleted";

/// Idempotent schema statements, applied in order.
pub const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS inco_identifiers (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL,
        suffix INTEGER NOT NULL UNIQUE,
        identifier TEXT NOT NULL UNIQUE,
        simplex_uri TEXT NOT NULL,
        created_at TEXT NOT NULL,
        expires_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_inco_identifiers_expires_at
        ON inco_identifiers (expires_at)",
    "CREATE TABLE IF NOT EXISTS link_identifiers (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL,
        suffix INTEGER NOT NULL UNIQUE,
        identifier TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        simplex_uri TEXT NOT NULL,
        created_at TEXT NOT NULL,
        expires_at TEXT NOT NULL,
        last_ping_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_link_identifiers_expires_at
        ON link_identifiers (expires_at)",
];

/// Recreates the legacy append-only trigger. Only used to exercise the
/// self-healing delete path.
pub const CREATE_INCO_NO_DELETE_TRIGGER: &str = "CREATE TRIGGER IF NOT EXISTS tr_inco_no_delete
    BEFORE DELETE ON inco_identifiers
    BEGIN
        SELECT RAISE(ABORT, 'inco_identifiers is append-only and cannot be deleted');
    END";
