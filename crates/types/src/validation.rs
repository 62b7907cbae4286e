//! Input validation for issuance and mutation requests.
//!
//! Used by request constructors before any storage access happens.
//!
//! ## Character Whitelists
//!
//! - Usernames: `[a-z0-9_-]`, starting and ending with `[a-z0-9]`, 1-32 characters after
//!   trimming and lowercasing.
//! - Destination URIs: absolute `https` URIs up to 2048 characters.
//! - Link targets: absolute `http` or `https` URIs up to 2048 characters.

use std::fmt;

use url::Url;

use crate::identifier::Namespace;

/// Maximum username length in characters.
pub const MAX_USERNAME_CHARS: usize = 32;

/// Minimum password length in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Maximum password length in characters.
pub const MAX_PASSWORD_CHARS: usize = 256;

/// Maximum URI length in bytes, measured after trimming.
pub const MAX_URI_BYTES: usize = 2048;

/// Validation error with structured context.
///
/// Contains the specific constraint that was violated and the field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the violated constraint.
    pub constraint: String,
}

impl ValidationError {
    fn new(field: &str, constraint: impl Into<String>) -> Self {
        Self { field: field.to_string(), constraint: constraint.into() }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.constraint)
    }
}

impl std::error::Error for ValidationError {}

/// Normalizes and validates a username.
///
/// The value is trimmed and lowercased, then must match
/// `^[a-z0-9](?:[a-z0-9_-]{1,30}[a-z0-9])?$`. Note that two-character
/// usernames are rejected by that pattern while single characters pass.
///
/// # Errors
///
/// Returns [`ValidationError`] if the normalized value does not match.
pub fn validate_username(raw: &str) -> Result<String, ValidationError> {
    let normalized = raw.trim().to_lowercase();
    if is_valid_username(&normalized) {
        Ok(normalized)
    } else {
        Err(ValidationError::new("username", "username format is invalid"))
    }
}

fn is_valid_username(value: &str) -> bool {
    let bytes = value.as_bytes();
    let edge = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    match bytes {
        [] => false,
        [only] => edge(*only),
        [first, middle @ .., last] => {
            (1..=MAX_USERNAME_CHARS - 2).contains(&middle.len())
                && edge(*first)
                && edge(*last)
                && middle.iter().all(|&b| edge(b) || b == b'_' || b == b'-')
        },
    }
}

/// Validates a password length. The password itself is never normalized.
///
/// # Errors
///
/// Returns [`ValidationError`] unless the password has 8-256 characters.
pub fn validate_password(raw: &str) -> Result<&str, ValidationError> {
    let chars = raw.chars().count();
    if (MIN_PASSWORD_CHARS..=MAX_PASSWORD_CHARS).contains(&chars) {
        Ok(raw)
    } else {
        Err(ValidationError::new("password", "password must be 8-256 chars"))
    }
}

/// Validates a destination URI for either namespace.
///
/// # Errors
///
/// Returns [`ValidationError`] unless the trimmed value is an absolute
/// `https` URI no longer than [`MAX_URI_BYTES`].
pub fn validate_destination_uri(raw: &str) -> Result<String, ValidationError> {
    validate_uri(raw, "simplexUri", &["https"], "simplexUri must use https protocol")
}

/// Validates a link re-target URI, which may also use plain `http`.
///
/// # Errors
///
/// Returns [`ValidationError`] unless the trimmed value is an absolute
/// `http`/`https` URI no longer than [`MAX_URI_BYTES`].
pub fn validate_target_uri(raw: &str) -> Result<String, ValidationError> {
    validate_uri(raw, "target", &["http", "https"], "target protocol must be http or https")
}

fn validate_uri(
    raw: &str,
    field: &str,
    schemes: &[&str],
    scheme_constraint: &str,
) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed)
        .map_err(|_| ValidationError::new(field, format!("{field} must be a valid absolute URI")))?;
    if !schemes.contains(&parsed.scheme()) {
        return Err(ValidationError::new(field, scheme_constraint));
    }
    if trimmed.len() > MAX_URI_BYTES {
        return Err(ValidationError::new(
            field,
            format!("length {} bytes exceeds maximum {} bytes", trimmed.len(), MAX_URI_BYTES),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validates a namespace tag supplied alongside an issuance request.
///
/// # Errors
///
/// Returns [`ValidationError`] if the tag is neither `inco` nor `link`.
pub fn validate_tld(raw: &str) -> Result<Namespace, ValidationError> {
    raw.parse()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_username_is_trimmed_and_lowercased() {
        assert_eq!(validate_username("  Alice ").unwrap(), "alice");
    }

    #[test]
    fn test_username_accepts_single_character() {
        assert_eq!(validate_username("a").unwrap(), "a");
        assert_eq!(validate_username("7").unwrap(), "7");
    }

    #[test]
    fn test_username_rejects_two_characters() {
        // The middle group requires at least one character.
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abc").is_ok());
    }

    #[test]
    fn test_username_edges_must_be_alphanumeric() {
        assert!(validate_username("-alice").is_err());
        assert!(validate_username("alice_").is_err());
        assert!(validate_username("al_i-ce").is_ok());
    }

    #[test]
    fn test_username_rejects_dots_and_length() {
        assert!(validate_username("al.ice").is_err());
        assert!(validate_username(&"a".repeat(32)).is_ok());
        assert!(validate_username(&"a".repeat(33)).is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_password_bounds() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password(&"x".repeat(256)).is_ok());
        assert!(validate_password(&"x".repeat(257)).is_err());
    }

    #[test]
    fn test_destination_requires_https() {
        assert_eq!(
            validate_destination_uri(" https://example.com/u/alice ").unwrap(),
            "https://example.com/u/alice"
        );
        let err = validate_destination_uri("http://example.com").unwrap_err();
        assert!(err.constraint.contains("https"));
        assert!(validate_destination_uri("simplex://user#alice").is_err());
        assert!(validate_destination_uri("/relative/path").is_err());
    }

    #[test]
    fn test_destination_length_limit() {
        let long = format!("https://example.com/{}", "a".repeat(MAX_URI_BYTES));
        let err = validate_destination_uri(&long).unwrap_err();
        assert!(err.constraint.contains("exceeds maximum"));
    }

    #[test]
    fn test_target_allows_http() {
        assert!(validate_target_uri("http://example.com/x").is_ok());
        assert!(validate_target_uri("https://example.com/x").is_ok());
        assert!(validate_target_uri("ftp://example.com/x").is_err());
    }

    #[test]
    fn test_tld() {
        assert_eq!(validate_tld("inco").unwrap(), Namespace::Inco);
        assert!(validate_tld("com").is_err());
    }

    proptest! {
        #[test]
        fn prop_valid_usernames_are_idempotent(name in "[a-z0-9][a-z0-9_-]{1,30}[a-z0-9]") {
            let once = validate_username(&name).unwrap();
            prop_assert_eq!(validate_username(&once).unwrap(), once);
        }

        #[test]
        fn prop_usernames_never_contain_dots(raw in "\\PC{0,40}") {
            if let Ok(name) = validate_username(&raw) {
                prop_assert!(!name.contains('.'));
                prop_assert!(name.len() <= MAX_USERNAME_CHARS);
            }
        }
    }
}
