//! Identifier composition and parsing.
//!
//! An identifier has the shape `<username>.<suffix>.<namespace>`. The
//! namespace tag selects which store owns the record; the suffix is the
//! numeric disambiguator allocated at issuance.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// The two identifier classes served by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Append-only identifiers. Never updated, removed only by expiry.
    Inco,
    /// Password-protected identifiers supporting re-targeting, rename, and renewal.
    Link,
}

impl Namespace {
    /// Returns the tag used as the last identifier segment.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Inco => "inco",
            Self::Link => "link",
        }
    }

    /// Looks up a namespace by its tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "inco" => Some(Self::Inco),
            "link" => Some(Self::Link),
            _ => None,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Namespace {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ValidationError {
            field: "tld".to_string(),
            constraint: "must be inco or link".to_string(),
        })
    }
}

/// A parsed `<username>.<suffix>.<namespace>` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    username: String,
    suffix: u32,
    namespace: Namespace,
}

impl Identifier {
    /// Composes an identifier from already-validated parts.
    pub fn new(username: impl Into<String>, suffix: u32, namespace: Namespace) -> Self {
        Self { username: username.into(), suffix, namespace }
    }

    /// Parses an identifier string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] unless the input has exactly three
    /// dot-separated segments, a non-empty username, a decimal suffix, and a
    /// known namespace tag.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = |constraint: &str| ValidationError {
            field: "identifier".to_string(),
            constraint: constraint.to_string(),
        };

        let mut parts = raw.split('.');
        let (Some(username), Some(suffix), Some(tag), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("must match <username>.<number>.<tld>"));
        };

        if username.is_empty() {
            return Err(invalid("username segment must not be empty"));
        }
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("suffix segment must be a decimal number"));
        }
        let suffix = suffix.parse::<u32>().map_err(|_| invalid("suffix segment is out of range"))?;
        let namespace = Namespace::from_tag(tag).ok_or_else(|| invalid("unknown identifier tld"))?;

        Ok(Self { username: username.to_string(), suffix, namespace })
    }

    /// Parses an identifier and requires it to belong to `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if parsing fails or the tag differs.
    pub fn parse_in(raw: &str, expected: Namespace) -> Result<Self, ValidationError> {
        let parsed = Self::parse(raw)?;
        if parsed.namespace != expected {
            return Err(ValidationError {
                field: "identifier".to_string(),
                constraint: format!("must match <username>.<number>.{}", expected.tag()),
            });
        }
        Ok(parsed)
    }

    /// Username segment.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Numeric suffix segment.
    pub fn suffix(&self) -> u32 {
        self.suffix
    }

    /// Namespace selected by the tag segment.
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Returns the identifier obtained by swapping in a new username while
    /// keeping the suffix and namespace.
    #[must_use]
    pub fn with_username(&self, username: impl Into<String>) -> Self {
        Self { username: username.into(), suffix: self.suffix, namespace: self.namespace }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.username, self.suffix, self.namespace.tag())
    }
}

impl FromStr for Identifier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
