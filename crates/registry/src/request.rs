//! Validated request values.
//!
//! Constructors normalize and validate raw input, so a value of these types
//! is always safe to hand to the registry.

use handles_types::{
    validation::{self, ValidationError},
    Namespace,
};

/// Username assigned to `link` identifiers issued without one.
pub const DEFAULT_LINK_USERNAME: &str = "link";

/// A validated destination URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination(String);

impl Destination {
    /// Accepts an absolute `https` URI.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for non-https, relative, or oversized URIs.
    pub fn simplex(raw: &str) -> Result<Self, ValidationError> {
        validation::validate_destination_uri(raw).map(Self)
    }

    /// Accepts an absolute `http` or `https` URI. Only `link` identifiers
    /// may point at plain `http`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for other schemes, relative, or oversized URIs.
    pub fn target(raw: &str) -> Result<Self, ValidationError> {
        validation::validate_target_uri(raw).map(Self)
    }

    /// The normalized URI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value, returning the URI.
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A request to issue a new identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueRequest {
    /// Issue into the append-only namespace.
    Inco {
        /// Normalized username.
        username: String,
        /// https destination.
        destination: Destination,
    },
    /// Issue into the password-protected namespace.
    Link {
        /// Normalized username.
        username: String,
        /// Raw password; only its keyed digest is persisted.
        password: String,
        /// Initial destination.
        destination: Destination,
    },
}

impl IssueRequest {
    /// Builds an `inco` issuance request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the username or URI is invalid.
    pub fn inco(username: &str, destination_uri: &str) -> Result<Self, ValidationError> {
        Ok(Self::Inco {
            username: validation::validate_username(username)?,
            destination: Destination::simplex(destination_uri)?,
        })
    }

    /// Builds a `link` issuance request. A missing username defaults to
    /// [`DEFAULT_LINK_USERNAME`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the username or password is invalid.
    pub fn link(
        username: Option<&str>,
        password: &str,
        destination: Destination,
    ) -> Result<Self, ValidationError> {
        let username = match username {
            Some(raw) => validation::validate_username(raw)?,
            None => DEFAULT_LINK_USERNAME.to_string(),
        };
        let password = validation::validate_password(password)?.to_string();
        Ok(Self::Link { username, password, destination })
    }

    /// Builds a request for the namespace named by `tld`.
    ///
    /// A `link` request requires `password`; `username` may be omitted only
    /// for `link`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an unknown tag, a missing required
    /// field, or any invalid field.
    pub fn for_tld(
        tld: &str,
        username: Option<&str>,
        password: Option<&str>,
        destination_uri: &str,
    ) -> Result<Self, ValidationError> {
        match validation::validate_tld(tld)? {
            Namespace::Inco => {
                let username = username.ok_or_else(|| missing("username"))?;
                Self::inco(username, destination_uri)
            },
            Namespace::Link => {
                let password = password.ok_or_else(|| missing("password"))?;
                Self::link(username, password, Destination::simplex(destination_uri)?)
            },
        }
    }

    /// Target namespace.
    pub fn namespace(&self) -> Namespace {
        match self {
            Self::Inco { .. } => Namespace::Inco,
            Self::Link { .. } => Namespace::Link,
        }
    }

    /// Normalized username.
    pub fn username(&self) -> &str {
        match self {
            Self::Inco { username, .. } | Self::Link { username, .. } => username,
        }
    }
}

fn missing(field: &str) -> ValidationError {
    ValidationError { field: field.to_string(), constraint: format!("{field} is required") }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use handles_test_utils::strategies::{arb_destination, arb_password, arb_username};
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_inco_request_normalizes_username() {
        let req = IssueRequest::inco(" Alice ", "https://example.com/a").unwrap();
        assert_eq!(req.username(), "alice");
        assert_eq!(req.namespace(), Namespace::Inco);
    }

    #[test]
    fn test_inco_rejects_http() {
        assert!(IssueRequest::inco("alice", "http://example.com/a").is_err());
    }

    #[test]
    fn test_link_defaults_username() {
        let req =
            IssueRequest::link(None, "password1", Destination::simplex("https://x.test").unwrap())
                .unwrap();
        assert_eq!(req.username(), DEFAULT_LINK_USERNAME);
    }

    #[test]
    fn test_link_rejects_short_password() {
        let err =
            IssueRequest::link(Some("alice"), "short", Destination::target("http://x.test").unwrap())
                .unwrap_err();
        assert_eq!(err.field, "password");
    }

    #[test]
    fn test_target_allows_http_but_simplex_does_not() {
        assert!(Destination::target("http://x.test/a").is_ok());
        assert!(Destination::simplex("http://x.test/a").is_err());
    }

    #[test]
    fn test_for_tld_dispatch() {
        let req = IssueRequest::for_tld("link", None, Some("password1"), "https://x.test").unwrap();
        assert_eq!(req.namespace(), Namespace::Link);

        let err = IssueRequest::for_tld("inco", None, None, "https://x.test").unwrap_err();
        assert_eq!(err.field, "username");

        let err = IssueRequest::for_tld("link", Some("bob"), None, "https://x.test").unwrap_err();
        assert_eq!(err.field, "password");

        assert!(IssueRequest::for_tld("com", Some("bob"), None, "https://x.test").is_err());
    }

    proptest! {
        #[test]
        fn prop_link_request_keeps_password_verbatim(
            name in arb_username(),
            password in arb_password(),
            destination in arb_destination(),
        ) {
            let req = IssueRequest::for_tld("link", Some(&name), Some(&password), &destination).unwrap();
            prop_assert_eq!(req.username(), name.as_str());
            match req {
                IssueRequest::Link { password: kept, destination: dest, .. } => {
                    prop_assert_eq!(kept, password);
                    prop_assert_eq!(dest.as_str(), destination.as_str());
                },
                IssueRequest::Inco { .. } => prop_assert!(false, "expected a link request"),
            }
        }

        #[test]
        fn prop_inco_request_accepts_generated_destinations(
            name in arb_username(),
            destination in arb_destination(),
        ) {
            let req = IssueRequest::inco(&name, &destination).unwrap();
            prop_assert_eq!(req.namespace(), Namespace::Inco);
        }
    }
}
