//! Proptest strategies for registry domain values.
//!
//! # Usage
//!
//! ```no_run
//! use handles_test_utils::strategies;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_property(name in strategies::arb_username()) {
//!         // test invariant with a randomly generated username
//!     }
//! }
//! ```

use handles_types::config::SuffixConfig;
use proptest::prelude::*;

/// Generates a username accepted by validation, 1 or 3-32 characters.
pub fn arb_username() -> impl Strategy<Value = String> {
    prop_oneof!["[a-z0-9]", "[a-z0-9][a-z0-9_-]{1,30}[a-z0-9]"]
}

/// Generates a password of 8-64 printable ASCII characters.
pub fn arb_password() -> impl Strategy<Value = String> {
    "[!-~]{8,64}"
}

/// Generates an https destination URI.
pub fn arb_destination() -> impl Strategy<Value = String> {
    ("[a-z]{1,12}", "[a-z0-9]{0,24}").prop_map(|(host, path)| format!("https://{host}.test/{path}"))
}

/// Generates a valid suffix configuration with a span of 1-1000.
pub fn arb_suffix_config() -> impl Strategy<Value = SuffixConfig> {
    (1u32..100_000, 0u32..1000, 1u32..20).prop_map(|(min, span, max_attempts)| SuffixConfig {
        min,
        max: min + span,
        max_attempts,
    })
}
