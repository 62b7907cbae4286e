//! Keyed hashing and constant-time comparison.
//!
//! Owner passwords are stored as HMAC-SHA256 digests keyed by the service
//! secret, hex-encoded. Verification recomputes the digest and compares the
//! hex strings without branching on their contents.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded HMAC-SHA256 digest.
pub const HMAC_HEX_LENGTH: usize = 64;

/// Computes `HMAC-SHA256(secret, message)` and returns it as lowercase hex.
///
/// Deterministic for a given `(secret, message)` pair.
///
/// # Panics
///
/// Never in practice: HMAC accepts keys of any length, so key setup cannot
/// fail.
#[allow(clippy::expect_used)]
pub fn hmac_sha256_hex(secret: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Compares two hex strings in constant time.
///
/// Returns `false` when the lengths differ. Equal-length inputs are compared
/// by accumulating the XOR of every byte pair, so the running time does not
/// depend on where (or whether) the inputs differ.
pub fn timing_safe_eq_hex(left: &str, right: &str) -> bool {
    left.as_bytes().ct_eq(right.as_bytes()).into()
}
