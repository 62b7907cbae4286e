//! Randomness capability for suffix selection and opaque record ids.

use rand::{Rng, rngs::OsRng};
use uuid::Uuid;

/// Source of suffix candidates and record ids.
///
/// Production code uses [`OsRandom`]; tests inject fixed sequences.
pub trait SuffixSource: Send + Sync {
    /// Draws a uniformly distributed integer in `[min, max]`.
    fn draw_suffix(&self, min: u32, max: u32) -> u32;

    /// Generates a fresh opaque record id.
    fn opaque_id(&self) -> String;
}

/// Operating-system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl SuffixSource for OsRandom {
    fn draw_suffix(&self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        OsRng.gen_range(min..=max)
    }

    fn opaque_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
