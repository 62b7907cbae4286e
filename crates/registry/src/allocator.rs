//! Random suffix allocation with bounded probing.

use std::future::Future;

use handles_types::{config::SuffixConfig, SuffixSource};
use tracing::debug;

use crate::error::{RegistryError, Result};

/// Draws candidates from `source` and returns the first one `exists` reports
/// as free.
///
/// Exactly `config.max_attempts` probes are made before giving up. The
/// allocator knows nothing about namespaces; the storage uniqueness
/// constraint remains the final guarantee against races.
///
/// # Errors
///
/// Returns [`RegistryError::SuffixExhausted`] if every probe was positive,
/// or the first error returned by `exists`.
pub async fn allocate_suffix<F, Fut>(
    config: &SuffixConfig,
    source: &dyn SuffixSource,
    mut exists: F,
) -> Result<u32>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    for attempt in 1..=config.max_attempts {
        let candidate = source.draw_suffix(config.min, config.max);
        if !exists(candidate).await? {
            return Ok(candidate);
        }
        debug!(candidate, attempt, "Suffix in use");
    }
    Err(RegistryError::SuffixExhausted {
        attempts: config.max_attempts,
        min: config.min,
        max: config.max,
    })
}
