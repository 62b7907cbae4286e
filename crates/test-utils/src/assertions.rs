//! Test assertion helpers.
//!
//! Provides polling-based assertions for async test scenarios.

use std::{future::Future, time::Duration};

use tokio::time::{sleep, Instant};

/// Default polling interval for [`eventually`].
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Polls an async condition until it resolves to true or the timeout expires.
///
/// Useful when a background task (such as a sweeper) changes storage state
/// at a non-deterministic time.
///
/// Returns `true` if the condition held before the timeout.
///
/// # Example
///
/// ```no_run
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
/// use handles_test_utils::eventually;
///
/// # async fn example() {
/// let done = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&done);
/// tokio::spawn(async move { flag.store(true, Ordering::SeqCst) });
///
/// let done = &done;
/// assert!(eventually(Duration::from_secs(1), || async move { done.load(Ordering::SeqCst) }).await);
/// # }
/// ```
pub async fn eventually<F, Fut>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = Instant::now();

    while start.elapsed() < timeout {
        if condition().await {
            return true;
        }
        sleep(DEFAULT_POLL_INTERVAL).await;
    }

    condition().await
}
