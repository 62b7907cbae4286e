//! Registry metrics via the `metrics` crate.
//!
//! ## Metric Naming Conventions
//!
//! All metrics follow the pattern: `handles_{name}_{unit}`
//!
//! - Counters: `_total` suffix
//! - Histograms: `_seconds` suffix

use handles_types::Namespace;
use metrics::{counter, histogram};

// =============================================================================
// Metric Names (constants for consistency)
// =============================================================================

const ISSUED_TOTAL: &str = "handles_issued_total";
const SUFFIX_EXHAUSTED_TOTAL: &str = "handles_suffix_exhausted_total";
const RECLAIMED_TOTAL: &str = "handles_reclaimed_total";
const AUTH_FAILURES_TOTAL: &str = "handles_auth_failures_total";
const TRIGGER_HEALS_TOTAL: &str = "handles_trigger_heals_total";
const SWEEP_DURATION: &str = "handles_sweep_duration_seconds";
const SWEEP_CYCLES_TOTAL: &str = "handles_sweep_cycles_total";

/// How an expired record was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclaimPath {
    /// Deleted while serving a read.
    Lazy,
    /// Deleted by the background sweep.
    Sweep,
}

impl ReclaimPath {
    fn as_str(self) -> &'static str {
        match self {
            Self::Lazy => "lazy",
            Self::Sweep => "sweep",
        }
    }
}

// =============================================================================
// Recording helpers
// =============================================================================

/// Records a successful issuance.
#[inline]
pub fn record_issued(namespace: Namespace) {
    counter!(ISSUED_TOTAL, "namespace" => namespace.tag()).increment(1);
}

/// Records an allocation that ran out of attempts.
#[inline]
pub fn record_suffix_exhausted(namespace: Namespace) {
    counter!(SUFFIX_EXHAUSTED_TOTAL, "namespace" => namespace.tag()).increment(1);
}

/// Records removed expired records.
#[inline]
pub fn record_reclaimed(namespace: Namespace, path: ReclaimPath, count: u64) {
    counter!(RECLAIMED_TOTAL, "namespace" => namespace.tag(), "path" => path.as_str())
        .increment(count);
}

/// Records a rejected credential.
#[inline]
pub fn record_auth_failure() {
    counter!(AUTH_FAILURES_TOTAL).increment(1);
}

/// Records removal of the legacy append-only trigger.
#[inline]
pub fn record_trigger_heal() {
    counter!(TRIGGER_HEALS_TOTAL).increment(1);
}

/// Records one sweep cycle.
#[inline]
pub fn record_sweep_cycle(success: bool, duration_secs: f64) {
    let status = if success { "success" } else { "failure" };
    counter!(SWEEP_CYCLES_TOTAL, "status" => status).increment(1);
    histogram!(SWEEP_DURATION).record(duration_secs);
}
