//! Background sweep of expired identifiers.
//!
//! Lazy expiry only reclaims records somebody reads. The sweep deletes the
//! rest on a fixed cadence, both namespaces concurrently.

use std::{sync::Arc, time::Duration};

use tokio::time::{interval_at, Instant};
use tracing::{info, warn};

use crate::{metrics, registry::{Registry, SweepReport}};

/// Default interval between sweep cycles (5 minutes).
const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Periodic expired-record sweeper.
#[derive(bon::Builder)]
#[builder(on(_, required))]
pub struct SweepJob {
    /// Registry whose namespaces are swept.
    registry: Arc<Registry>,
    /// Interval between sweep cycles.
    #[builder(default = SWEEP_INTERVAL)]
    interval: Duration,
}

impl SweepJob {
    /// Runs a single sweep cycle.
    pub async fn run_cycle(&self) -> SweepReport {
        let start = std::time::Instant::now();
        let report = self.registry.sweep_all().await;
        metrics::record_sweep_cycle(report.is_clean(), start.elapsed().as_secs_f64());

        for (namespace, error) in &report.failures {
            warn!(%namespace, error = %error, "Sweep cycle failed");
        }
        let total = report.total_reclaimed();
        if total > 0 {
            info!(reclaimed = total, "Sweep cycle reclaimed expired identifiers");
        }
        report
    }

    /// Starts the sweeper as a background tokio task.
    ///
    /// The first cycle runs one interval after start. Returns a handle that
    /// can be used to abort the task.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.interval, self.interval);

            loop {
                ticker.tick().await;
                self.run_cycle().await;
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use chrono::Duration as ChronoDuration;
    use handles_store::SqliteClient;
    use handles_test_utils::{
        eventually, test_registry_config, ManualClock, ScriptedSuffixSource,
    };
    use handles_types::Namespace;

    use super::*;
    use crate::{request::IssueRequest, store::IdentifierStore};

    async fn registry(clock: Arc<ManualClock>) -> Arc<Registry> {
        let client = SqliteClient::open_in_memory().unwrap();
        client.migrate().await.unwrap();
        Arc::new(
            Registry::builder()
                .client(Arc::new(client))
                .config(test_registry_config())
                .clock(clock)
                .suffixes(Arc::new(ScriptedSuffixSource::new([11, 12])))
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_run_cycle_reclaims_expired() {
        let clock = Arc::new(ManualClock::default());
        let registry = registry(clock.clone()).await;
        registry.issue(IssueRequest::inco("alice", "https://example.com/a").unwrap()).await.unwrap();
        clock.advance(ChronoDuration::days(2));

        let job = SweepJob::builder().registry(Arc::clone(&registry)).build();
        let report = job.run_cycle().await;
        assert_eq!(report.reclaimed[&Namespace::Inco], 1);
        assert_eq!(report.reclaimed[&Namespace::Link], 0);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_started_job_sweeps_on_interval() {
        let clock = Arc::new(ManualClock::default());
        let registry = registry(clock.clone()).await;
        registry.issue(IssueRequest::inco("alice", "https://example.com/a").unwrap()).await.unwrap();
        clock.advance(ChronoDuration::days(2));

        let handle = SweepJob::builder()
            .registry(Arc::clone(&registry))
            .interval(Duration::from_millis(10))
            .build()
            .start();

        let store = registry.inco_store();
        let swept = eventually(Duration::from_secs(1), || async move {
            !store.suffix_exists(11).await.unwrap()
        })
        .await;
        assert!(swept, "sweep should have removed the expired record");

        handle.abort();
        let handle = &handle;
        assert!(eventually(Duration::from_millis(100), || async move { handle.is_finished() }).await);
    }
}
