//! Stopping the sweep loop.
//!
//! The server owns no listeners, so shutting down means waiting for an
//! interrupt or termination signal and then cancelling the background sweep.

use std::future::Future;

use tokio::{signal, task::JoinHandle};

/// Resolves on Ctrl-C, or on SIGTERM where the platform has it.
///
/// A signal whose handler cannot be installed is logged and ignored; the
/// other one can still end the wait. Returns the name of the signal seen.
pub async fn shutdown_signal() -> &'static str {
    let interrupt = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(error) => {
                tracing::warn!(%error, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => "Ctrl+C",
        () = terminate => "SIGTERM",
    }
}

/// Waits for `signal`, then cancels the sweep task.
///
/// Returns `true` if the sweep was still running and had to be cancelled.
pub async fn stop_sweep_on<S>(signal: S, sweep: JoinHandle<()>) -> bool
where
    S: Future<Output = &'static str>,
{
    let received = signal.await;
    tracing::info!(signal = received, "Stopping sweep job");

    sweep.abort();
    match sweep.await {
        Err(error) if error.is_cancelled() => true,
        Err(error) => {
            tracing::warn!(%error, "Sweep job ended with a panic");
            false
        },
        Ok(()) => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_running_sweep_is_cancelled() {
        let sweep = tokio::spawn(std::future::pending::<()>());
        assert!(stop_sweep_on(async { "test" }, sweep).await);
    }

    #[tokio::test]
    async fn test_finished_sweep_is_not_cancelled() {
        let sweep = tokio::spawn(async {});
        tokio::task::yield_now().await;
        while !sweep.is_finished() {
            tokio::task::yield_now().await;
        }
        assert!(!stop_sweep_on(async { "test" }, sweep).await);
    }

    #[tokio::test]
    async fn test_waits_for_signal_before_cancelling() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let sweep = tokio::spawn(std::future::pending::<()>());
        let stopper = tokio::spawn(stop_sweep_on(
            async move {
                rx.await.unwrap();
                "test"
            },
            sweep,
        ));

        tokio::task::yield_now().await;
        assert!(!stopper.is_finished());
        tx.send(()).unwrap();
        assert!(stopper.await.unwrap());
    }
}
