//! OS signal handling and the termination listener.
//!
//! # Responsibilities
//! - Wait for an interrupt (SIGINT / Ctrl+C)
//! - Translate it into the shared shutdown signal
//! - Run teardown once shutdown is observed, whoever triggered it

use std::future::Future;
use std::sync::Arc;

use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::teardown::TeardownSet;

/// Resolve on the first interrupt from the operating system.
///
/// If the handler cannot be installed this never resolves, leaving shutdown
/// to external cancellation.
pub async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install interrupt handler");
        std::future::pending::<()>().await;
    }
}

/// Wait for shutdown or `interrupt`, then run teardown.
///
/// An interrupt triggers `shutdown`; an external trigger is handled the same
/// way. Teardown runs on the blocking pool, after the signal has fired.
pub async fn handle_termination<F>(shutdown: Shutdown, teardown: Arc<TeardownSet>, interrupt: F)
where
    F: Future<Output = ()>,
{
    tokio::select! {
        _ = shutdown.triggered() => {
            tracing::info!("Shutdown requested");
        }
        _ = interrupt => {
            tracing::info!("Interrupt received, shutting down");
            shutdown.trigger();
        }
    }

    if let Err(e) = tokio::task::spawn_blocking(move || teardown.run()).await {
        tracing::error!(error = %e, "Teardown task failed");
    }
}
