//! Task orchestration from launch to termination.
//!
//! # Responsibilities
//! - Launch the debug server, the generator and the termination listener
//! - Wait until all of them have returned
//! - Contain task failures: a panicking task is logged, its siblings keep going

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::handle_termination;
use crate::lifecycle::teardown::TeardownSet;

/// Observable phase of the process lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Tasks are active and no teardown has started.
    Running,
    /// Shutdown was triggered; teardown runs or has run.
    ShuttingDown,
    /// Every task has returned.
    Terminated,
}

/// Owns the shutdown signal and the teardown set for one run.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    shutdown: Shutdown,
    teardown: Arc<TeardownSet>,
    terminated: Arc<AtomicBool>,
}

impl Lifecycle {
    pub fn new(teardown: TeardownSet) -> Self {
        Self {
            shutdown: Shutdown::new(),
            teardown: Arc::new(teardown),
            terminated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle on the shared shutdown signal.
    pub fn shutdown(&self) -> Shutdown {
        self.shutdown.clone()
    }

    pub fn teardown(&self) -> Arc<TeardownSet> {
        self.teardown.clone()
    }

    pub fn state(&self) -> LifecycleState {
        if self.terminated.load(Ordering::SeqCst) {
            LifecycleState::Terminated
        } else if self.shutdown.is_triggered() {
            LifecycleState::ShuttingDown
        } else {
            LifecycleState::Running
        }
    }

    /// Run the three tasks to completion.
    ///
    /// `server` and `generator` must return once [`Lifecycle::shutdown`] fires;
    /// `interrupt` resolves when the process should stop.
    pub async fn run<S, G, I>(&self, server: S, generator: G, interrupt: I)
    where
        S: Future<Output = ()> + Send + 'static,
        G: Future<Output = ()> + Send + 'static,
        I: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = JoinSet::new();
        tasks.spawn(server);
        tasks.spawn(handle_termination(
            self.shutdown.clone(),
            self.teardown.clone(),
            interrupt,
        ));
        tasks.spawn(generator);

        tracing::info!(tasks = tasks.len(), "Lifecycle running");

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, remaining = tasks.len(), "Task failed");
            }
        }

        self.terminated.store(true, Ordering::SeqCst);
        tracing::info!("All tasks finished");
    }
}
