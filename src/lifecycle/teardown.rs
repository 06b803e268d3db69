//! Ordered teardown of exporters and servers.
//!
//! # Design Decisions
//! - Handles run in registration order
//! - The whole set runs at most once, whichever trigger reaches it first
//! - A failing handle is logged and the remaining handles still run

use std::sync::atomic::{AtomicBool, Ordering};

/// Error returned by a single teardown handle.
pub type HandleError = Box<dyn std::error::Error + Send + Sync>;

/// A capability with a single "shut down" operation.
pub trait Teardown: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Release the underlying resource. May block.
    fn shutdown(&self) -> Result<(), HandleError>;
}

/// Failure of one handle during teardown.
#[derive(Debug, thiserror::Error)]
#[error("shutting down {name}: {source}")]
pub struct TeardownError {
    pub name: String,
    #[source]
    pub source: HandleError,
}

/// Ordered set of teardown handles, executed once.
#[derive(Default)]
pub struct TeardownSet {
    handles: Vec<Box<dyn Teardown>>,
    ran: AtomicBool,
}

impl TeardownSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process teardown sequence: debug server close, then the log, trace
    /// and metrics providers.
    pub fn for_pipeline(
        server: impl Teardown + 'static,
        logs: impl Teardown + 'static,
        traces: impl Teardown + 'static,
        metrics: impl Teardown + 'static,
    ) -> Self {
        Self::new().with(server).with(logs).with(traces).with(metrics)
    }

    /// Append a handle; it runs after every handle pushed before it.
    pub fn push(&mut self, handle: impl Teardown + 'static) {
        self.handles.push(Box::new(handle));
    }

    /// Builder-style [`TeardownSet::push`].
    pub fn with(mut self, handle: impl Teardown + 'static) -> Self {
        self.push(handle);
        self
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Handle names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.handles.iter().map(|h| h.name()).collect()
    }

    /// Whether [`TeardownSet::run`] has already executed.
    pub fn has_run(&self) -> bool {
        self.ran.load(Ordering::SeqCst)
    }

    /// Run every handle in order and return the failures.
    ///
    /// Only the first call does any work; later calls return no failures.
    pub fn run(&self) -> Vec<TeardownError> {
        if self.ran.swap(true, Ordering::SeqCst) {
            tracing::debug!("Teardown already ran, skipping");
            return Vec::new();
        }

        let mut failures = Vec::new();
        for handle in &self.handles {
            match handle.shutdown() {
                Ok(()) => tracing::debug!(handle = handle.name(), "Shut down"),
                Err(source) => {
                    tracing::error!(handle = handle.name(), error = %source, "Teardown step failed");
                    failures.push(TeardownError {
                        name: handle.name().to_string(),
                        source,
                    });
                }
            }
        }

        tracing::info!(handles = self.handles.len(), failed = failures.len(), "Teardown complete");
        failures
    }
}

impl std::fmt::Debug for TeardownSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeardownSet")
            .field("handles", &self.names())
            .field("ran", &self.has_run())
            .finish()
    }
}
