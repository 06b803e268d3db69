//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Running (coordinator.rs):
//!     debug server + generator + termination listener run concurrently
//!
//! ShuttingDown (signals.rs):
//!     SIGINT or external trigger → Shutdown fires once → TeardownSet runs once
//!
//! Teardown order (teardown.rs):
//!     debug server close → logs → traces → metrics
//!
//! Terminated:
//!     all three tasks returned → process exits
//! ```
//!
//! # Design Decisions
//! - One cancellation token for every task; triggering it is idempotent
//! - Teardown handles are explicit capability objects, not captured closures
//! - Failures inside a task stay inside that task

pub mod coordinator;
pub mod shutdown;
pub mod signals;
pub mod teardown;

pub use coordinator::{Lifecycle, LifecycleState};
pub use shutdown::Shutdown;
pub use teardown::{HandleError, Teardown, TeardownError, TeardownSet};
