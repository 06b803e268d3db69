//! Synthetic telemetry generator library.

pub mod config;
pub mod debug;
pub mod dice;
pub mod lifecycle;
pub mod observability;

pub use config::{Config, ConfigError, ConfigResolver};
pub use debug::DebugServer;
pub use dice::DiceGenerator;
pub use lifecycle::{Lifecycle, Shutdown, TeardownSet};
pub use observability::{Telemetry, TelemetryError};
