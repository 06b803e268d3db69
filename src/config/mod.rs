//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional)
//!     → env.rs (merged into the environment, existing keys win)
//!     → registry.rs (one flag per key, parsed once)
//!     → loader.rs (flag > environment > file)
//!     → validation.rs (every missing field reported together)
//!     → Config (validated, immutable)
//!     → shared via Arc to all tasks
//! ```
//!
//! # Design Decisions
//! - Config is immutable once resolved
//! - Flag registration is an explicit object, not process-global state
//! - The environment is behind a trait so resolution is testable in isolation

pub mod env;
pub mod loader;
pub mod registry;
pub mod schema;
pub mod validation;

pub use env::{Environment, MapEnv, ProcessEnv};
pub use loader::{ConfigError, ConfigResolver, DEFAULT_DOTENV_PATH};
pub use registry::FlagRegistry;
pub use schema::{Config, ConfigKey};
