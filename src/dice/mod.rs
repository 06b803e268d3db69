//! Dice simulation driving the synthetic telemetry.
//!
//! # Data Flow
//! ```text
//! rng → roll.rs (face, outcome, delay)
//!     → generator.rs (dice_roll span + log line, then delay)
//!     → instruments.rs (dice-rolls, roll-<n>-count)
//! ```

pub mod generator;
pub mod instruments;
pub mod roll;

pub use generator::{DiceGenerator, GeneratorSummary};
pub use instruments::{CounterNames, DiceInstruments, InstrumentError};
pub use roll::{Outcome, Roll, FACES};
