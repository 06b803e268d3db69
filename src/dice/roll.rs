//! Dice roll outcomes.

use std::time::Duration;

use rand::Rng;

/// Number of faces; rolls are drawn from `0..FACES`.
pub const FACES: u8 = 10;

/// A single roll in `0..FACES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Roll(u8);

/// Category a roll falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Zero,
    One,
    Even,
    Odd,
}

impl Outcome {
    /// Log message emitted for this outcome.
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Zero => "Rolled zero",
            Outcome::One => "Rolled one",
            Outcome::Even => "Rolled even",
            Outcome::Odd => "Rolled odd",
        }
    }
}

impl Roll {
    /// `None` if `value` is not a face of the die.
    pub fn new(value: u8) -> Option<Self> {
        (value < FACES).then_some(Self(value))
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(0..FACES))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn outcome(self) -> Outcome {
        match self.0 {
            0 => Outcome::Zero,
            1 => Outcome::One,
            n if n % 2 == 0 => Outcome::Even,
            _ => Outcome::Odd,
        }
    }

    /// Simulated work for this roll: one second for 0 and 1, `value / 2` seconds otherwise.
    pub fn delay(self) -> Duration {
        match self.outcome() {
            Outcome::Zero | Outcome::One => Duration::from_secs(1),
            Outcome::Even | Outcome::Odd => Duration::from_secs(u64::from(self.0 / 2)),
        }
    }
}
