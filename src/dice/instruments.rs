//! Counters recorded for every roll.

use opentelemetry::metrics::{Counter, Meter};

use crate::dice::roll::{Roll, FACES};

/// Name of the counter tracking all rolls.
pub const TOTAL_COUNTER: &str = "dice-rolls";

/// Prefix of the per-face counters, as in `roll-3-count`.
pub const FACE_COUNTER_PREFIX: &str = "roll";

const MAX_NAME_LEN: usize = 255;

/// Failure to create an instrument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstrumentError {
    #[error("instrument name is empty")]
    Empty,

    #[error("instrument name {0:?} is longer than 255 characters")]
    TooLong(String),

    #[error("instrument name {0:?} must start with a letter")]
    BadStart(String),

    #[error("instrument name {name:?} contains invalid character {ch:?}")]
    BadChar { name: String, ch: char },
}

/// Names of the counters created by [`DiceInstruments`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterNames {
    pub total: String,
    pub face_prefix: String,
}

impl Default for CounterNames {
    fn default() -> Self {
        Self {
            total: TOTAL_COUNTER.to_string(),
            face_prefix: FACE_COUNTER_PREFIX.to_string(),
        }
    }
}

impl CounterNames {
    /// Counter name for one face, e.g. `roll-3-count`.
    pub fn face(&self, face: u8) -> String {
        format!("{}-{face}-count", self.face_prefix)
    }
}

/// Check `name` against the OpenTelemetry instrument naming rules.
///
/// The SDK silently swaps badly named instruments for no-ops; checking up
/// front turns that into an error the caller can act on.
pub fn validate_instrument_name(name: &str) -> Result<(), InstrumentError> {
    let mut chars = name.chars();
    let first = chars.next().ok_or(InstrumentError::Empty)?;

    if name.len() > MAX_NAME_LEN {
        return Err(InstrumentError::TooLong(name.to_string()));
    }
    if !first.is_ascii_alphabetic() {
        return Err(InstrumentError::BadStart(name.to_string()));
    }
    if let Some(ch) = chars.find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '/'))) {
        return Err(InstrumentError::BadChar {
            name: name.to_string(),
            ch,
        });
    }
    Ok(())
}

/// The total counter plus one counter per face.
pub struct DiceInstruments {
    rolls: Counter<u64>,
    faces: Vec<Counter<u64>>,
}

impl DiceInstruments {
    pub fn new(meter: &Meter) -> Result<Self, InstrumentError> {
        Self::with_names(meter, &CounterNames::default())
    }

    /// Create the counters under `names`. Nothing is created if any name is invalid.
    pub fn with_names(meter: &Meter, names: &CounterNames) -> Result<Self, InstrumentError> {
        validate_instrument_name(&names.total)?;
        let face_names = (0..FACES)
            .map(|face| {
                let name = names.face(face);
                validate_instrument_name(&name).map(|()| name)
            })
            .collect::<Result<Vec<_>, InstrumentError>>()?;

        let rolls = meter
            .u64_counter(names.total.clone())
            .with_description("Counts the total number of dice rolls")
            .build();

        let faces = face_names
            .into_iter()
            .zip(0..FACES)
            .map(|(name, face)| {
                meter
                    .u64_counter(name)
                    .with_description(format!(
                        "Counts the total number of dice rolls for the number {face}"
                    ))
                    .build()
            })
            .collect();

        Ok(Self { rolls, faces })
    }

    pub fn record(&self, roll: Roll) {
        self.rolls.add(1, &[]);
        self.faces[roll.value() as usize].add(1, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_names_are_valid() {
        let names = CounterNames::default();
        validate_instrument_name(&names.total).unwrap();
        for face in 0..FACES {
            validate_instrument_name(&names.face(face)).unwrap();
        }
        assert_eq!(names.face(4), "roll-4-count");
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(validate_instrument_name(""), Err(InstrumentError::Empty));
        assert!(matches!(
            validate_instrument_name("4-rolls"),
            Err(InstrumentError::BadStart(_))
        ));
        assert!(matches!(
            validate_instrument_name("dice rolls"),
            Err(InstrumentError::BadChar { ch: ' ', .. })
        ));
        assert!(matches!(
            validate_instrument_name(&"a".repeat(256)),
            Err(InstrumentError::TooLong(_))
        ));
    }

    #[test]
    fn test_instruments_on_noop_meter() {
        let meter = opentelemetry::global::meter("test");
        let instruments = DiceInstruments::new(&meter).unwrap();
        assert_eq!(instruments.faces.len(), FACES as usize);
        instruments.record(Roll::new(9).unwrap());
    }

    #[test]
    fn test_invalid_names_create_nothing() {
        let meter = opentelemetry::global::meter("test");

        let names = CounterNames {
            total: "dice rolls".to_string(),
            ..CounterNames::default()
        };
        assert!(matches!(
            DiceInstruments::with_names(&meter, &names),
            Err(InstrumentError::BadChar { ch: ' ', .. })
        ));

        let names = CounterNames {
            face_prefix: "9roll".to_string(),
            ..CounterNames::default()
        };
        assert!(matches!(
            DiceInstruments::with_names(&meter, &names),
            Err(InstrumentError::BadStart(_))
        ));
    }
}
