//! The telemetry-emitting loop.
//!
//! # Responsibilities
//! - Roll the die until shutdown
//! - Wrap each roll in a `dice_roll` span and log its outcome
//! - Record the total and per-face counters
//!
//! # Design Decisions
//! - Shutdown is checked once per iteration and also interrupts the delay
//! - Instrument setup failure ends this task only

use opentelemetry::metrics::Meter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::Instrument;

use crate::dice::instruments::{CounterNames, DiceInstruments, InstrumentError};
use crate::dice::roll::{Roll, FACES};
use crate::lifecycle::Shutdown;

/// Tally of what the generator emitted before it stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorSummary {
    pub rolls: u64,
    pub by_face: [u64; FACES as usize],
}

impl GeneratorSummary {
    fn record(&mut self, roll: Roll) {
        self.rolls += 1;
        self.by_face[roll.value() as usize] += 1;
    }
}

/// Rolls the die and emits traces, logs and metrics for each roll.
pub struct DiceGenerator<R = StdRng> {
    meter: Meter,
    names: CounterNames,
    rng: R,
}

impl DiceGenerator<StdRng> {
    pub fn new(meter: Meter) -> Self {
        Self {
            meter,
            names: CounterNames::default(),
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng + Send> DiceGenerator<R> {
    /// Same generator with a caller-supplied random source.
    pub fn with_rng<R2: Rng + Send>(self, rng: R2) -> DiceGenerator<R2> {
        DiceGenerator {
            meter: self.meter,
            names: self.names,
            rng,
        }
    }

    /// Same generator recording under `names`.
    pub fn with_counter_names(mut self, names: CounterNames) -> Self {
        self.names = names;
        self
    }

    /// Roll until `shutdown` fires.
    ///
    /// A roll interrupted mid-delay is still counted.
    pub async fn run(mut self, shutdown: Shutdown) -> Result<GeneratorSummary, InstrumentError> {
        let instruments = match DiceInstruments::with_names(&self.meter, &self.names) {
            Ok(instruments) => instruments,
            Err(e) => {
                tracing::error!(error = %e, "Creating counter");
                return Err(e);
            }
        };

        tracing::info!("Dice generator starting");

        let mut summary = GeneratorSummary::default();
        while !shutdown.is_triggered() {
            let roll = Roll::random(&mut self.rng);
            let completed = roll_dice(roll, &shutdown).await;

            instruments.record(roll);
            summary.record(roll);

            if !completed {
                break;
            }
        }

        tracing::info!(rolls = summary.rolls, "Dice generator stopped");
        Ok(summary)
    }
}

/// Emit the span and log for one roll, then wait out its delay.
///
/// Returns `false` if shutdown cut the delay short.
async fn roll_dice(roll: Roll, shutdown: &Shutdown) -> bool {
    let span = tracing::info_span!("dice_roll", action = "roll", roll = roll.value());

    async {
        tracing::info!(roll = roll.value(), "{}", roll.outcome().message());

        tokio::select! {
            _ = tokio::time::sleep(roll.delay()) => true,
            _ = shutdown.triggered() => false,
        }
    }
    .instrument(span)
    .await
}
