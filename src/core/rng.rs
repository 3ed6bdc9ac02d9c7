/*!
 * Random Sources
 * Injectable randomness for I/O requests and I/O wait durations
 *
 * The engine never calls an ambient RNG. Every random decision goes through a
 * `RandomSource` handed over at construction, so a run can be replayed from a
 * seed or driven by a fixed script in tests.
 */

use super::errors::{SimResult, SimulationError};
use super::limits::{DEFAULT_IO_DURATION_MAX, DEFAULT_IO_DURATION_MIN};
use super::types::Tick;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Source of the two random decisions the simulation makes
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send {
    /// Bernoulli draw: true with the given probability (already in [0, 1])
    fn chance(&mut self, probability: f64) -> bool;

    /// Length of the I/O wait a process just requested
    fn io_duration(&mut self) -> Tick;
}

/// `StdRng`-backed source, reproducible when seeded
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
    io_range: RangeInclusive<Tick>,
}

impl SeededRandom {
    /// Deterministic source with the default I/O duration range
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            io_range: DEFAULT_IO_DURATION_MIN..=DEFAULT_IO_DURATION_MAX,
        }
    }

    /// Non-reproducible source seeded from the OS
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            io_range: DEFAULT_IO_DURATION_MIN..=DEFAULT_IO_DURATION_MAX,
        }
    }

    /// Override the inclusive I/O duration range
    pub fn with_io_range(mut self, min: Tick, max: Tick) -> SimResult<Self> {
        if min == 0 || min > max {
            return Err(SimulationError::invalid_config(format!(
                "I/O duration range {}..={} must be non-empty and start at 1 or more",
                min, max
            )));
        }
        self.io_range = min..=max;
        Ok(self)
    }
}

impl RandomSource for SeededRandom {
    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn io_duration(&mut self) -> Tick {
        self.rng.gen_range(self.io_range.clone())
    }
}

/// Source that never requests I/O
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverIo;

impl RandomSource for NeverIo {
    fn chance(&mut self, _probability: f64) -> bool {
        false
    }

    fn io_duration(&mut self) -> Tick {
        DEFAULT_IO_DURATION_MIN
    }
}

/// Replays fixed decision and duration scripts, cycling when exhausted
///
/// The scripted decision replaces the Bernoulli draw outright; the
/// probability passed in is ignored.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    decisions: Vec<bool>,
    durations: Vec<Tick>,
    next_decision: usize,
    next_duration: usize,
}

impl ScriptedRandom {
    pub fn new(decisions: Vec<bool>, durations: Vec<Tick>) -> Self {
        Self {
            decisions,
            durations,
            next_decision: 0,
            next_duration: 0,
        }
    }

    /// Every draw requests I/O, each wait lasting `duration`
    pub fn always(duration: Tick) -> Self {
        Self::new(vec![true], vec![duration])
    }
}

impl RandomSource for ScriptedRandom {
    fn chance(&mut self, _probability: f64) -> bool {
        if self.decisions.is_empty() {
            return false;
        }
        let decision = self.decisions[self.next_decision % self.decisions.len()];
        self.next_decision += 1;
        decision
    }

    fn io_duration(&mut self) -> Tick {
        if self.durations.is_empty() {
            return DEFAULT_IO_DURATION_MIN;
        }
        let duration = self.durations[self.next_duration % self.durations.len()];
        self.next_duration += 1;
        duration.max(1)
    }
}
