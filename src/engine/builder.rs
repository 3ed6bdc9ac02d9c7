/*!
 * Engine Builder
 * Builder pattern for Engine construction
 */

use super::Engine;
use crate::core::limits::{
    DEFAULT_CONTEXT_SWITCH_OVERHEAD, DEFAULT_IO_DURATION_MAX, DEFAULT_IO_DURATION_MIN,
};
use crate::core::rng::{RandomSource, SeededRandom};
use crate::core::types::Tick;
use crate::monitoring::Trace;
use crate::scheduler::SchedulingPolicy;
use std::collections::VecDeque;
use tracing::info;

/// Builder for Engine
pub struct EngineBuilder {
    policy: Option<Box<dyn SchedulingPolicy>>,
    rng: Option<Box<dyn RandomSource>>,
    seed: Option<u64>,
    io_duration: (Tick, Tick),
    context_switch_overhead: Tick,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            policy: None,
            rng: None,
            seed: None,
            io_duration: (DEFAULT_IO_DURATION_MIN, DEFAULT_IO_DURATION_MAX),
            context_switch_overhead: DEFAULT_CONTEXT_SWITCH_OVERHEAD,
        }
    }

    /// Scheduling policy; without one `step` fails with `NoPolicySet`
    pub fn with_policy(mut self, policy: Box<dyn SchedulingPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Ticks charged for each dispatch
    pub fn with_context_switch_overhead(mut self, overhead: Tick) -> Self {
        self.context_switch_overhead = overhead;
        self
    }

    /// Random source for I/O decisions and durations
    pub fn with_random_source(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Seed for the default `SeededRandom`
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Inclusive I/O duration range for the default `SeededRandom`
    ///
    /// Bounds are raised to at least 1 and `max` to at least `min`. Ignored
    /// when an explicit random source is given.
    pub fn with_io_duration(mut self, min: Tick, max: Tick) -> Self {
        let min = min.max(1);
        self.io_duration = (min, max.max(min));
        self
    }

    pub fn build(self) -> Engine {
        let (io_min, io_max) = self.io_duration;
        let seed = self.seed;
        let rng = self.rng.unwrap_or_else(|| {
            let base = match seed {
                Some(seed) => SeededRandom::from_seed(seed),
                None => SeededRandom::from_entropy(),
            };
            let source = match base.clone().with_io_range(io_min, io_max) {
                Ok(ranged) => ranged,
                Err(_) => base,
            };
            Box::new(source)
        });

        info!(
            policy = self.policy.as_ref().map(|p| p.name()).unwrap_or("none"),
            context_switch_overhead = self.context_switch_overhead,
            seed = ?seed,
            "Simulation engine initialized"
        );

        Engine {
            policy: self.policy,
            rng,
            context_switch_overhead: self.context_switch_overhead,
            processes: Vec::new(),
            next_pid: 1,
            current_time: 0,
            ready_queue: VecDeque::new(),
            waiting_queue: Vec::new(),
            running: None,
            completed: Vec::new(),
            trace: Trace::new(),
            idle_time: 0,
            context_switches: 0,
            context_switching: false,
            quantum_remaining: None,
            auto_run: false,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
