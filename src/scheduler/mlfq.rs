/*!
 * Multi-Level Feedback Queue
 *
 * Level 0 is the highest priority. A process that burns its whole slice drops
 * one level; one that yields for I/O climbs one level. Every `boost_interval`
 * ticks all live processes return to level 0 so demoted work cannot starve.
 */

use super::traits::SchedulingPolicy;
use super::types::PolicyInfo;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::types::{Pid, Tick};
use crate::process::Process;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Mlfq {
    quanta: Vec<Tick>,
    boost_interval: Tick,
    active_level: usize,
    since_boost: Tick,
}

impl Mlfq {
    /// `quanta` must hold one entry per level; zero quanta are raised to 1
    pub fn new(levels: usize, quanta: Vec<Tick>, boost_interval: Tick) -> SimResult<Self> {
        if levels == 0 {
            return Err(SimulationError::invalid_config(
                "MLFQ needs at least one level",
            ));
        }
        if quanta.len() != levels {
            return Err(SimulationError::invalid_config(format!(
                "MLFQ has {} levels but {} quanta",
                levels,
                quanta.len()
            )));
        }
        if boost_interval == 0 {
            return Err(SimulationError::invalid_config(
                "MLFQ boost interval must be at least 1",
            ));
        }

        Ok(Self {
            quanta: quanta.into_iter().map(|q| q.max(1)).collect(),
            boost_interval,
            active_level: 0,
            since_boost: 0,
        })
    }

    #[inline]
    pub fn levels(&self) -> usize {
        self.quanta.len()
    }

    #[inline]
    pub fn max_level(&self) -> usize {
        self.quanta.len() - 1
    }

    #[inline]
    pub fn boost_interval(&self) -> Tick {
        self.boost_interval
    }

    /// Level a process is scheduled at; out-of-range levels sink to the bottom
    #[inline]
    fn level_of(&self, process: &Process) -> usize {
        process.queue_level().min(self.max_level())
    }
}

impl SchedulingPolicy for Mlfq {
    fn name(&self) -> &'static str {
        "mlfq"
    }

    /// Highest non-empty level, earliest arrival within it
    fn select_next(&mut self, ready: &[&Process], _now: Tick) -> Option<Pid> {
        let chosen = ready
            .iter()
            .min_by_key(|p| (self.level_of(p), p.arrival_time()))?;
        self.active_level = self.level_of(chosen);
        Some(chosen.pid())
    }

    fn should_preempt(&self, running: &Process, ready: &[&Process], quantum: Option<Tick>) -> bool {
        if quantum.is_some_and(|q| q == 0) {
            return true;
        }
        let level = self.level_of(running);
        ready.iter().any(|p| self.level_of(p) < level)
    }

    fn quantum(&self) -> Option<Tick> {
        Some(self.quanta[self.active_level.min(self.max_level())])
    }

    fn on_admit(&mut self, process: &mut Process) {
        process.reset_level();
    }

    fn on_quantum_expired(&self, process: &mut Process) {
        if process.demote(self.max_level()) {
            debug!(pid = process.pid(), level = process.queue_level(), "demoted");
        }
    }

    fn on_io_request(&self, process: &mut Process) {
        if process.promote() {
            debug!(pid = process.pid(), level = process.queue_level(), "promoted");
        }
    }

    fn on_tick(&mut self, elapsed: Tick) -> bool {
        self.since_boost += elapsed;
        if self.since_boost >= self.boost_interval {
            self.since_boost = 0;
            self.active_level = 0;
            return true;
        }
        false
    }

    fn reset(&mut self) {
        self.active_level = 0;
        self.since_boost = 0;
    }

    fn info(&self) -> PolicyInfo {
        PolicyInfo {
            time_quantum: self.quantum(),
            level_quanta: self.quanta.clone(),
            boost_interval: Some(self.boost_interval),
            ..PolicyInfo::simple(self.name(), true)
        }
    }
}
