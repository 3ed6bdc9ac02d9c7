/*!
 * Round Robin
 */

use super::traits::SchedulingPolicy;
use super::types::PolicyInfo;
use crate::core::errors::SimResult;
use crate::core::types::{Pid, Tick};
use crate::process::Process;
use tracing::info;

/// FIFO dispatch with a fixed time quantum
///
/// The engine requeues preempted processes at the tail, so taking the head
/// of the ready queue is enough to rotate.
#[derive(Debug, Clone, Copy)]
pub struct RoundRobin {
    time_quantum: Tick,
}

impl RoundRobin {
    /// Quanta below 1 are raised to 1
    pub fn new(time_quantum: Tick) -> Self {
        Self {
            time_quantum: time_quantum.max(1),
        }
    }

    #[inline]
    pub fn time_quantum(&self) -> Tick {
        self.time_quantum
    }
}

impl SchedulingPolicy for RoundRobin {
    fn name(&self) -> &'static str {
        "round_robin"
    }

    fn select_next(&mut self, ready: &[&Process], _now: Tick) -> Option<Pid> {
        ready.first().map(|p| p.pid())
    }

    fn should_preempt(&self, _running: &Process, ready: &[&Process], quantum: Option<Tick>) -> bool {
        // Alone on the CPU: keep running rather than pay for a switch
        quantum.is_some_and(|q| q == 0) && !ready.is_empty()
    }

    fn quantum(&self) -> Option<Tick> {
        Some(self.time_quantum)
    }

    fn set_time_quantum(&mut self, quantum: Tick) -> SimResult<()> {
        self.time_quantum = quantum.max(1);
        info!(time_quantum = self.time_quantum, "round robin quantum updated");
        Ok(())
    }

    fn info(&self) -> PolicyInfo {
        PolicyInfo {
            time_quantum: Some(self.time_quantum),
            ..PolicyInfo::simple(self.name(), true)
        }
    }
}
