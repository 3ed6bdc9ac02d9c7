/*!
 * Scheduling Policy Traits
 * Interface every pluggable policy implements
 */

use super::types::PolicyInfo;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::types::{Pid, Tick};
use crate::process::Process;
use std::fmt::Debug;

/// A CPU scheduling policy
///
/// Policies only ever see the ready queue as `&[&Process]`, in queue order.
/// Removal and requeueing belong to the engine. The `&mut Process` hooks may
/// adjust queue levels but must not change process state.
pub trait SchedulingPolicy: Send + Debug {
    /// Short identifier, e.g. `"round_robin"`
    fn name(&self) -> &'static str;

    /// Pick the next process to dispatch; `None` iff `ready` is empty
    fn select_next(&mut self, ready: &[&Process], now: Tick) -> Option<Pid>;

    /// Whether the running process must give up the CPU now
    fn should_preempt(
        &self,
        running: &Process,
        ready: &[&Process],
        quantum_remaining: Option<Tick>,
    ) -> bool;

    /// Slice length for the dispatch just selected, `None` for unbounded
    fn quantum(&self) -> Option<Tick> {
        None
    }

    /// First admission of a process to the ready queue
    fn on_admit(&mut self, _process: &mut Process) {}

    /// The running process was preempted with its quantum used up
    fn on_quantum_expired(&self, _process: &mut Process) {}

    /// The running process left the CPU to do I/O
    fn on_io_request(&self, _process: &mut Process) {}

    /// Called once per step with the time that step consumed.
    /// Returns true when every live process should be boosted to level 0.
    fn on_tick(&mut self, _elapsed: Tick) -> bool {
        false
    }

    /// Update the time quantum at runtime
    fn set_time_quantum(&mut self, _quantum: Tick) -> SimResult<()> {
        Err(SimulationError::invalid_config(format!(
            "policy '{}' has no time quantum",
            self.name()
        )))
    }

    /// Drop per-run bookkeeping (boost timers, active level)
    fn reset(&mut self) {}

    /// Serializable description for snapshots
    fn info(&self) -> PolicyInfo;
}
