/*!
 * Simulation Engine
 * Discrete-time, single-CPU scheduling simulation
 *
 * The engine owns every process and every queue. One call to `step` advances
 * the clock by exactly one execution or idle unit, plus the context-switch
 * overhead when a new process is dispatched. Callers pull an
 * `EngineSnapshot` after each step; nothing is pushed.
 */

use crate::core::rng::RandomSource;
use crate::core::types::{Pid, Tick};
use crate::monitoring::Trace;
use crate::process::Process;
use crate::scheduler::SchedulingPolicy;
use std::collections::VecDeque;
use std::fmt;

mod builder;
mod operations;
mod snapshot;
mod step;

pub use builder::EngineBuilder;
pub use snapshot::EngineSnapshot;

/// Single-CPU simulation engine
///
/// Mutating operations require `&mut self`; share it behind a lock if more
/// than one caller drives it.
pub struct Engine {
    policy: Option<Box<dyn SchedulingPolicy>>,
    rng: Box<dyn RandomSource>,
    context_switch_overhead: Tick,

    // Process registry, insertion order
    processes: Vec<Process>,
    next_pid: Pid,

    current_time: Tick,
    ready_queue: VecDeque<Pid>,
    waiting_queue: Vec<Pid>,
    running: Option<Pid>,
    completed: Vec<Pid>,
    trace: Trace,

    idle_time: Tick,
    context_switches: u64,
    context_switching: bool,
    quantum_remaining: Option<Tick>,
    auto_run: bool,
}

impl Engine {
    /// Engine with the given policy and default settings
    pub fn new(policy: Box<dyn SchedulingPolicy>) -> Self {
        Self::builder().with_policy(policy).build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    #[inline]
    pub fn current_time(&self) -> Tick {
        self.current_time
    }

    #[inline]
    pub fn context_switch_overhead(&self) -> Tick {
        self.context_switch_overhead
    }

    #[inline]
    pub fn running_pid(&self) -> Option<Pid> {
        self.running
    }

    #[inline]
    pub fn quantum_remaining(&self) -> Option<Tick> {
        self.quantum_remaining
    }

    #[inline]
    pub fn context_switches(&self) -> u64 {
        self.context_switches
    }

    #[inline]
    pub fn idle_time(&self) -> Tick {
        self.idle_time
    }

    #[inline]
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    #[inline]
    pub fn policy(&self) -> Option<&dyn SchedulingPolicy> {
        self.policy.as_deref()
    }

    /// Read-only access to one process
    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.processes.iter().find(|p| p.pid() == pid)
    }

    /// Read-only access to every process, in insertion order
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Complete iff at least one process exists and all are terminated
    pub fn is_complete(&self) -> bool {
        !self.processes.is_empty() && self.processes.iter().all(Process::is_terminated)
    }

    /// Interactive play/pause flag surfaced as `is_running` in snapshots
    pub fn set_auto_run(&mut self, auto_run: bool) {
        self.auto_run = auto_run;
    }

    fn index_of(&self, pid: Pid) -> Option<usize> {
        self.processes.iter().position(|p| p.pid() == pid)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("policy", &self.policy)
            .field("current_time", &self.current_time)
            .field("processes", &self.processes.len())
            .field("ready_queue", &self.ready_queue)
            .field("waiting_queue", &self.waiting_queue)
            .field("running", &self.running)
            .field("context_switches", &self.context_switches)
            .finish()
    }
}

/// Ready queue as a read-only view, in queue order
fn ready_view<'a>(processes: &'a [Process], queue: &VecDeque<Pid>) -> Vec<&'a Process> {
    queue
        .iter()
        .filter_map(|pid| processes.iter().find(|p| p.pid() == *pid))
        .collect()
}
