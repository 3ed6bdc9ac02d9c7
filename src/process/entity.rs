/*!
 * Process Entity
 * State machine and timing bookkeeping for one simulated process
 *
 * Lifecycle: New → Ready ⇄ Running → Terminated, with Running → Waiting → Ready
 * for I/O. Only the engine drives transitions; policies see `&Process`.
 */

use super::types::{ProcessDefinition, ProcessSnapshot, ProcessState, UnitOutcome};
use super::validation::validate_definition;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::limits::PROCESS_PALETTE;
use crate::core::rng::RandomSource;
use crate::core::types::{Pid, Priority, Tick};
use tracing::warn;

/// One simulated unit of work
#[derive(Debug, Clone)]
pub struct Process {
    pid: Pid,
    name: String,
    color: String,
    arrival_time: Tick,
    burst_time: Tick,
    priority: Priority,
    io_frequency: f64,

    state: ProcessState,
    remaining_time: Tick,
    executed_time: Tick,
    queue_level: usize,
    waiting_time: Tick,
    quantum_used: Tick,
    start_time: Option<Tick>,
    completion_time: Option<Tick>,
    turnaround_time: Option<Tick>,
    response_time: Option<Tick>,
    wait_started_at: Option<Tick>,
    io_remaining: Tick,
    io_started_at: Option<Tick>,
    io_time: Tick,
    killed: bool,
}

impl Process {
    /// Create a process in state `New`
    pub fn create(pid: Pid, def: &ProcessDefinition) -> SimResult<Self> {
        let def = validate_definition(def)?;
        let color = PROCESS_PALETTE[(pid as usize) % PROCESS_PALETTE.len()].to_string();

        Ok(Self {
            pid,
            name: def.name.unwrap_or_else(|| format!("P{}", pid)),
            color,
            arrival_time: def.arrival_time,
            burst_time: def.burst_time,
            priority: def.priority,
            io_frequency: def.io_frequency,
            state: ProcessState::New,
            remaining_time: def.burst_time,
            executed_time: 0,
            queue_level: 0,
            waiting_time: 0,
            quantum_used: 0,
            start_time: None,
            completion_time: None,
            turnaround_time: None,
            response_time: None,
            wait_started_at: None,
            io_remaining: 0,
            io_started_at: None,
            io_time: 0,
            killed: false,
        })
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[inline]
    pub fn arrival_time(&self) -> Tick {
        self.arrival_time
    }

    #[inline]
    pub fn burst_time(&self) -> Tick {
        self.burst_time
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[inline]
    pub fn io_frequency(&self) -> f64 {
        self.io_frequency
    }

    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    #[inline]
    pub fn remaining_time(&self) -> Tick {
        self.remaining_time
    }

    #[inline]
    pub fn executed_time(&self) -> Tick {
        self.executed_time
    }

    #[inline]
    pub fn queue_level(&self) -> usize {
        self.queue_level
    }

    #[inline]
    pub fn waiting_time(&self) -> Tick {
        self.waiting_time
    }

    #[inline]
    pub fn quantum_used(&self) -> Tick {
        self.quantum_used
    }

    #[inline]
    pub fn io_remaining(&self) -> Tick {
        self.io_remaining
    }

    #[inline]
    pub fn io_time(&self) -> Tick {
        self.io_time
    }

    #[inline]
    pub fn start_time(&self) -> Option<Tick> {
        self.start_time
    }

    #[inline]
    pub fn completion_time(&self) -> Option<Tick> {
        self.completion_time
    }

    #[inline]
    pub fn turnaround_time(&self) -> Option<Tick> {
        self.turnaround_time
    }

    #[inline]
    pub fn response_time(&self) -> Option<Tick> {
        self.response_time
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.state.is_terminal()
    }

    #[inline]
    pub fn was_killed(&self) -> bool {
        self.killed
    }

    /// Move to `to` if the transition table allows it
    ///
    /// A rejected transition leaves the process untouched and is logged.
    pub fn transition(&mut self, to: ProcessState, now: Tick) -> SimResult<()> {
        let from = self.state;
        if !from.can_transition_to(to) {
            warn!(
                pid = self.pid,
                name = %self.name,
                from = ?from,
                to = ?to,
                time = now,
                "rejected invalid state transition"
            );
            return Err(self.transition_error(to, now));
        }

        self.state = to;
        match to {
            ProcessState::Ready => {
                if from == ProcessState::Waiting {
                    self.close_io(now);
                }
                self.quantum_used = 0;
                self.wait_started_at = Some(now);
            }
            ProcessState::Running => {
                self.close_wait(now);
                if self.start_time.is_none() {
                    self.start_time = Some(now);
                    self.response_time = Some(now.saturating_sub(self.arrival_time));
                }
            }
            // I/O time is tracked separately from scheduling wait
            ProcessState::Waiting => {
                self.io_started_at = Some(now);
            }
            ProcessState::Terminated => self.finish(now),
            ProcessState::New => {}
        }
        Ok(())
    }

    /// Terminate from any live state, bypassing the transition table
    pub fn force_terminate(&mut self, now: Tick) -> SimResult<()> {
        if self.state.is_terminal() {
            warn!(pid = self.pid, time = now, "kill on already terminated process");
            return Err(self.transition_error(ProcessState::Terminated, now));
        }
        self.state = ProcessState::Terminated;
        self.killed = true;
        self.finish(now);
        Ok(())
    }

    /// Run for one unit of CPU time
    ///
    /// The random source is only consulted for I/O-capable processes that
    /// still have work left.
    pub fn execute_one_unit(&mut self, rng: &mut dyn RandomSource) -> UnitOutcome {
        let unit = self.remaining_time.min(1);
        self.remaining_time -= unit;
        self.executed_time += unit;
        self.quantum_used += 1;

        let completed = self.remaining_time == 0;
        let requests_io = !completed && self.io_frequency > 0.0 && rng.chance(self.io_frequency);

        UnitOutcome {
            completed,
            requests_io,
        }
    }

    /// Start an I/O countdown
    pub fn start_io(&mut self, duration: Tick) {
        self.io_remaining = duration.max(1);
    }

    /// Advance the I/O countdown, returns true once it reaches zero
    pub fn advance_io(&mut self, elapsed: Tick) -> bool {
        self.io_remaining = self.io_remaining.saturating_sub(elapsed);
        self.io_remaining == 0
    }

    /// Drop one queue level, capped at `max_level`
    pub fn demote(&mut self, max_level: usize) -> bool {
        if self.queue_level >= max_level {
            return false;
        }
        self.queue_level += 1;
        self.quantum_used = 0;
        true
    }

    /// Raise one queue level, capped at 0
    pub fn promote(&mut self) -> bool {
        if self.queue_level == 0 {
            return false;
        }
        self.queue_level -= 1;
        self.quantum_used = 0;
        true
    }

    /// Back to the top level (priority boost / admission)
    pub fn reset_level(&mut self) {
        self.queue_level = 0;
        self.quantum_used = 0;
    }

    /// Restore the freshly created runtime state, keeping static attributes
    pub fn reset(&mut self) {
        self.state = ProcessState::New;
        self.remaining_time = self.burst_time;
        self.executed_time = 0;
        self.queue_level = 0;
        self.waiting_time = 0;
        self.quantum_used = 0;
        self.start_time = None;
        self.completion_time = None;
        self.turnaround_time = None;
        self.response_time = None;
        self.wait_started_at = None;
        self.io_remaining = 0;
        self.io_started_at = None;
        self.io_time = 0;
        self.killed = false;
    }

    /// Owned read-only view
    pub fn snapshot(&self) -> ProcessSnapshot {
        ProcessSnapshot {
            pid: self.pid,
            name: self.name.clone(),
            color: self.color.clone(),
            arrival_time: self.arrival_time,
            burst_time: self.burst_time,
            priority: self.priority,
            io_frequency: self.io_frequency,
            state: self.state,
            remaining_time: self.remaining_time,
            executed_time: self.executed_time,
            queue_level: self.queue_level,
            waiting_time: self.waiting_time,
            io_time: self.io_time,
            quantum_used: self.quantum_used,
            io_remaining: self.io_remaining,
            start_time: self.start_time,
            completion_time: self.completion_time,
            turnaround_time: self.turnaround_time,
            response_time: self.response_time,
            killed: self.killed,
        }
    }

    fn close_wait(&mut self, now: Tick) {
        if let Some(since) = self.wait_started_at.take() {
            self.waiting_time += now.saturating_sub(since);
        }
    }

    fn close_io(&mut self, now: Tick) {
        if let Some(since) = self.io_started_at.take() {
            self.io_time += now.saturating_sub(since);
        }
        self.io_remaining = 0;
    }

    fn finish(&mut self, now: Tick) {
        self.close_wait(now);
        self.close_io(now);
        self.remaining_time = 0;
        self.completion_time = Some(now);
        self.turnaround_time = Some(now.saturating_sub(self.arrival_time));
    }

    fn transition_error(&self, to: ProcessState, now: Tick) -> SimulationError {
        SimulationError::InvalidStateTransition {
            pid: self.pid,
            name: self.name.clone(),
            from: self.state,
            to,
            time: now,
        }
    }
}
