/*!
 * Process Types
 * Common types for simulated processes
 */

use crate::core::types::{Pid, Priority, Tick};
use serde::{Deserialize, Serialize};

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Created but not yet arrived
    New,
    /// Arrived and waiting for the CPU
    Ready,
    /// Currently on the CPU
    Running,
    /// Doing I/O
    Waiting,
    /// Finished or killed, terminal
    Terminated,
}

impl ProcessState {
    /// Transition table for natural (non-kill) state changes
    #[inline]
    #[must_use]
    pub const fn can_transition_to(self, to: ProcessState) -> bool {
        use ProcessState::*;
        matches!(
            (self, to),
            (New, Ready)
                | (Ready, Running)
                | (Ready, Terminated)
                | (Running, Ready)
                | (Running, Waiting)
                | (Running, Terminated)
                | (Waiting, Ready)
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, ProcessState::Terminated)
    }
}

/// Caller-supplied description of a process
///
/// Only `burst_time` is required; everything else falls back to defaults
/// when the process is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<Tick>,
    pub burst_time: Tick,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub io_frequency: Option<f64>,
}

impl ProcessDefinition {
    #[inline]
    #[must_use]
    pub fn new(burst_time: Tick) -> Self {
        Self {
            name: None,
            arrival_time: None,
            burst_time,
            priority: None,
            io_frequency: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn arriving_at(mut self, arrival_time: Tick) -> Self {
        self.arrival_time = Some(arrival_time);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_io_frequency(mut self, io_frequency: f64) -> Self {
        self.io_frequency = Some(io_frequency);
        self
    }
}

/// Result of executing one unit of CPU time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitOutcome {
    pub completed: bool,
    pub requests_io: bool,
}

/// Immutable, serializable view of a process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessSnapshot {
    pub pid: Pid,
    pub name: String,
    pub color: String,
    pub arrival_time: Tick,
    pub burst_time: Tick,
    pub priority: Priority,
    pub io_frequency: f64,
    pub state: ProcessState,
    pub remaining_time: Tick,
    pub executed_time: Tick,
    pub queue_level: usize,
    pub waiting_time: Tick,
    pub io_time: Tick,
    pub quantum_used: Tick,
    pub io_remaining: Tick,
    pub start_time: Option<Tick>,
    pub completion_time: Option<Tick>,
    pub turnaround_time: Option<Tick>,
    pub response_time: Option<Tick>,
    pub killed: bool,
}

impl ProcessSnapshot {
    #[inline]
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.state.is_terminal()
    }
}
