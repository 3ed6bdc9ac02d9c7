/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{Pid, Tick};
use crate::process::ProcessState;
use crate::runner::RunReport;
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Simulation operation result
pub type SimResult<T> = Result<T, SimulationError>;

/// Simulation errors with serialization support
///
/// Every variant carries enough context (process, transition, time) to
/// reconstruct the failure from a test assertion.
#[derive(Error, Debug, Clone, Serialize, PartialEq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimulationError {
    #[error("Invalid configuration: {reason}")]
    #[diagnostic(
        code(simulation::invalid_configuration),
        help("Burst time must be positive, priority within 0..=10 and quanta at least 1.")
    )]
    InvalidConfiguration { reason: String },

    #[error("Invalid state transition for process {pid} ({name}): {from:?} -> {to:?} at t={time}")]
    #[diagnostic(
        code(simulation::invalid_state_transition),
        help("Terminated processes cannot transition; check the caller's process id.")
    )]
    InvalidStateTransition {
        pid: Pid,
        name: String,
        from: ProcessState,
        to: ProcessState,
        time: Tick,
    },

    #[error("No scheduling policy configured (t={time})")]
    #[diagnostic(
        code(simulation::no_policy),
        help("Configure a policy with `Engine::builder().with_policy(..)` or `set_policy`.")
    )]
    NoPolicySet { time: Tick },

    #[error("Simulation exceeded its time bound of {max_time}")]
    #[diagnostic(
        code(simulation::bound_exceeded),
        help("Raise `max_time` or inspect the partial trace for a starved workload.")
    )]
    SimulationBoundExceeded {
        max_time: Tick,
        report: Box<RunReport>,
    },

    #[error("Process {pid} not found")]
    #[diagnostic(code(simulation::process_not_found))]
    ProcessNotFound { pid: Pid },

    #[error("No process is running at t={time}")]
    #[diagnostic(
        code(simulation::no_running_process),
        help("I/O can only be injected into the process currently on the CPU.")
    )]
    NoRunningProcess { time: Tick },

    #[error("Paced runner failed: {reason}")]
    #[diagnostic(code(simulation::runner_failed))]
    RunnerFailed { reason: String },
}

impl SimulationError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
