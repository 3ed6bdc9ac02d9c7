/*!
 * Simulation Limits and Defaults
 *
 * Centralized location for every default, bound and magic number used by the
 * engine and the policies. Grouped by domain.
 */

use super::types::{Priority, Tick};

// =============================================================================
// PROCESS DEFAULTS
// =============================================================================

/// Highest advisory priority
pub const MAX_PRIORITY: Priority = 10;

/// Priority given to definitions that do not set one
pub const DEFAULT_PRIORITY: Priority = 5;

/// Display colours handed out round-robin by PID
pub const PROCESS_PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ac",
];

// =============================================================================
// ENGINE DEFAULTS
// =============================================================================

/// Cost of switching the CPU to a new process
pub const DEFAULT_CONTEXT_SWITCH_OVERHEAD: Tick = 1;

/// Safety bound for batch runs
/// Exceeding it aborts the run with `SimulationBoundExceeded`
pub const DEFAULT_MAX_TIME: Tick = 10_000;

/// Inclusive bounds of a randomly drawn I/O wait
pub const DEFAULT_IO_DURATION_MIN: Tick = 3;
pub const DEFAULT_IO_DURATION_MAX: Tick = 7;

/// Duration used by `inject_io` when the caller gives none
pub const DEFAULT_INJECTED_IO_DURATION: Tick = 5;

// =============================================================================
// POLICY DEFAULTS
// =============================================================================

/// Round-robin time quantum
pub const DEFAULT_TIME_QUANTUM: Tick = 4;

/// Number of MLFQ priority levels
pub const DEFAULT_MLFQ_LEVELS: usize = 3;

/// Per-level MLFQ quanta, higher levels get larger slices
pub const DEFAULT_MLFQ_QUANTA: [Tick; DEFAULT_MLFQ_LEVELS] = [4, 8, 16];

/// Interval between MLFQ priority boosts
pub const DEFAULT_BOOST_INTERVAL: Tick = 50;
