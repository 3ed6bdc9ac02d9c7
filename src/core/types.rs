/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Simulated time, in discrete units since the start of a run
pub type Tick = u64;

/// Priority level (0-10, advisory only)
pub type Priority = u8;
