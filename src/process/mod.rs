/*!
 * Process Module
 * Simulated processes: definitions, lifecycle and snapshots
 */

pub mod entity;
pub mod types;
mod validation;

// Re-export for convenience
pub use entity::Process;
pub use types::{ProcessDefinition, ProcessSnapshot, ProcessState, UnitOutcome};
