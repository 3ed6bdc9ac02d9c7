/*!
 * Process Definition Validation
 * Checks and normalizes caller-supplied process definitions
 */

use super::types::ProcessDefinition;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::limits::{DEFAULT_PRIORITY, MAX_PRIORITY};
use crate::core::types::{Priority, Tick};

/// Definition after defaults and clamps have been applied
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ValidatedDefinition {
    pub name: Option<String>,
    pub arrival_time: Tick,
    pub burst_time: Tick,
    pub priority: Priority,
    pub io_frequency: f64,
}

/// Validate a definition, filling defaults
pub(super) fn validate_definition(def: &ProcessDefinition) -> SimResult<ValidatedDefinition> {
    validate_burst(def.burst_time)?;
    let priority = validate_priority(def.priority.unwrap_or(DEFAULT_PRIORITY))?;
    let io_frequency = normalize_io_frequency(def.io_frequency.unwrap_or(0.0))?;

    let name = match def.name.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(name) => Some(name.to_string()),
    };

    Ok(ValidatedDefinition {
        name,
        arrival_time: def.arrival_time.unwrap_or(0),
        burst_time: def.burst_time,
        priority,
        io_frequency,
    })
}

fn validate_burst(burst_time: Tick) -> SimResult<()> {
    if burst_time == 0 {
        return Err(SimulationError::invalid_config(
            "burst time must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_priority(priority: Priority) -> SimResult<Priority> {
    if priority > MAX_PRIORITY {
        return Err(SimulationError::invalid_config(format!(
            "priority {} exceeds maximum ({})",
            priority, MAX_PRIORITY
        )));
    }
    Ok(priority)
}

/// Clamp into [0, 1]; only NaN and infinities are rejected
fn normalize_io_frequency(io_frequency: f64) -> SimResult<f64> {
    if !io_frequency.is_finite() {
        return Err(SimulationError::invalid_config(format!(
            "I/O frequency {} is not a finite number",
            io_frequency
        )));
    }
    Ok(io_frequency.clamp(0.0, 1.0))
}
