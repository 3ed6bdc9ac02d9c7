/*!
 * Batch Runner
 * Run a workload to completion under one policy, or under several for comparison
 */

use crate::core::errors::{SimResult, SimulationError};
use crate::core::limits::{
    DEFAULT_CONTEXT_SWITCH_OVERHEAD, DEFAULT_IO_DURATION_MAX, DEFAULT_IO_DURATION_MIN,
    DEFAULT_MAX_TIME,
};
use crate::core::rng::SeededRandom;
use crate::core::types::Tick;
use crate::engine::Engine;
use crate::monitoring::{generate_run_id, run_span, Metrics, TraceEntry};
use crate::process::{ProcessDefinition, ProcessSnapshot};
use crate::scheduler::{PolicyConfig, PolicyInfo};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Knobs shared by every batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Abort once simulated time reaches this bound
    pub max_time: Tick,
    pub context_switch_overhead: Tick,
    pub seed: u64,
    /// Inclusive range for random I/O durations
    pub io_duration: (Tick, Tick),
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_time: DEFAULT_MAX_TIME,
            context_switch_overhead: DEFAULT_CONTEXT_SWITCH_OVERHEAD,
            seed: 0,
            io_duration: (DEFAULT_IO_DURATION_MIN, DEFAULT_IO_DURATION_MAX),
        }
    }
}

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub policy: Option<PolicyInfo>,
    pub final_time: Tick,
    pub trace: Vec<TraceEntry>,
    pub metrics: Metrics,
    /// Every process, in insertion order
    pub processes: Vec<ProcessSnapshot>,
}

/// Fresh engine loaded with the workload, nothing stepped yet
pub fn prepare_engine(
    policy: &PolicyConfig,
    definitions: &[ProcessDefinition],
    options: &RunOptions,
) -> SimResult<Engine> {
    if definitions.is_empty() {
        return Err(SimulationError::invalid_config(
            "a run needs at least one process",
        ));
    }

    let (io_min, io_max) = options.io_duration;
    let rng = SeededRandom::from_seed(options.seed).with_io_range(io_min, io_max)?;
    let mut engine = Engine::builder()
        .with_policy(policy.build()?)
        .with_context_switch_overhead(options.context_switch_overhead)
        .with_random_source(rng)
        .build();

    for def in definitions {
        engine.add_process(def)?;
    }
    Ok(engine)
}

/// Step until every process terminates
///
/// Fails with `SimulationBoundExceeded`, carrying the partial report, when
/// time reaches `options.max_time` first.
pub fn run_to_completion(
    policy: &PolicyConfig,
    definitions: &[ProcessDefinition],
    options: &RunOptions,
) -> SimResult<RunReport> {
    let run_id = generate_run_id();
    let span = run_span(&run_id, policy.as_str(), definitions.len());
    let _guard = span.enter();

    let mut engine = prepare_engine(policy, definitions, options)?;
    while !engine.is_complete() {
        if engine.current_time() >= options.max_time {
            warn!(
                max_time = options.max_time,
                completed = engine.metrics().completed,
                "Run exceeded its time bound"
            );
            return Err(SimulationError::SimulationBoundExceeded {
                max_time: options.max_time,
                report: Box::new(engine.report()),
            });
        }
        engine.advance()?;
    }

    let report = engine.report();
    info!(
        final_time = report.final_time,
        avg_waiting = report.metrics.avg_waiting_time,
        avg_turnaround = report.metrics.avg_turnaround_time,
        utilization = report.metrics.cpu_utilization,
        "Run complete"
    );
    Ok(report)
}

/// Run the same workload under each policy on its own engine
///
/// Results keep the order of `policies`; one failure does not stop the rest.
pub fn compare_policies(
    policies: &[PolicyConfig],
    definitions: &[ProcessDefinition],
    options: &RunOptions,
) -> Vec<SimResult<RunReport>> {
    policies
        .iter()
        .map(|policy| run_to_completion(policy, definitions, options))
        .collect()
}
