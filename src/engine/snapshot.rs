/*!
 * Engine Snapshot
 * Owned, serializable view of the engine between steps
 */

use super::Engine;
use crate::core::types::{Pid, Tick};
use crate::monitoring::{Metrics, MetricsInput, TraceEntry};
use crate::process::ProcessSnapshot;
use crate::runner::RunReport;
use crate::scheduler::PolicyInfo;
use serde::{Deserialize, Serialize};

/// Everything a UI or test needs to render one instant of the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineSnapshot {
    pub current_time: Tick,
    /// Set while a paced runner is driving the engine
    pub is_running: bool,
    /// The last step paid for a dispatch
    pub is_context_switching: bool,
    pub is_complete: bool,
    pub running_process: Option<ProcessSnapshot>,
    pub ready_queue: Vec<ProcessSnapshot>,
    pub waiting_queue: Vec<ProcessSnapshot>,
    pub completed_processes: Vec<ProcessSnapshot>,
    pub all_processes: Vec<ProcessSnapshot>,
    pub trace: Vec<TraceEntry>,
    pub metrics: Metrics,
    pub policy_info: Option<PolicyInfo>,
    pub quantum_remaining: Option<Tick>,
    pub context_switch_overhead: Tick,
}

impl Engine {
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            current_time: self.current_time,
            is_running: self.auto_run,
            is_context_switching: self.context_switching,
            is_complete: self.is_complete(),
            running_process: self.running.and_then(|pid| self.process(pid)).map(|p| p.snapshot()),
            ready_queue: self.snapshots_of(self.ready_queue.iter()),
            waiting_queue: self.snapshots_of(self.waiting_queue.iter()),
            completed_processes: self.snapshots_of(self.completed.iter()),
            all_processes: self.processes.iter().map(|p| p.snapshot()).collect(),
            trace: self.trace.entries().to_vec(),
            metrics: self.metrics(),
            policy_info: self.policy.as_ref().map(|p| p.info()),
            quantum_remaining: self.quantum_remaining,
            context_switch_overhead: self.context_switch_overhead,
        }
    }

    /// Metrics over the processes completed so far
    pub fn metrics(&self) -> Metrics {
        let completed = self.snapshots_of(self.completed.iter());
        Metrics::compute(
            &completed,
            MetricsInput {
                total_time: self.current_time,
                idle_time: self.idle_time,
                context_switches: self.context_switches,
                context_switch_overhead: self.context_switch_overhead,
            },
        )
    }

    /// Final (or partial) outcome of a run
    pub fn report(&self) -> RunReport {
        RunReport {
            policy: self.policy.as_ref().map(|p| p.info()),
            final_time: self.current_time,
            trace: self.trace.entries().to_vec(),
            metrics: self.metrics(),
            processes: self.processes.iter().map(|p| p.snapshot()).collect(),
        }
    }

    fn snapshots_of<'a>(&self, pids: impl Iterator<Item = &'a Pid>) -> Vec<ProcessSnapshot> {
        pids.filter_map(|pid| self.process(*pid))
            .map(|p| p.snapshot())
            .collect()
    }
}
