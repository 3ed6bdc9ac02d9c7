/*!
 * Performance Metrics
 * Aggregate statistics derived from completed processes and engine counters
 */

use crate::core::types::Tick;
use crate::process::ProcessSnapshot;
use serde::{Deserialize, Serialize};

/// Engine counters the metrics depend on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsInput {
    pub total_time: Tick,
    pub idle_time: Tick,
    pub context_switches: u64,
    pub context_switch_overhead: Tick,
}

/// Aggregate run statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Metrics {
    pub avg_waiting_time: f64,
    pub avg_turnaround_time: f64,
    pub avg_response_time: f64,
    /// Percentage in [0, 100]
    pub cpu_utilization: f64,
    /// Completed processes per unit of time
    pub throughput: f64,
    pub context_switches: u64,
    pub completed: usize,
    pub total_time: Tick,
    pub idle_time: Tick,
}

impl Metrics {
    /// Pure function of the completed list and the counters
    pub fn compute(completed: &[ProcessSnapshot], input: MetricsInput) -> Self {
        let total = input.total_time.max(1) as f64;
        let switch_time = input.context_switches as f64 * input.context_switch_overhead as f64;
        let busy = input.total_time as f64 - input.idle_time as f64 - switch_time;

        Self {
            avg_waiting_time: mean(completed.iter().map(|p| p.waiting_time)),
            avg_turnaround_time: mean(completed.iter().map(|p| p.turnaround_time.unwrap_or(0))),
            avg_response_time: mean(completed.iter().map(|p| p.response_time.unwrap_or(0))),
            cpu_utilization: (busy * 100.0 / total).clamp(0.0, 100.0),
            throughput: completed.len() as f64 / total,
            context_switches: input.context_switches,
            completed: completed.len(),
            total_time: input.total_time,
            idle_time: input.idle_time,
        }
    }
}

fn mean(values: impl ExactSizeIterator<Item = Tick>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    values.sum::<Tick>() as f64 / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{Process, ProcessDefinition};
    use pretty_assertions::assert_eq;

    fn completed(waiting: Tick, turnaround: Tick, response: Option<Tick>) -> ProcessSnapshot {
        let mut snap = Process::create(1, &ProcessDefinition::new(1)).unwrap().snapshot();
        snap.waiting_time = waiting;
        snap.turnaround_time = Some(turnaround);
        snap.response_time = response;
        snap
    }

    #[test]
    fn test_empty_run() {
        let m = Metrics::compute(
            &[],
            MetricsInput {
                total_time: 0,
                idle_time: 0,
                context_switches: 3,
                context_switch_overhead: 1,
            },
        );
        assert_eq!(m.avg_waiting_time, 0.0);
        assert_eq!(m.avg_turnaround_time, 0.0);
        assert_eq!(m.avg_response_time, 0.0);
        assert_eq!(m.throughput, 0.0);
        assert_eq!(m.context_switches, 3);
        assert_eq!(m.cpu_utilization, 0.0);
    }

    #[test]
    fn test_averages() {
        let done = [completed(2, 10, Some(2)), completed(4, 6, None)];
        let m = Metrics::compute(
            &done,
            MetricsInput {
                total_time: 20,
                idle_time: 2,
                context_switches: 2,
                context_switch_overhead: 1,
            },
        );
        assert_eq!(m.avg_waiting_time, 3.0);
        assert_eq!(m.avg_turnaround_time, 8.0);
        assert_eq!(m.avg_response_time, 1.0);
        assert_eq!(m.cpu_utilization, 80.0);
        assert_eq!(m.throughput, 0.1);
        assert_eq!(m.completed, 2);
    }

    #[test]
    fn test_utilization_floor() {
        let m = Metrics::compute(
            &[],
            MetricsInput {
                total_time: 4,
                idle_time: 3,
                context_switches: 5,
                context_switch_overhead: 2,
            },
        );
        assert_eq!(m.cpu_utilization, 0.0);
    }
}
