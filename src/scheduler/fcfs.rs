/*!
 * First Come, First Served
 */

use super::traits::SchedulingPolicy;
use super::types::PolicyInfo;
use crate::core::types::{Pid, Tick};
use crate::process::Process;

/// Non-preemptive, earliest arrival first; ties keep queue order
#[derive(Debug, Clone, Copy, Default)]
pub struct Fcfs;

impl SchedulingPolicy for Fcfs {
    fn name(&self) -> &'static str {
        "fcfs"
    }

    fn select_next(&mut self, ready: &[&Process], _now: Tick) -> Option<Pid> {
        // min_by_key keeps the first of equal keys
        ready
            .iter()
            .min_by_key(|p| p.arrival_time())
            .map(|p| p.pid())
    }

    fn should_preempt(&self, _running: &Process, _ready: &[&Process], _quantum: Option<Tick>) -> bool {
        false
    }

    fn info(&self) -> PolicyInfo {
        PolicyInfo::simple(self.name(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::test_support::ready_process;

    #[test]
    fn test_earliest_arrival_wins() {
        let a = ready_process(1, 5, 3);
        let b = ready_process(2, 1, 0);
        let c = ready_process(3, 2, 1);
        assert_eq!(Fcfs.select_next(&[&a, &b, &c], 4), Some(2));
    }

    #[test]
    fn test_ties_keep_queue_order() {
        let a = ready_process(7, 5, 2);
        let b = ready_process(3, 1, 2);
        assert_eq!(Fcfs.select_next(&[&a, &b], 2), Some(7));
    }

    #[test]
    fn test_never_preempts() {
        let running = ready_process(1, 50, 0);
        let short = ready_process(2, 1, 0);
        assert!(!Fcfs.should_preempt(&running, &[&short], Some(0)));
        assert_eq!(Fcfs.select_next(&[], 0), None);
        assert_eq!(Fcfs.quantum(), None);
    }
}
