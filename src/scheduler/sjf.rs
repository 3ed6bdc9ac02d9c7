/*!
 * Shortest Job First / Shortest Remaining Time First
 */

use super::traits::SchedulingPolicy;
use super::types::PolicyInfo;
use crate::core::types::{Pid, Tick};
use crate::process::Process;

/// Smallest remaining time first, ties broken by earliest arrival
///
/// With `preemptive` set this is SRTF: a ready process with strictly less
/// remaining time than the running one forces a switch.
#[derive(Debug, Clone, Copy)]
pub struct Sjf {
    preemptive: bool,
}

impl Sjf {
    pub fn new(preemptive: bool) -> Self {
        Self { preemptive }
    }

    #[inline]
    pub fn is_preemptive(&self) -> bool {
        self.preemptive
    }
}

impl SchedulingPolicy for Sjf {
    fn name(&self) -> &'static str {
        if self.preemptive {
            "srtf"
        } else {
            "sjf"
        }
    }

    fn select_next(&mut self, ready: &[&Process], _now: Tick) -> Option<Pid> {
        ready
            .iter()
            .min_by_key(|p| (p.remaining_time(), p.arrival_time()))
            .map(|p| p.pid())
    }

    fn should_preempt(&self, running: &Process, ready: &[&Process], _quantum: Option<Tick>) -> bool {
        if !self.preemptive {
            return false;
        }
        // Equal remaining time is not worth a context switch
        ready
            .iter()
            .map(|p| p.remaining_time())
            .min()
            .is_some_and(|shortest| shortest < running.remaining_time())
    }

    fn info(&self) -> PolicyInfo {
        PolicyInfo::simple(self.name(), self.preemptive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::test_support::ready_process;

    #[test]
    fn test_shortest_selected() {
        let long = ready_process(1, 9, 0);
        let short = ready_process(2, 3, 4);
        let mid = ready_process(3, 5, 1);
        assert_eq!(Sjf::new(false).select_next(&[&long, &short, &mid], 5), Some(2));
    }

    #[test]
    fn test_tie_broken_by_arrival() {
        let late = ready_process(1, 3, 6);
        let early = ready_process(2, 3, 2);
        assert_eq!(Sjf::new(false).select_next(&[&late, &early], 6), Some(2));
    }

    #[test]
    fn test_non_preemptive_never_preempts() {
        let running = ready_process(1, 20, 0);
        let short = ready_process(2, 1, 1);
        assert!(!Sjf::new(false).should_preempt(&running, &[&short], None));
    }

    #[test]
    fn test_srtf_strict_inequality() {
        let running = ready_process(1, 4, 0);
        let equal = ready_process(2, 4, 1);
        let shorter = ready_process(3, 3, 1);
        let srtf = Sjf::new(true);
        assert!(!srtf.should_preempt(&running, &[&equal], None));
        assert!(srtf.should_preempt(&running, &[&equal, &shorter], None));
        assert!(!srtf.should_preempt(&running, &[], None));
    }
}
