/*!
 * Scheduler Module
 * Pluggable CPU scheduling policies
 */

pub mod fcfs;
pub mod mlfq;
pub mod round_robin;
pub mod sjf;
pub mod traits;
pub mod types;

// Re-export public API
pub use fcfs::Fcfs;
pub use mlfq::Mlfq;
pub use round_robin::RoundRobin;
pub use sjf::Sjf;
pub use traits::SchedulingPolicy;
pub use types::{PolicyConfig, PolicyInfo};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::types::{Pid, Tick};
    use crate::process::{Process, ProcessDefinition, ProcessState};

    /// Process already admitted to the ready queue at its arrival time
    pub fn ready_process(pid: Pid, burst: Tick, arrival: Tick) -> Process {
        let mut p = Process::create(pid, &ProcessDefinition::new(burst).arriving_at(arrival)).unwrap();
        p.transition(ProcessState::Ready, arrival).unwrap();
        p
    }
}
