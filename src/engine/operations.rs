/*!
 * Engine Operations
 * Interactive controls: process admission, policy changes, kill, I/O injection, reset
 */

use super::Engine;
use crate::core::errors::{SimResult, SimulationError};
use crate::core::limits::DEFAULT_INJECTED_IO_DURATION;
use crate::core::types::{Pid, Tick};
use crate::process::{Process, ProcessDefinition, ProcessState};
use crate::scheduler::SchedulingPolicy;
use tracing::info;

impl Engine {
    /// Validate and register a process, returning its pid
    ///
    /// A process whose arrival time has already passed is admitted at once.
    pub fn add_process(&mut self, def: &ProcessDefinition) -> SimResult<Pid> {
        let pid = self.next_pid;
        let process = Process::create(pid, def)?;
        self.next_pid += 1;

        info!(
            pid,
            name = process.name(),
            arrival = process.arrival_time(),
            burst = process.burst_time(),
            "Process added"
        );

        let arrived = process.arrival_time() <= self.current_time;
        self.processes.push(process);
        if arrived {
            self.admit_arrivals()?;
        }
        Ok(pid)
    }

    /// Swap the scheduling policy mid-run
    ///
    /// The new policy starts from a clean state and every live process goes
    /// back to queue level 0.
    pub fn set_policy(&mut self, mut policy: Box<dyn SchedulingPolicy>) {
        info!(
            from = self.policy.as_ref().map(|p| p.name()).unwrap_or("none"),
            to = policy.name(),
            time = self.current_time,
            "Changing scheduling policy"
        );

        policy.reset();
        for process in self.processes.iter_mut().filter(|p| !p.is_terminated()) {
            process.reset_level();
        }
        self.quantum_remaining = match self.running {
            Some(_) => policy.quantum(),
            None => None,
        };
        self.policy = Some(policy);
    }

    /// Change the quantum of a quantum-based policy
    ///
    /// Takes effect at the next dispatch.
    pub fn set_time_quantum(&mut self, quantum: Tick) -> SimResult<()> {
        let time = self.current_time;
        self.policy
            .as_mut()
            .ok_or(SimulationError::NoPolicySet { time })?
            .set_time_quantum(quantum)
    }

    /// Terminate a process immediately, whatever its state
    pub fn kill_process(&mut self, pid: Pid) -> SimResult<()> {
        let idx = self
            .index_of(pid)
            .ok_or(SimulationError::ProcessNotFound { pid })?;
        let now = self.current_time;
        self.processes[idx].force_terminate(now)?;

        self.ready_queue.retain(|p| *p != pid);
        self.waiting_queue.retain(|p| *p != pid);
        if self.running == Some(pid) {
            self.release_cpu();
        }
        self.completed.push(pid);

        info!(pid, time = now, "Process killed");
        Ok(())
    }

    /// Force the running process into I/O
    ///
    /// Returns the pid that was blocked.
    pub fn inject_io(&mut self, duration: Option<Tick>) -> SimResult<Pid> {
        let now = self.current_time;
        let pid = self
            .running
            .ok_or(SimulationError::NoRunningProcess { time: now })?;
        let idx = self
            .index_of(pid)
            .ok_or(SimulationError::ProcessNotFound { pid })?;
        let duration = duration.unwrap_or(DEFAULT_INJECTED_IO_DURATION);

        let process = &mut self.processes[idx];
        process.transition(ProcessState::Waiting, now)?;
        process.start_io(duration);
        if let Some(policy) = self.policy.as_ref() {
            policy.on_io_request(process);
        }
        self.waiting_queue.push(pid);
        self.release_cpu();

        info!(pid, time = now, duration, "I/O injected");
        Ok(pid)
    }

    /// Rewind to time 0 keeping the process set
    ///
    /// The random source is not reseeded.
    pub fn reset(&mut self) -> SimResult<()> {
        self.current_time = 0;
        self.ready_queue.clear();
        self.waiting_queue.clear();
        self.completed.clear();
        self.trace.clear();
        self.idle_time = 0;
        self.context_switches = 0;
        self.context_switching = false;
        self.release_cpu();

        for process in &mut self.processes {
            process.reset();
        }
        if let Some(policy) = self.policy.as_mut() {
            policy.reset();
        }

        info!(processes = self.processes.len(), "Simulation reset");
        self.admit_arrivals()
    }

    /// Remove every process and rewind
    pub fn clear(&mut self) -> SimResult<()> {
        self.processes.clear();
        self.next_pid = 1;
        self.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::NeverIo;
    use crate::scheduler::{Fcfs, Mlfq, RoundRobin};
    use pretty_assertions::assert_eq;

    fn fcfs_engine() -> Engine {
        Engine::builder()
            .with_policy(Box::new(Fcfs))
            .with_context_switch_overhead(0)
            .with_random_source(NeverIo)
            .build()
    }

    #[test]
    fn test_add_process_assigns_sequential_pids() {
        let mut engine = fcfs_engine();
        let a = engine.add_process(&ProcessDefinition::new(3)).unwrap();
        let b = engine
            .add_process(&ProcessDefinition::new(2).arriving_at(5))
            .unwrap();
        assert_eq!((a, b), (1, 2));
        assert_eq!(engine.process(a).unwrap().state(), ProcessState::Ready);
        assert_eq!(engine.process(b).unwrap().state(), ProcessState::New);
    }

    #[test]
    fn test_add_process_rejects_zero_burst() {
        let mut engine = fcfs_engine();
        assert!(matches!(
            engine.add_process(&ProcessDefinition::new(0)),
            Err(SimulationError::InvalidConfiguration { .. })
        ));
        assert!(engine.processes().is_empty());
    }

    #[test]
    fn test_kill_unknown_process() {
        let mut engine = fcfs_engine();
        assert_eq!(
            engine.kill_process(42).unwrap_err(),
            SimulationError::ProcessNotFound { pid: 42 }
        );
    }

    #[test]
    fn test_kill_twice_is_rejected() {
        let mut engine = fcfs_engine();
        let pid = engine.add_process(&ProcessDefinition::new(3)).unwrap();
        engine.kill_process(pid).unwrap();
        assert!(matches!(
            engine.kill_process(pid),
            Err(SimulationError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_inject_io_without_running_process() {
        let mut engine = fcfs_engine();
        assert_eq!(
            engine.inject_io(None).unwrap_err(),
            SimulationError::NoRunningProcess { time: 0 }
        );
    }

    #[test]
    fn test_set_time_quantum_requires_quantum_policy() {
        let mut engine = fcfs_engine();
        assert!(engine.set_time_quantum(3).is_err());

        engine.set_policy(Box::new(RoundRobin::new(4)));
        engine.set_time_quantum(2).unwrap();
        assert_eq!(engine.policy().unwrap().quantum(), Some(2));
    }

    #[test]
    fn test_set_policy_resets_levels() {
        let mut engine = Engine::builder()
            .with_policy(Box::new(Mlfq::new(3, vec![1, 2, 4], 1000).unwrap()))
            .with_context_switch_overhead(0)
            .with_random_source(NeverIo)
            .build();
        let pid = engine.add_process(&ProcessDefinition::new(20)).unwrap();
        engine.step().unwrap();
        assert_eq!(engine.process(pid).unwrap().queue_level(), 1);

        engine.set_policy(Box::new(Fcfs));
        assert_eq!(engine.process(pid).unwrap().queue_level(), 0);
        assert_eq!(engine.quantum_remaining(), None);
    }

    #[test]
    fn test_clear_restarts_pids() {
        let mut engine = fcfs_engine();
        engine.add_process(&ProcessDefinition::new(3)).unwrap();
        engine.step().unwrap();
        engine.clear().unwrap();
        assert_eq!(engine.current_time(), 0);
        assert!(engine.processes().is_empty());
        assert!(engine.trace().is_empty());
        assert_eq!(engine.add_process(&ProcessDefinition::new(1)).unwrap(), 1);
    }
}
