/*!
 * Engine Step
 * One discrete time step: admission, I/O completion, dispatch, execution
 *
 * The phase order is fixed; changing it changes every metric.
 */

use super::snapshot::EngineSnapshot;
use super::{ready_view, Engine};
use crate::core::errors::{SimResult, SimulationError};
use crate::core::types::{Pid, Tick};
use crate::monitoring::TraceEntry;
use crate::process::ProcessState;
use tracing::{debug, info};

impl Engine {
    /// Advance one step and return the resulting snapshot
    pub fn step(&mut self) -> SimResult<EngineSnapshot> {
        self.advance()?;
        Ok(self.snapshot())
    }

    /// Advance one step without building a snapshot
    ///
    /// A completed simulation is left untouched.
    pub fn advance(&mut self) -> SimResult<()> {
        if self.policy.is_none() {
            return Err(SimulationError::NoPolicySet {
                time: self.current_time,
            });
        }
        if self.is_complete() {
            return Ok(());
        }

        let step_start = self.current_time;
        self.context_switching = false;

        self.admit_arrivals()?;
        self.complete_io()?;

        if self.running.is_none() && !self.ready_queue.is_empty() {
            self.dispatch()?;
        }

        // Exactly one of execute / idle per step
        match self.running {
            Some(pid) => self.execute(pid)?,
            None => self.idle(),
        }

        self.check_boost(self.current_time - step_start);
        Ok(())
    }

    /// Move every arrived `New` process to the ready queue
    ///
    /// Arrivals are admitted in arrival order and stamped with their arrival
    /// time, so time spent before the engine noticed them counts as waiting.
    pub(super) fn admit_arrivals(&mut self) -> SimResult<()> {
        let now = self.current_time;
        let mut arrivals: Vec<usize> = self
            .processes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.state() == ProcessState::New && p.arrival_time() <= now)
            .map(|(idx, _)| idx)
            .collect();
        arrivals.sort_by_key(|&idx| self.processes[idx].arrival_time());

        for idx in arrivals {
            let process = &mut self.processes[idx];
            let arrival = process.arrival_time();
            process.transition(ProcessState::Ready, arrival)?;
            if let Some(policy) = self.policy.as_mut() {
                policy.on_admit(process);
            }
            self.ready_queue.push_back(process.pid());
            debug!(pid = process.pid(), arrival, time = now, "admitted");
        }
        Ok(())
    }

    /// Advance every I/O countdown by one unit, readmitting finished ones
    fn complete_io(&mut self) -> SimResult<()> {
        let now = self.current_time;
        let waiting = std::mem::take(&mut self.waiting_queue);
        let mut still_waiting = Vec::with_capacity(waiting.len());

        for pid in waiting {
            let Some(idx) = self.index_of(pid) else {
                continue;
            };
            let process = &mut self.processes[idx];
            if process.advance_io(1) {
                process.transition(ProcessState::Ready, now)?;
                self.ready_queue.push_back(pid);
                debug!(pid, time = now, "I/O complete");
            } else {
                still_waiting.push(pid);
            }
        }

        self.waiting_queue = still_waiting;
        Ok(())
    }

    /// Ask the policy for the next process and switch to it
    fn dispatch(&mut self) -> SimResult<()> {
        let now = self.current_time;
        let selected = {
            let policy = self
                .policy
                .as_mut()
                .ok_or(SimulationError::NoPolicySet { time: now })?;
            let ready = ready_view(&self.processes, &self.ready_queue);
            policy.select_next(&ready, now)
        };
        let Some(pid) = selected else {
            return Ok(());
        };

        let position = self
            .ready_queue
            .iter()
            .position(|p| *p == pid)
            .ok_or(SimulationError::ProcessNotFound { pid })?;
        self.ready_queue.remove(position);

        self.charge_context_switch();

        let idx = self
            .index_of(pid)
            .ok_or(SimulationError::ProcessNotFound { pid })?;
        self.processes[idx].transition(ProcessState::Running, self.current_time)?;
        self.running = Some(pid);
        self.quantum_remaining = self.policy.as_ref().and_then(|p| p.quantum());

        debug!(
            pid,
            time = self.current_time,
            quantum = ?self.quantum_remaining,
            "dispatched"
        );
        Ok(())
    }

    fn charge_context_switch(&mut self) {
        let start = self.current_time;
        if self.context_switch_overhead > 0 {
            let end = start + self.context_switch_overhead;
            self.trace.push(TraceEntry::ContextSwitch { start, end });
            self.current_time = end;
        }
        self.context_switches += 1;
        self.context_switching = true;
    }

    /// Run the current process for one unit, then settle where it goes
    fn execute(&mut self, pid: Pid) -> SimResult<()> {
        let idx = self
            .index_of(pid)
            .ok_or(SimulationError::ProcessNotFound { pid })?;
        let start = self.current_time;

        let outcome = self.processes[idx].execute_one_unit(self.rng.as_mut());
        let process = &self.processes[idx];
        self.trace.push(TraceEntry::Execution {
            start,
            end: start + 1,
            pid,
            name: process.name().to_string(),
            color: process.color().to_string(),
        });
        self.current_time += 1;
        if let Some(quantum) = self.quantum_remaining.as_mut() {
            *quantum = quantum.saturating_sub(1);
        }
        let now = self.current_time;

        if outcome.completed {
            self.processes[idx].transition(ProcessState::Terminated, now)?;
            self.completed.push(pid);
            self.release_cpu();
            info!(pid, time = now, "process completed");
        } else if outcome.requests_io {
            let duration = self.rng.io_duration();
            let process = &mut self.processes[idx];
            process.transition(ProcessState::Waiting, now)?;
            process.start_io(duration);
            if let Some(policy) = self.policy.as_ref() {
                policy.on_io_request(process);
            }
            self.waiting_queue.push(pid);
            self.release_cpu();
            debug!(pid, time = now, duration, "I/O requested");
        } else if self.preemption_due(idx) {
            let expired = self.quantum_remaining == Some(0);
            let process = &mut self.processes[idx];
            if expired {
                if let Some(policy) = self.policy.as_ref() {
                    policy.on_quantum_expired(process);
                }
            }
            process.transition(ProcessState::Ready, now)?;
            self.ready_queue.push_back(pid);
            self.release_cpu();
            debug!(pid, time = now, expired, "preempted");
        }
        Ok(())
    }

    fn preemption_due(&self, idx: usize) -> bool {
        let Some(policy) = self.policy.as_ref() else {
            return false;
        };
        let ready = ready_view(&self.processes, &self.ready_queue);
        policy.should_preempt(&self.processes[idx], &ready, self.quantum_remaining)
    }

    fn idle(&mut self) {
        let start = self.current_time;
        self.trace.push(TraceEntry::Idle {
            start,
            end: start + 1,
        });
        self.idle_time += 1;
        self.current_time += 1;
    }

    /// Reset every live process to the top level when the policy says so
    ///
    /// A process running through the boost restarts on a fresh top-level slice.
    fn check_boost(&mut self, elapsed: Tick) {
        let Some(policy) = self.policy.as_mut() else {
            return;
        };
        if policy.on_tick(elapsed) {
            for process in self.processes.iter_mut().filter(|p| !p.is_terminated()) {
                process.reset_level();
            }
            if self.running.is_some() {
                self.quantum_remaining = policy.quantum();
            }
            debug!(
                time = self.current_time,
                quantum = ?self.quantum_remaining,
                "priority boost"
            );
        }
    }

    pub(super) fn release_cpu(&mut self) {
        self.running = None;
        self.quantum_remaining = None;
    }
}
