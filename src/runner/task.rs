/*!
 * Paced Runner
 * Background task stepping a shared engine at a fixed wall-clock interval
 *
 * # Shutdown
 *
 * Drop cannot await, so the runner offers two exits:
 *
 * 1. `shutdown().await` or `join().await`: waits for the task and marks the
 *    handle as cleanly consumed.
 * 2. `Drop`: if neither was called the task is aborted and a warning logged.
 *
 * Between steps the engine lock is released, so callers may inspect or
 * mutate the engine (kill, inject I/O, change policy) while it runs.
 */

use crate::core::errors::{SimResult, SimulationError};
use crate::engine::Engine;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Shortest interval the runner will tick at
const MIN_PACING: Duration = Duration::from_micros(1);

/// Control messages for the runner task
#[derive(Debug, Clone)]
pub enum RunnerCommand {
    /// Change the delay between steps
    UpdatePacing(Duration),
    Pause,
    Resume,
    Shutdown,
}

/// Handle to a running paced simulation
pub struct PacedRunner {
    command_tx: mpsc::UnboundedSender<RunnerCommand>,
    handle: Option<JoinHandle<SimResult<()>>>,
    /// Checked before every step
    cancelled: Arc<AtomicBool>,
    shutdown_initiated: Arc<AtomicBool>,
}

impl PacedRunner {
    /// Start stepping `engine` every `pacing` until it completes
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(engine: Arc<Mutex<Engine>>, pacing: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let shutdown_initiated = Arc::new(AtomicBool::new(false));

        engine.lock().set_auto_run(true);
        let handle = tokio::spawn(run_paced_loop(
            engine,
            pacing,
            command_rx,
            cancelled.clone(),
        ));

        info!(pacing_ms = pacing.as_millis() as u64, "Paced runner spawned");

        Self {
            command_tx,
            handle: Some(handle),
            cancelled,
            shutdown_initiated,
        }
    }

    pub fn update_pacing(&self, pacing: Duration) {
        let _ = self.command_tx.send(RunnerCommand::UpdatePacing(pacing));
    }

    pub fn pause(&self) {
        let _ = self.command_tx.send(RunnerCommand::Pause);
    }

    pub fn resume(&self) {
        let _ = self.command_tx.send(RunnerCommand::Resume);
    }

    /// Whether the background task has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stop the task and wait for it
    ///
    /// Consumes self so the runner cannot be stopped twice.
    pub async fn shutdown(mut self) -> SimResult<()> {
        self.shutdown_initiated.store(true, Ordering::SeqCst);
        self.cancelled.store(true, Ordering::SeqCst);
        let _ = self.command_tx.send(RunnerCommand::Shutdown);
        let result = self.wait().await;
        info!("Paced runner shutdown complete");
        result
    }

    /// Wait for the simulation to finish on its own
    pub async fn join(mut self) -> SimResult<()> {
        self.shutdown_initiated.store(true, Ordering::SeqCst);
        self.wait().await
    }

    async fn wait(&mut self) -> SimResult<()> {
        match self.handle.take() {
            Some(handle) => handle.await.map_err(|e| {
                warn!(error = %e, "Paced runner task failed");
                SimulationError::RunnerFailed {
                    reason: e.to_string(),
                }
            })?,
            None => Ok(()),
        }
    }
}

async fn run_paced_loop(
    engine: Arc<Mutex<Engine>>,
    pacing: Duration,
    mut command_rx: mpsc::UnboundedReceiver<RunnerCommand>,
    cancelled: Arc<AtomicBool>,
) -> SimResult<()> {
    let mut active = true;
    let mut interval = pacing_interval(pacing);

    let result = loop {
        tokio::select! {
            _ = interval.tick() => {
                if cancelled.load(Ordering::SeqCst) {
                    break Ok(());
                }
                if !active {
                    continue;
                }
                let mut engine = engine.lock();
                if let Err(e) = engine.advance() {
                    warn!(error = %e, time = engine.current_time(), "Paced step failed");
                    break Err(e);
                }
                if engine.is_complete() {
                    info!(final_time = engine.current_time(), "Paced run complete");
                    break Ok(());
                }
            }

            Some(cmd) = command_rx.recv() => {
                match cmd {
                    RunnerCommand::UpdatePacing(pacing) => {
                        debug!(pacing_ms = pacing.as_millis() as u64, "Pacing updated");
                        interval = pacing_interval(pacing);
                    }
                    RunnerCommand::Pause => {
                        info!("Paced runner paused");
                        active = false;
                        engine.lock().set_auto_run(false);
                    }
                    RunnerCommand::Resume => {
                        info!("Paced runner resumed");
                        active = true;
                        engine.lock().set_auto_run(true);
                    }
                    RunnerCommand::Shutdown => {
                        info!("Paced runner shutting down");
                        break Ok(());
                    }
                }
            }
        }
    };

    engine.lock().set_auto_run(false);
    result
}

fn pacing_interval(pacing: Duration) -> tokio::time::Interval {
    let mut interval = tokio::time::interval(pacing.max(MIN_PACING));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    interval
}

impl Drop for PacedRunner {
    fn drop(&mut self) {
        if self.shutdown_initiated.load(Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.handle.take() {
            warn!(
                "PacedRunner dropped without shutdown() - aborting task. \
                 Use `runner.shutdown().await` for graceful cleanup."
            );
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::NeverIo;
    use crate::process::ProcessDefinition;
    use crate::scheduler::RoundRobin;

    fn shared_engine(bursts: &[u64]) -> Arc<Mutex<Engine>> {
        let mut engine = Engine::builder()
            .with_policy(Box::new(RoundRobin::new(2)))
            .with_random_source(NeverIo)
            .build();
        for burst in bursts {
            engine.add_process(&ProcessDefinition::new(*burst)).unwrap();
        }
        Arc::new(Mutex::new(engine))
    }

    #[tokio::test]
    async fn test_runs_to_completion() {
        let engine = shared_engine(&[3, 4]);
        let runner = PacedRunner::spawn(engine.clone(), Duration::from_millis(1));
        runner.join().await.unwrap();

        let engine = engine.lock();
        assert!(engine.is_complete());
        assert!(!engine.snapshot().is_running);
    }

    #[tokio::test]
    async fn test_pause_stops_progress() {
        let engine = shared_engine(&[10_000]);
        let runner = PacedRunner::spawn(engine.clone(), Duration::from_millis(1));
        assert!(engine.lock().snapshot().is_running);

        runner.pause();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let paused_at = engine.lock().current_time();
        assert!(!engine.lock().snapshot().is_running);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(engine.lock().current_time(), paused_at);

        runner.resume();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(engine.lock().current_time() > paused_at);

        runner.shutdown().await.unwrap();
        assert!(!engine.lock().snapshot().is_running);
    }

    #[tokio::test]
    async fn test_step_error_is_returned() {
        let engine = Arc::new(Mutex::new(
            Engine::builder().with_random_source(NeverIo).build(),
        ));
        let runner = PacedRunner::spawn(engine, Duration::from_millis(1));
        assert!(matches!(
            runner.join().await,
            Err(SimulationError::NoPolicySet { .. })
        ));
    }

    #[tokio::test]
    async fn test_drop_without_shutdown_aborts() {
        let engine = shared_engine(&[10_000]);
        let runner = PacedRunner::spawn(engine.clone(), Duration::from_millis(1));
        tokio::time::sleep(Duration::from_millis(5)).await;
        drop(runner);
        tokio::time::sleep(Duration::from_millis(5)).await;
        let stopped_at = engine.lock().current_time();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(engine.lock().current_time(), stopped_at);
    }
}
