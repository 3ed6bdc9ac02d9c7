/*!
 * CPU Scheduling Simulator Library
 * Discrete-time single-CPU simulation of classic scheduling policies
 */

pub mod core;
pub mod engine;
pub mod monitoring;
pub mod process;
pub mod runner;
pub mod scheduler;

// Re-exports
pub use crate::core::*;
pub use engine::{Engine, EngineBuilder, EngineSnapshot};
pub use monitoring::{init_tracing, Metrics, Trace, TraceEntry};
pub use process::{Process, ProcessDefinition, ProcessSnapshot, ProcessState};
pub use runner::{
    compare_policies, prepare_engine, run_to_completion, PacedRunner, RunOptions, RunReport,
};
pub use scheduler::{Fcfs, Mlfq, PolicyConfig, PolicyInfo, RoundRobin, SchedulingPolicy, Sjf};
