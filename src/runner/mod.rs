/*!
 * Runners
 * Drive an engine to completion, either in one batch or paced in the background
 */

pub mod batch;
pub mod task;

pub use batch::{compare_policies, prepare_engine, run_to_completion, RunOptions, RunReport};
pub use task::{PacedRunner, RunnerCommand};
