/*!
 * Monitoring Module
 * Execution trace, performance metrics and structured tracing setup
 */

pub mod metrics;
pub mod trace;
pub mod tracer;

pub use metrics::{Metrics, MetricsInput};
pub use trace::{Trace, TraceEntry};
pub use tracer::{generate_run_id, init_tracing, run_span};
