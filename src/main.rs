/*!
 * CPU Scheduling Simulator - Main Entry Point
 *
 * Runs a workload under the configured policy, or under every policy for
 * comparison, and prints the reports as JSON on stdout.
 *
 * Usage: simulator [workload.json]
 *
 * The workload file is a JSON array of process definitions. Settings come
 * from SIM_POLICY, SIM_OVERHEAD, SIM_MAX_TIME, SIM_SEED and SIM_COMPARE
 * (set to 0 to run only SIM_POLICY).
 */

use cpu_sched_sim::{
    compare_policies, init_tracing, PolicyConfig, ProcessDefinition, RunReport, SimulationConfig,
};
use miette::{IntoDiagnostic, WrapErr};
use tracing::info;

fn main() -> miette::Result<()> {
    init_tracing();

    let config = SimulationConfig::from_env()?;
    let workload = match std::env::args().nth(1) {
        Some(path) => load_workload(&path)?,
        None => demo_workload(),
    };

    let compare = std::env::var("SIM_COMPARE")
        .map(|v| v != "0" && v != "false")
        .unwrap_or(true);
    let policies = if compare {
        PolicyConfig::all()
    } else {
        vec![config.policy.clone()]
    };

    info!(
        processes = workload.len(),
        policies = policies.len(),
        overhead = config.context_switch_overhead,
        "Starting simulation"
    );

    let reports = compare_policies(&policies, &workload, &config.run_options())
        .into_iter()
        .collect::<Result<Vec<RunReport>, _>>()?;

    for report in &reports {
        if let Some(policy) = &report.policy {
            info!(
                policy = %policy.name,
                avg_waiting = report.metrics.avg_waiting_time,
                avg_turnaround = report.metrics.avg_turnaround_time,
                avg_response = report.metrics.avg_response_time,
                utilization = report.metrics.cpu_utilization,
                "Policy summary"
            );
        }
    }

    let json = serde_json::to_string_pretty(&reports).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

fn load_workload(path: &str) -> miette::Result<Vec<ProcessDefinition>> {
    let raw = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading workload {}", path))?;
    serde_json::from_str(&raw)
        .into_diagnostic()
        .wrap_err_with(|| format!("parsing workload {}", path))
}

/// Mixed CPU-bound and I/O-bound workload
fn demo_workload() -> Vec<ProcessDefinition> {
    vec![
        ProcessDefinition::new(8).named("compiler"),
        ProcessDefinition::new(4)
            .named("editor")
            .arriving_at(1)
            .with_io_frequency(0.3),
        ProcessDefinition::new(9).named("backup").arriving_at(2),
        ProcessDefinition::new(5)
            .named("shell")
            .arriving_at(3)
            .with_priority(2)
            .with_io_frequency(0.2),
        ProcessDefinition::new(2).named("cron").arriving_at(6),
    ]
}
