/*!
 * Engine Tests
 * Step loop, interactive operations and snapshot contents
 */

use cpu_sched_sim::{
    Engine, Fcfs, NeverIo, ProcessDefinition, ProcessState, RoundRobin, SimulationError, Sjf,
};
use pretty_assertions::assert_eq;

fn engine_with(policy: Box<dyn cpu_sched_sim::SchedulingPolicy>, overhead: u64) -> Engine {
    Engine::builder()
        .with_policy(policy)
        .with_context_switch_overhead(overhead)
        .with_random_source(NeverIo)
        .build()
}

fn run_until_complete(engine: &mut Engine) {
    while !engine.is_complete() {
        engine.step().unwrap();
    }
}

fn abc_workload() -> Vec<ProcessDefinition> {
    vec![
        ProcessDefinition::new(10).named("A"),
        ProcessDefinition::new(2).named("B").arriving_at(1),
        ProcessDefinition::new(1).named("C").arriving_at(2),
    ]
}

#[test]
fn test_fcfs_without_overhead() {
    let mut engine = engine_with(Box::new(Fcfs), 0);
    for def in abc_workload() {
        engine.add_process(&def).unwrap();
    }
    run_until_complete(&mut engine);

    let procs = engine.processes();
    let completions: Vec<_> = procs.iter().map(|p| p.completion_time()).collect();
    let waits: Vec<_> = procs.iter().map(|p| p.waiting_time()).collect();
    assert_eq!(completions, vec![Some(10), Some(12), Some(13)]);
    assert_eq!(waits, vec![0, 9, 10]);
    assert_eq!(engine.current_time(), 13);
    assert_eq!(engine.context_switches(), 3);
}

#[test]
fn test_fcfs_with_overhead() {
    let mut engine = engine_with(Box::new(Fcfs), 1);
    for def in abc_workload() {
        engine.add_process(&def).unwrap();
    }
    run_until_complete(&mut engine);

    let procs = engine.processes();
    let completions: Vec<_> = procs.iter().map(|p| p.completion_time()).collect();
    let waits: Vec<_> = procs.iter().map(|p| p.waiting_time()).collect();
    let responses: Vec<_> = procs.iter().map(|p| p.response_time()).collect();
    assert_eq!(completions, vec![Some(11), Some(14), Some(16)]);
    assert_eq!(waits, vec![1, 11, 13]);
    assert_eq!(responses, vec![Some(1), Some(11), Some(13)]);

    let metrics = engine.metrics();
    assert_eq!(metrics.context_switches, 3);
    assert_eq!(metrics.completed, 3);
    assert_eq!(metrics.avg_turnaround_time, (11.0 + 13.0 + 14.0) / 3.0);
    assert_eq!(metrics.cpu_utilization, 81.25);
}

#[test]
fn test_trace_segments_follow_dispatch_order() {
    let mut engine = engine_with(Box::new(Fcfs), 1);
    for def in abc_workload() {
        engine.add_process(&def).unwrap();
    }
    run_until_complete(&mut engine);

    let trace = engine.trace();
    assert_eq!(trace.execution_segments(1), vec![(1, 11)]);
    assert_eq!(trace.execution_segments(2), vec![(12, 14)]);
    assert_eq!(trace.execution_segments(3), vec![(15, 16)]);
    assert_eq!(trace.segments().len(), 6);
}

#[test]
fn test_no_policy_then_set_policy() {
    let mut engine = Engine::builder().with_random_source(NeverIo).build();
    engine.add_process(&ProcessDefinition::new(2)).unwrap();
    assert!(matches!(
        engine.step(),
        Err(SimulationError::NoPolicySet { time: 0 })
    ));

    engine.set_policy(Box::new(Sjf::new(false)));
    run_until_complete(&mut engine);
    assert_eq!(engine.metrics().completed, 1);
}

#[test]
fn test_kill_running_process() {
    let mut engine = engine_with(Box::new(Fcfs), 0);
    let a = engine.add_process(&ProcessDefinition::new(5)).unwrap();
    let b = engine.add_process(&ProcessDefinition::new(3)).unwrap();
    engine.step().unwrap();
    engine.step().unwrap();
    assert_eq!(engine.running_pid(), Some(a));

    engine.kill_process(a).unwrap();
    let snap = engine.snapshot();
    assert!(snap.running_process.is_none());
    assert_eq!(snap.completed_processes.len(), 1);

    let killed = engine.process(a).unwrap();
    assert_eq!(killed.state(), ProcessState::Terminated);
    assert!(killed.was_killed());
    assert_eq!(killed.remaining_time(), 0);
    assert_eq!(killed.executed_time(), 2);
    assert_eq!(killed.turnaround_time(), Some(2));

    run_until_complete(&mut engine);
    assert_eq!(engine.process(b).unwrap().completion_time(), Some(5));
    assert!(!engine.process(b).unwrap().was_killed());
}

#[test]
fn test_kill_ready_and_future_processes() {
    let mut engine = engine_with(Box::new(Fcfs), 0);
    engine.add_process(&ProcessDefinition::new(4)).unwrap();
    let ready = engine.add_process(&ProcessDefinition::new(4)).unwrap();
    let future = engine
        .add_process(&ProcessDefinition::new(4).arriving_at(100))
        .unwrap();
    engine.step().unwrap();

    engine.kill_process(ready).unwrap();
    engine.kill_process(future).unwrap();
    assert!(engine.snapshot().ready_queue.is_empty());

    run_until_complete(&mut engine);
    assert_eq!(engine.current_time(), 4);
    assert_eq!(engine.process(future).unwrap().response_time(), None);
}

#[test]
fn test_inject_io_blocks_running_process() {
    let mut engine = engine_with(Box::new(Fcfs), 0);
    let a = engine.add_process(&ProcessDefinition::new(5)).unwrap();
    let b = engine.add_process(&ProcessDefinition::new(3)).unwrap();
    engine.step().unwrap();

    assert_eq!(engine.inject_io(Some(2)).unwrap(), a);
    let snap = engine.snapshot();
    assert!(snap.running_process.is_none());
    assert_eq!(snap.waiting_queue[0].pid, a);
    assert_eq!(snap.waiting_queue[0].state, ProcessState::Waiting);

    let snap = engine.step().unwrap();
    assert_eq!(snap.running_process.map(|p| p.pid), Some(b));

    let snap = engine.step().unwrap();
    assert_eq!(snap.ready_queue.len(), 1);
    assert_eq!(snap.ready_queue[0].pid, a);

    run_until_complete(&mut engine);
    assert_eq!(engine.process(a).unwrap().executed_time(), 5);
}

#[test]
fn test_reset_restores_initial_state() {
    let defs = abc_workload();
    let mut engine = engine_with(Box::new(RoundRobin::new(3)), 1);
    for def in &defs {
        engine.add_process(def).unwrap();
    }
    let initial = engine.snapshot();
    run_until_complete(&mut engine);
    let first = engine.report();

    engine.reset().unwrap();
    assert_eq!(engine.snapshot(), initial);

    run_until_complete(&mut engine);
    assert_eq!(engine.report(), first);
}

#[test]
fn test_zero_completion_metrics() {
    let mut engine = engine_with(Box::new(Fcfs), 1);
    engine.add_process(&ProcessDefinition::new(20)).unwrap();
    engine.step().unwrap();
    engine.step().unwrap();

    let metrics = engine.snapshot().metrics;
    assert_eq!(metrics.completed, 0);
    assert_eq!(metrics.avg_waiting_time, 0.0);
    assert_eq!(metrics.avg_turnaround_time, 0.0);
    assert_eq!(metrics.avg_response_time, 0.0);
    assert_eq!(metrics.throughput, 0.0);
    assert_eq!(metrics.context_switches, engine.context_switches());
    assert!((0.0..=100.0).contains(&metrics.cpu_utilization));
}

#[test]
fn test_late_add_is_admitted_immediately() {
    let mut engine = engine_with(Box::new(Fcfs), 0);
    engine.add_process(&ProcessDefinition::new(3)).unwrap();
    engine.step().unwrap();
    engine.step().unwrap();

    let late = engine
        .add_process(&ProcessDefinition::new(1).arriving_at(0))
        .unwrap();
    assert_eq!(engine.process(late).unwrap().state(), ProcessState::Ready);

    run_until_complete(&mut engine);
    assert_eq!(engine.process(late).unwrap().waiting_time(), 3);
}
