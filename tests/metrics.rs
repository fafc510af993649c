use sched_sim::{
    Metrics, Sim, SimConfig,
    core::{Occupant, ProcessSpec, SimError, Trace},
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn sim(list: &[(i64, i64, i64)]) -> Sim {
    let specs: Vec<ProcessSpec> = list
        .iter()
        .map(|&(pid, arrival, burst)| ProcessSpec::new(pid, arrival, burst))
        .collect();
    Sim::new(&specs, SimConfig::default()).unwrap()
}

#[test]
fn fcfs_scenario_metrics() {
    let outcome = sim(&[(1, 0, 5), (2, 1, 3), (3, 2, 8), (4, 3, 6)])
        .run_named("fcfs")
        .unwrap();
    let report = outcome.report().unwrap();

    assert!(close(report.avg_waiting, 5.75));
    assert!(close(report.avg_turnaround, 11.25));
    assert!(close(report.avg_response, 5.75));
    assert!(close(report.cpu_utilization, 100.0));
    assert!(close(report.throughput, 4.0 / 22.0));
    assert_eq!(report.context_switches, 3);
    assert_eq!(report.total_time, 22);
    assert_eq!(report.idle_time, 0);
    assert_eq!(report.total_processes, 4);
    // waits 0, 4, 6, 13
    assert!(close(report.fairness_index, 529.0 / 884.0));

    let waits: Vec<u64> = report.processes.iter().map(|r| r.waiting).collect();
    assert_eq!(waits, vec![0, 4, 6, 13]);
}

#[test]
fn idle_scenario_metrics() {
    let outcome = sim(&[(1, 3, 2)]).run_named("fcfs").unwrap();
    let report = outcome.report().unwrap();

    assert!(close(report.cpu_utilization, 40.0));
    assert!(close(report.throughput, 0.2));
    assert_eq!(report.idle_time, 3);
    assert_eq!(report.context_switches, 0);
    assert!(close(report.avg_waiting, 0.0));
    assert_eq!(report.fairness_index, 1.0);
}

#[test]
fn rr_response_differs_from_waiting() {
    let outcome = sim(&[(1, 0, 4), (2, 1, 2)]).run_named("rr").unwrap();
    let report = outcome.report().unwrap();

    // P1: start 0, done 6 -> wait 2; P2: start 2, done 4 -> wait 1, response 1
    assert!(close(report.avg_waiting, 1.5));
    assert!(close(report.avg_response, 0.5));
    assert!(close(report.avg_turnaround, 4.5));
    assert_eq!(report.context_switches, 2);
}

#[test]
fn stcf_single_process_has_no_switches() {
    let outcome = sim(&[(1, 0, 5)]).run_named("stcf").unwrap();
    assert_eq!(outcome.trace.len(), 5);
    assert_eq!(outcome.metrics().context_switches(), 0);
}

#[test]
fn idle_gap_never_counts_as_switch() {
    let mut trace = Trace::new();
    trace.push(Occupant::Process(1), 0, 2);
    trace.push_idle(2, 4);
    trace.push(Occupant::Process(1), 4, 5);
    trace.push_idle(5, 6);
    trace.push(Occupant::Process(2), 6, 8);
    assert_eq!(Metrics::new(&[], &trace).context_switches(), 0);
}

#[test]
fn fairness_bounds() {
    let outcome = sim(&[(1, 0, 9), (2, 0, 1), (3, 0, 1), (4, 0, 1)])
        .run_named("fcfs")
        .unwrap();
    let f = outcome.metrics().fairness_index().unwrap();
    assert!(f > 0.0 && f <= 1.0);
    assert!(f < 1.0);
}

#[test]
fn report_rejects_broken_trace() {
    let outcome = sim(&[(1, 0, 2)]).run_named("fcfs").unwrap();
    let mut trace = outcome.trace.clone();
    trace.push(Occupant::Process(1), 5, 6);

    assert!(matches!(
        Metrics::new(&outcome.processes, &trace).report(),
        Err(SimError::InvalidTrace(_))
    ));
}

#[test]
fn report_serializes_to_json() {
    let outcome = sim(&[(1, 0, 2), (2, 1, 1)]).run_named("sjf").unwrap();
    let report = outcome.report().unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["total_time"], 3);
    assert_eq!(json["processes"][1]["pid"], 2);
    assert_eq!(json["processes"][1]["waiting"], 1);
}

#[test]
fn rows_follow_arrival_order() {
    let outcome = sim(&[(3, 4, 1), (2, 0, 2), (1, 0, 1)])
        .run_named("rr")
        .unwrap();
    let pids: Vec<u32> = outcome
        .report()
        .unwrap()
        .processes
        .iter()
        .map(|r| r.pid)
        .collect();
    assert_eq!(pids, vec![1, 2, 3]);
}
