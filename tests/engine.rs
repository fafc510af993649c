use sched_sim::{
    LoadMode, Sim, SimConfig,
    core::{
        DescriptorError, Engine, Occupant, ProcessSpec, ProcessState, SimError, Ticks, TraceEntry,
    },
};

fn loaded(specs: &[ProcessSpec]) -> Engine {
    let mut engine = Engine::new();
    engine.load(specs, LoadMode::Strict).unwrap();
    engine
}

#[test]
fn load_builds_fresh_records() {
    let engine = loaded(&[ProcessSpec::new(1, 0, 5), ProcessSpec::new(2, 1, 3).with_name("Editor")]);
    assert_eq!(engine.len(), 2);
    assert_eq!(engine.now(), 0);
    assert!(engine.trace().is_empty());
    assert_eq!(engine.find_by_pid(1).unwrap().name, "P1");
    assert_eq!(engine.find_by_pid(2).unwrap().name, "Editor");
    assert!(engine.find_by_pid(3).is_none());
    assert_eq!(engine.descriptors().len(), 2);
}

#[test]
fn strict_load_refuses_bad_workload() {
    let mut engine = loaded(&[ProcessSpec::new(9, 0, 1)]);
    let err = engine
        .load(
            &[ProcessSpec::new(1, 0, 5), ProcessSpec::new(2, 0, 0)],
            LoadMode::Strict,
        )
        .unwrap_err();
    assert_eq!(
        err,
        SimError::InvalidDescriptor(DescriptorError::NonPositiveBurst { pid: 2, burst: 0 })
    );
    // Previous workload untouched
    assert!(engine.find_by_pid(9).is_some());
}

#[test]
fn best_effort_load_skips_and_reports() {
    let mut engine = Engine::new();
    let report = engine
        .load(
            &[
                ProcessSpec::new(1, 0, 5),
                ProcessSpec::new(-3, 0, 2),
                ProcessSpec::new(1, 2, 2),
                ProcessSpec::new(4, -1, 2),
                ProcessSpec::new(5, 1, 1),
            ],
            LoadMode::BestEffort,
        )
        .unwrap();

    assert_eq!(report.loaded, 2);
    assert_eq!(
        report.rejected,
        vec![
            DescriptorError::NegativePid(-3),
            DescriptorError::DuplicatePid(1),
            DescriptorError::NegativeArrival { pid: 4, arrival: -1 },
        ]
    );
    // First occurrence of a duplicated PID wins
    assert_eq!(engine.find_by_pid(1).unwrap().burst, 5);
}

#[test]
fn dispatch_records_first_start_and_completion() {
    let mut engine = loaded(&[ProcessSpec::new(1, 0, 5)]);

    assert_eq!(engine.dispatch(1, 2), Some(2));
    assert_eq!(engine.find_by_pid(1).unwrap().start_time, Some(0));
    assert_eq!(engine.find_by_pid(1).unwrap().state(), ProcessState::Started);

    assert_eq!(engine.dispatch(1, 2), Some(2));
    assert_eq!(engine.find_by_pid(1).unwrap().start_time, Some(0));

    // Clamped to the remaining tick
    assert_eq!(engine.dispatch(1, 10), Some(1));
    let p = engine.find_by_pid(1).unwrap();
    assert_eq!(p.remaining, 0);
    assert_eq!(p.completion_time, Some(5));
    assert_eq!(p.turnaround(), Some(5));
    assert_eq!(p.waiting(), Some(0));
    assert_eq!(p.response(), Some(0));
    assert_eq!(engine.now(), 5);
    assert!(engine.all_complete());

    assert_eq!(
        engine.trace().entries(),
        &[
            TraceEntry::new(Occupant::Process(1), 0, 2),
            TraceEntry::new(Occupant::Process(1), 2, 4),
            TraceEntry::new(Occupant::Process(1), 4, 5),
        ]
    );
}

#[test]
fn dispatch_misuse_changes_nothing() {
    let mut engine = loaded(&[ProcessSpec::new(1, 0, 2), ProcessSpec::new(2, 4, 1)]);

    assert_eq!(engine.dispatch(7, 1), None);
    assert_eq!(engine.dispatch(1, 0), None);
    // Not arrived yet
    assert_eq!(engine.dispatch(2, 1), None);
    assert_eq!(engine.now(), 0);
    assert!(engine.trace().is_empty());
    assert!(!engine.find_by_pid(2).unwrap().has_started());

    assert_eq!(engine.dispatch(1, 2), Some(2));
    // Already complete
    assert_eq!(engine.dispatch(1, 1), None);
    assert_eq!(engine.trace().len(), 1);
}

#[test]
fn advance_to_inserts_idle_only_forward() {
    let mut engine = loaded(&[ProcessSpec::new(1, 3, 2)]);

    engine.advance_to(0);
    assert!(engine.trace().is_empty());

    engine.advance_to(3);
    assert_eq!(engine.now(), 3);
    engine.advance_to(1);
    assert_eq!(engine.now(), 3);

    engine.dispatch(1, 2);
    assert_eq!(
        engine.trace().entries(),
        &[
            TraceEntry::new(Occupant::Idle, 0, 3),
            TraceEntry::new(Occupant::Process(1), 3, 5),
        ]
    );
    assert_eq!(engine.trace().idle_time(), 3);
    assert!((engine.trace().utilization() - 40.0).abs() < 1e-9);
}

#[test]
fn ready_set_and_next_arrival() {
    let mut engine = loaded(&[
        ProcessSpec::new(3, 2, 1),
        ProcessSpec::new(1, 0, 2),
        ProcessSpec::new(2, 5, 1),
    ]);

    assert_eq!(engine.ready_pids(0), vec![1]);
    assert_eq!(engine.ready_pids(2), vec![3, 1]);
    assert_eq!(engine.next_arrival_after(0), Some(2));
    assert_eq!(engine.next_arrival_after(2), Some(5));
    assert_eq!(engine.next_arrival_after(5), None);
    assert_eq!(engine.arrival_order(), vec![1, 3, 2]);

    engine.dispatch(1, 2);
    assert_eq!(engine.ready_pids(2), vec![3]);
    assert!(!engine.all_complete());
}

#[test]
fn reset_replays_from_scratch() {
    let mut engine = loaded(&[ProcessSpec::new(1, 1, 2), ProcessSpec::new(2, 0, 1)]);
    engine.dispatch(2, 1);
    engine.dispatch(1, 2);
    assert!(engine.all_complete());

    engine.reset();
    assert_eq!(engine.now(), 0);
    assert!(engine.trace().is_empty());
    for p in engine.processes() {
        assert_eq!(p.remaining, p.burst);
        assert_eq!(p.state(), ProcessState::Waiting);
        assert!(p.completion_time.is_none());
    }
}

#[test]
fn idle_until_next_arrival() {
    let mut engine = loaded(&[ProcessSpec::new(1, 4, 1)]);
    assert!(engine.idle_until_next_arrival());
    assert_eq!(engine.now(), 4);
    engine.dispatch(1, 1);
    assert!(!engine.idle_until_next_arrival());
    assert_eq!(engine.now(), 5);
}

#[test]
fn load_refuses_workload_past_clock_range() {
    let mut engine = loaded(&[ProcessSpec::new(9, 0, 1)]);
    let huge: Vec<ProcessSpec> = (1..=3).map(|pid| ProcessSpec::new(pid, 0, i64::MAX)).collect();

    for mode in [LoadMode::Strict, LoadMode::BestEffort] {
        assert_eq!(engine.load(&huge, mode), Err(SimError::HorizonOverflow));
    }
    assert!(engine.find_by_pid(9).is_some());
    assert!(matches!(
        Sim::new(&huge, SimConfig::default()),
        Err(SimError::HorizonOverflow)
    ));

    // Latest arrival plus total burst still fits
    let report = engine
        .load(&huge[..2], LoadMode::Strict)
        .unwrap();
    assert_eq!(report.loaded, 2);
}

#[test]
fn dispatch_refuses_to_wrap_clock() {
    let mut engine = loaded(&[ProcessSpec::new(1, 0, 5)]);
    engine.advance_to(Ticks::MAX);

    assert_eq!(engine.dispatch(1, 1), None);
    assert_eq!(engine.now(), Ticks::MAX);
    assert!(!engine.find_by_pid(1).unwrap().has_started());
}

#[test]
fn reset_rebuilds_records_from_descriptors() {
    let mut engine = loaded(&[ProcessSpec::new(1, 0, 3).with_name("Shell")]);
    engine.dispatch(1, 3);
    engine.reset();

    let p = engine.find_by_pid(1).unwrap();
    assert_eq!(p.name, "Shell");
    assert_eq!(p.remaining, 3);
    assert!(p.start_time.is_none());
    assert!(p.metrics.is_none());
    assert_eq!(engine.descriptors()[0], ProcessSpec::new(1, 0, 3).with_name("Shell"));
}
