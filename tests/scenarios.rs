use u_lkh::config::{SolverConfig, TrajectoryConfig};
use u_lkh::distance::CostMatrix;
use u_lkh::models::{Candidate, CandidateCatalog, TspInstance};
use u_lkh::trajectory::TrajectoryRecorder;
use u_lkh::{Solver, SolverError, TrajectoryError};

/// Five nodes whose only cheap cycle is 1-3-5-2-4-1 (unit edges); every
/// other edge costs 10.
fn pentagram() -> TspInstance {
    let mut cm = CostMatrix::new(5);
    for a in 1..=5 {
        for b in 1..=5 {
            if a != b {
                cm.set(a, b, 10);
            }
        }
    }
    for (a, b) in [(1, 3), (3, 5), (5, 2), (2, 4), (4, 1)] {
        cm.set(a, b, 1);
        cm.set(b, a, 1);
    }
    TspInstance::new(cm).with_nearest_candidates(4)
}

#[test]
fn test_pentagram_single_trial() {
    let inst = pentagram();
    let config = SolverConfig::default()
        .with_max_trials(1)
        .with_trajectory(TrajectoryConfig::new(50, 4));
    let mut solver = Solver::new(&inst, config).expect("valid");
    let report = solver.solve(Some(&[1, 2, 3, 4, 5][..])).expect("solved");

    assert!(report.cost < 50);
    assert!(report.improvements > 0);
    assert_eq!(report.trials, 1);

    let rec = solver.trajectory();
    assert!(!rec.is_empty());
    assert!(rec.len() <= 50);
    let first = rec.step(0).expect("recorded");
    assert_eq!(first.tour_snapshot, &[1, 2, 3, 4, 5]);
    assert_eq!(first.tour_cost, 50);
    assert_eq!(first.origin, 1);
    assert_eq!(first.chosen, 5);
    assert_eq!(first.gain, 10.0);
    assert_eq!(first.candidate_count, 4);
    assert_eq!(&first.candidate_costs[..2], &[1.0, 1.0]);

    let trajectory = solver.export_trajectory();
    assert_eq!(trajectory.final_cost, report.cost);
    assert_eq!(trajectory.dimension, 5);
    assert_eq!(trajectory.max_candidates_per_step, 4);
    assert_eq!(trajectory.states.len(), trajectory.actions.len());
    assert!(trajectory.states.iter().all(|s| s.tour_snapshot.len() == 5));
    assert!(trajectory.states.iter().all(|s| s.candidate_ids.len() == 4));
}

#[test]
fn test_more_trials_never_hurt() {
    let inst = pentagram();
    let run = |trials| {
        let config = SolverConfig::default().with_max_trials(trials);
        let mut solver = Solver::new(&inst, config).expect("valid");
        solver.solve(Some(&[1, 2, 3, 4, 5][..])).expect("solved")
    };
    let one = run(1);
    let five = run(5);
    assert!(five.cost <= one.cost);
    let cost: i64 = five.tour.windows(2).map(|w| inst.distance(w[0], w[1])).sum();
    assert_eq!(cost, five.cost);
}

#[test]
fn test_empty_candidate_set_fails_before_search() {
    let cm = CostMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let edge = |to| Candidate { to, cost: 100, alpha: 0 };
    let catalog = CandidateCatalog::from_lists(vec![
        vec![edge(2)],
        vec![edge(3)],
        Vec::new(),
        vec![edge(1)],
    ]);
    let inst = TspInstance::new(cm).with_candidates(catalog).expect("matching size");

    let err = Solver::new(&inst, SolverConfig::default()).err();
    assert!(matches!(err, Some(SolverError::EmptyCandidateSet { node: 3 })));
}

#[test]
fn test_zero_max_steps_rejected() {
    let mut rec = TrajectoryRecorder::new();
    let err = rec.initialize(5, 0, 4).err();
    assert!(matches!(err, Some(TrajectoryError::InvalidBounds { max_steps: 0, .. })));
    assert!(!rec.is_initialized());
    assert!(matches!(rec.enable(), Err(TrajectoryError::Uninitialized)));
    assert_eq!(rec.capacity(), 0);
}

#[test]
fn test_cleanup_twice() {
    let mut rec = TrajectoryRecorder::new();
    rec.initialize(5, 10, 4).expect("valid");
    rec.cleanup();
    rec.cleanup();
    assert_eq!(rec.capacity(), 0);
    assert_eq!(rec.max_candidates_per_step(), 0);
    assert!(rec.enable().is_err());
}

#[cfg(feature = "json")]
#[test]
fn test_trajectory_json_export() {
    let inst = pentagram();
    let config = SolverConfig::default()
        .with_max_trials(1)
        .with_trajectory(TrajectoryConfig::new(10, 4));
    let mut solver = Solver::new(&inst, config).expect("valid");
    solver.solve(Some(&[1, 2, 3, 4, 5][..])).expect("solved");

    let json = solver.export_trajectory().to_json().expect("serializable");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["dimension"], 5);
    assert!(value["states"].is_array());
    assert_eq!(value["states"][0]["tour_snapshot"], serde_json::json!([1, 2, 3, 4, 5]));
}
