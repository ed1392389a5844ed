use proptest::prelude::*;

use u_lkh::config::SolverConfig;
use u_lkh::distance::CostMatrix;
use u_lkh::models::{NodeId, TspInstance};
use u_lkh::tour::TourStore;
use u_lkh::trajectory::{RecordStatus, Rejection, TrajectoryRecorder};
use u_lkh::Solver;

fn tour_and_bounds() -> impl Strategy<Value = (Vec<NodeId>, NodeId, NodeId)> {
    (3usize..40).prop_flat_map(|n| {
        (
            Just((1..=n).collect::<Vec<NodeId>>()).prop_shuffle(),
            1..=n,
            1..=n,
        )
    })
}

fn points() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0f64..100.0, 0.0f64..100.0), 5..25)
}

fn cycle_cost(inst: &TspInstance, order: &[NodeId]) -> i64 {
    let n = order.len();
    (0..n)
        .map(|i| inst.distance(order[i], order[(i + 1) % n]))
        .sum()
}

proptest! {
    #[test]
    fn reversal_keeps_a_valid_cycle((order, a, b) in tour_and_bounds()) {
        let mut tour = TourStore::from_order(&order).unwrap();
        tour.reverse_segment(a, b);
        prop_assert!(tour.is_valid_cycle());
    }

    #[test]
    fn reversal_is_self_inverse((order, a, b) in tour_and_bounds()) {
        let mut tour = TourStore::from_order(&order).unwrap();
        let before = tour.order();
        let ranks: Vec<usize> = (1..=order.len()).map(|id| tour.rank(id)).collect();

        tour.reverse_segment(a, b);
        tour.reverse_segment(b, a);

        prop_assert_eq!(tour.order(), before);
        let after: Vec<usize> = (1..=order.len()).map(|id| tour.rank(id)).collect();
        prop_assert_eq!(after, ranks);
    }

    #[test]
    fn solve_never_worsens_the_start_tour(pts in points(), seed in 0u64..1000) {
        let n = pts.len();
        let inst = TspInstance::new(CostMatrix::from_points(&pts)).with_nearest_candidates(5);
        let initial: Vec<NodeId> = (1..=n).collect();
        let start_cost = cycle_cost(&inst, &initial);

        let config = SolverConfig::default().with_max_trials(3).with_seed(seed);
        let mut solver = Solver::new(&inst, config).unwrap();
        let report = solver.solve(Some(initial.as_slice())).unwrap();

        prop_assert!(report.cost <= start_cost);
        prop_assert_eq!(report.tour.len(), n + 1);
        prop_assert_eq!(report.cost, cycle_cost(&inst, &report.tour[..n]));
        prop_assert_eq!(solver.context().tour.recompute_cost(&inst), report.cost);

        let mut sorted = report.tour[..n].to_vec();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, initial);
    }

    #[test]
    fn recorder_never_exceeds_capacity(max_steps in 1usize..20, calls in 0usize..40) {
        let mut rec = TrajectoryRecorder::new();
        rec.initialize(4, max_steps, 2).unwrap();
        rec.enable().unwrap();

        for i in 0..calls {
            let status = rec.record_state(1, &[1, 2, 3, 4], i as i64, &[2, 3, 4], &[1.0, 2.0, 3.0], 3);
            if i < max_steps {
                prop_assert!(status.is_recorded());
                prop_assert!(rec.record_action(2, 1.0).is_recorded());
            } else {
                prop_assert_eq!(status, RecordStatus::Rejected(Rejection::Full));
            }
        }
        prop_assert_eq!(rec.len(), calls.min(max_steps));
        prop_assert!(rec.steps().all(|s| s.candidate_count == 2));
    }
}
