//! Run controller: repeated Lin-Kernighan trials with best-so-far tracking.
//!
//! # Algorithm
//!
//! 1. Trial 1 starts from the initial tour (given, or nearest-neighbor from
//!    node 1).
//! 2. Every later trial picks a random first node and starts either from a
//!    double-bridge kick of the best tour (`kick_type > 0`) or from a random
//!    walk over candidate edges that follows alpha-0 best-tour edges.
//! 3. A trial result replaces the best one if its penalty is lower, or its
//!    penalty is equal and its cost is lower. The best tour is then recorded
//!    and the visited-tour table is reset to hold only that tour.
//! 4. Before every trial but the first the wall-clock budget is checked.
//! 5. After the last trial the tour is relinked to the best tour.
//!
//! # Reference
//!
//! Helsgaun, K. (2000). "An effective implementation of the Lin-Kernighan
//! traveling salesman heuristic", *EJOR* 126(1), 106-130.

use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;

use crate::config::SolverConfig;
use crate::constructive::{double_bridge, nearest_neighbor_tour, random_walk_tour};
use crate::error::{Result, SolverError};
use crate::models::{NodeId, TspInstance};
use crate::search::{
    lin_kernighan, ExchangeSearch, SearchParams, SequentialExchange, SolverContext,
};
use crate::tour::TourHash;
use crate::trajectory::{Trajectory, TrajectoryRecorder};

/// Outcome of [`Solver::solve`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveReport {
    /// Cost of the best tour, in unscaled units.
    pub cost: i64,
    /// Penalty of the best tour.
    pub penalty: i64,
    /// Number of trials run.
    pub trials: usize,
    /// Committed exchanges over all trials.
    pub improvements: usize,
    /// Best tour, `dimension + 1` ids with the first repeated at the end.
    pub tour: Vec<NodeId>,
    /// Wall-clock time spent in `solve`.
    pub elapsed: Duration,
}

/// Lin-Kernighan optimizer for one instance.
///
/// # Examples
///
/// ```
/// use u_lkh::config::SolverConfig;
/// use u_lkh::distance::CostMatrix;
/// use u_lkh::models::TspInstance;
/// use u_lkh::Solver;
///
/// let pts = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (5.0, 12.0)];
/// let inst = TspInstance::new(CostMatrix::from_points(&pts)).with_nearest_candidates(4);
///
/// let mut solver = Solver::new(&inst, SolverConfig::default().with_max_trials(3)).unwrap();
/// let report = solver.solve(Some(&[1, 3, 2, 4, 5][..])).unwrap();
///
/// assert_eq!(report.tour.len(), 6);
/// assert_eq!(report.tour.first(), report.tour.last());
/// // The crossing start tour costs 56
/// assert!(report.cost <= 56);
/// ```
#[derive(Debug)]
pub struct Solver<'a, E = SequentialExchange> {
    instance: &'a TspInstance,
    config: SolverConfig,
    ctx: SolverContext,
    exchange: E,
    initial: Option<Vec<NodeId>>,
    best_order: Option<Vec<NodeId>>,
    better_cost: i64,
    better_penalty: i64,
    trials: usize,
    improvements: usize,
}

impl<'a> Solver<'a> {
    /// Creates a solver using [`SequentialExchange`] as the move search.
    ///
    /// # Errors
    ///
    /// See [`Solver::with_exchange`].
    pub fn new(instance: &'a TspInstance, config: SolverConfig) -> Result<Self> {
        Self::with_exchange(instance, config, SequentialExchange::new())
    }
}

impl<'a, E: ExchangeSearch> Solver<'a, E> {
    /// Creates a solver with a custom move search.
    ///
    /// # Errors
    ///
    /// - [`SolverError::InvalidDimension`] for fewer than 3 nodes.
    /// - [`SolverError::InvalidInput`] for an asymmetric cost matrix.
    /// - [`SolverError::EmptyCandidateSet`] if candidates are required,
    ///   trials are requested and some node has none.
    /// - [`SolverError::Trajectory`] if the trajectory buffer cannot be set up.
    pub fn with_exchange(
        instance: &'a TspInstance,
        config: SolverConfig,
        exchange: E,
    ) -> Result<Self> {
        let n = instance.dimension();
        if n < 3 {
            return Err(SolverError::InvalidDimension(n));
        }
        if !instance.is_symmetric() {
            return Err(SolverError::invalid_input("cost matrix is not symmetric"));
        }
        if config.require_candidates && config.max_trials != Some(0) {
            if let Some(node) = instance.catalog().first_empty() {
                return Err(SolverError::EmptyCandidateSet { node });
            }
        }

        let mut rng = u_numflow::random::create_rng(config.seed);
        let keys = TourHash::new(n, &mut rng);
        let params = SearchParams {
            kick_type: config.kick_type,
            max_depth: config.max_depth,
            hashing: config.hashing,
            restricted_search: config.restricted_search,
        };
        let mut ctx = SolverContext::new(n, keys, params);
        if let Some(t) = config.trajectory {
            ctx.recorder.initialize(n, t.max_steps, t.max_candidates_per_step)?;
            ctx.recorder.enable()?;
        }

        Ok(Self {
            instance,
            config,
            ctx,
            exchange,
            initial: None,
            best_order: None,
            better_cost: i64::MAX,
            better_penalty: i64::MAX,
            trials: 0,
            improvements: 0,
        })
    }

    /// Sets the tour that trial 1 starts from.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidTour`] unless `order` is a permutation of
    /// `1..=dimension`.
    pub fn set_initial_tour(&mut self, order: &[NodeId]) -> Result<()> {
        self.ctx.tour.relink(order)?;
        self.initial = Some(order.to_vec());
        Ok(())
    }

    /// Runs the next trial and returns its cost.
    pub fn run_trial(&mut self) -> Result<i64> {
        let trial = self.trials + 1;
        self.ctx.trial = trial;
        let mut rng = u_numflow::random::create_rng(self.config.seed.wrapping_add(trial as u64));
        self.choose_start(trial, &mut rng)?;

        let result = lin_kernighan(self.instance, &mut self.ctx, &mut self.exchange);
        self.trials = trial;
        self.improvements += result.improvements;

        if result.penalty < self.better_penalty
            || (result.penalty == self.better_penalty && result.cost < self.better_cost)
        {
            log::info!(
                "solver.better: trial={trial} cost={} penalty={}",
                result.cost,
                result.penalty
            );
            self.record_better(result.cost, result.penalty);
        } else {
            log::debug!("solver.trial: trial={trial} cost={}", result.cost);
        }
        Ok(result.cost)
    }

    /// Runs up to `max_trials` trials (one per node by default) and leaves
    /// the best tour in place.
    ///
    /// `initial`, if given, replaces any tour set by
    /// [`set_initial_tour`](Self::set_initial_tour).
    pub fn solve(&mut self, initial: Option<&[NodeId]>) -> Result<SolveReport> {
        let start = Instant::now();
        if let Some(order) = initial {
            self.set_initial_tour(order)?;
        }
        let max_trials = self.config.max_trials.unwrap_or(self.instance.dimension());
        let deadline = self
            .config
            .time_limit_secs
            .map(|secs| Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX));
        log::info!(
            "solver.start: dimension={} max_trials={max_trials} seed={}",
            self.instance.dimension(),
            self.config.seed
        );

        if max_trials == 0 {
            let order = self.initial_order();
            self.ctx.tour.relink(&order)?;
            self.ctx.cost = self.ctx.tour.recompute_cost(self.instance);
            self.ctx.hash = self.ctx.keys.of_tour(&self.ctx.tour);
            self.ctx.penalty = 0;
            self.record_better(self.ctx.cost, 0);
        }

        for _ in 0..max_trials {
            if self.trials > 0 && deadline.is_some_and(|limit| start.elapsed() >= limit) {
                log::info!("solver.deadline: trials={}", self.trials);
                break;
            }
            self.run_trial()?;
        }

        self.restore_best()?;
        let report = SolveReport {
            cost: self.better_cost,
            penalty: self.better_penalty,
            trials: self.trials,
            improvements: self.improvements,
            tour: self.best_tour(),
            elapsed: start.elapsed(),
        };
        log::info!(
            "solver.done: cost={} trials={} elapsed_ms={}",
            report.cost,
            report.trials,
            report.elapsed.as_millis()
        );
        Ok(report)
    }

    /// Best tour found so far as `dimension + 1` ids, first id repeated.
    /// Before any trial this is the current tour.
    pub fn best_tour(&self) -> Vec<NodeId> {
        let mut tour = self
            .best_order
            .clone()
            .unwrap_or_else(|| self.ctx.tour.order());
        if let Some(&first) = tour.first() {
            tour.push(first);
        }
        tour
    }

    /// Cost of the best tour, if a trial has completed.
    pub fn best_cost(&self) -> Option<i64> {
        self.best_order.as_ref().map(|_| self.better_cost)
    }

    /// Number of trials run so far.
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// The run state.
    pub fn context(&self) -> &SolverContext {
        &self.ctx
    }

    /// The decision recorder.
    pub fn trajectory(&self) -> &TrajectoryRecorder {
        &self.ctx.recorder
    }

    /// The decision recorder, for enabling, disabling or reinitializing it
    /// between trials.
    pub fn trajectory_mut(&mut self) -> &mut TrajectoryRecorder {
        &mut self.ctx.recorder
    }

    /// Copies the recorded decisions out, tagged with the best cost.
    pub fn export_trajectory(&self) -> Trajectory {
        let cost = self.best_cost().unwrap_or(self.ctx.cost);
        self.ctx.recorder.to_trajectory(cost)
    }

    fn initial_order(&self) -> Vec<NodeId> {
        self.initial
            .clone()
            .unwrap_or_else(|| nearest_neighbor_tour(self.instance, 1))
    }

    fn choose_start<R: Rng>(&mut self, trial: usize, rng: &mut R) -> Result<()> {
        let Some(best) = self.best_order.as_deref().filter(|_| trial > 1) else {
            let order = self.initial_order();
            return self.ctx.tour.relink(&order);
        };

        let n = self.instance.dimension();
        let first = 1 + rng.random_range(0..n as u64) as usize;
        let order = if self.config.kick_type > 0 {
            double_bridge(best, rng)
        } else {
            random_walk_tour(self.instance, Some(&self.ctx.tour), first, rng)
        };
        self.ctx.tour.relink(&order)?;
        self.ctx.tour.set_first(first);
        Ok(())
    }

    fn record_better(&mut self, cost: i64, penalty: i64) {
        self.better_cost = cost;
        self.better_penalty = penalty;
        self.ctx.tour.record_best();
        self.best_order = Some(self.ctx.tour.order());
        if self.config.hashing {
            self.ctx.table.clear();
            self.ctx.table.insert(self.ctx.hash, cost);
        }
    }

    fn restore_best(&mut self) -> Result<()> {
        let Some(order) = self.best_order.as_deref() else {
            return Ok(());
        };
        self.ctx.tour.relink(order)?;
        self.ctx.tour.store_old_links();
        self.ctx.cost = self.better_cost;
        self.ctx.penalty = self.better_penalty;
        self.ctx.hash = self.ctx.keys.of_tour(&self.ctx.tour);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrajectoryConfig;
    use crate::distance::CostMatrix;
    use crate::error::TrajectoryError;

    fn circle(n: usize) -> TspInstance {
        let pts: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let a = i as f64 * std::f64::consts::TAU / n as f64;
                (100.0 * a.cos(), 100.0 * a.sin())
            })
            .collect();
        TspInstance::new(CostMatrix::from_points(&pts)).with_nearest_candidates(5)
    }

    fn scrambled(n: usize) -> Vec<NodeId> {
        // Visits every node, stepping by a stride coprime to n
        (0..n).map(|i| (i * 5) % n + 1).collect()
    }

    fn tour_cost(inst: &TspInstance, tour: &[NodeId]) -> i64 {
        tour.windows(2).map(|w| inst.distance(w[0], w[1])).sum()
    }

    #[test]
    fn test_rejects_small_dimension() {
        let inst = TspInstance::new(CostMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0)]));
        let err = Solver::new(&inst, SolverConfig::default()).err();
        assert!(matches!(err, Some(SolverError::InvalidDimension(2))));
    }

    #[test]
    fn test_rejects_asymmetric_costs() {
        let mut cm = CostMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        cm.set(1, 2, 5);
        let inst = TspInstance::new(cm).with_nearest_candidates(2);
        let err = Solver::new(&inst, SolverConfig::default()).err();
        assert!(matches!(err, Some(SolverError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_candidates_rejected() {
        let inst = TspInstance::new(CostMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]));
        let err = Solver::new(&inst, SolverConfig::default()).err();
        assert!(matches!(err, Some(SolverError::EmptyCandidateSet { node: 1 })));

        let config = SolverConfig::default().with_require_candidates(false);
        assert!(Solver::new(&inst, config).is_ok());
    }

    #[test]
    fn test_zero_trials_keeps_initial_tour() {
        let inst = TspInstance::new(CostMatrix::from_points(&[
            (0.0, 0.0),
            (10.0, 10.0),
            (10.0, 0.0),
            (0.0, 10.0),
        ]));
        let mut solver = Solver::new(&inst, SolverConfig::default().with_max_trials(0)).expect("valid");
        let report = solver.solve(Some(&[1, 2, 3, 4][..])).expect("solved");
        assert_eq!(report.trials, 0);
        assert_eq!(report.tour, vec![1, 2, 3, 4, 1]);
        assert_eq!(report.cost, tour_cost(&inst, &report.tour));
    }

    #[test]
    fn test_solve_improves_scrambled_circle() {
        let inst = circle(12);
        let initial = scrambled(12);
        let mut start = initial.clone();
        start.push(initial[0]);
        let start_cost = tour_cost(&inst, &start);

        let mut solver = Solver::new(&inst, SolverConfig::default().with_max_trials(4)).expect("valid");
        let report = solver.solve(Some(initial.as_slice())).expect("solved");

        assert!(report.cost < start_cost);
        assert_eq!(report.cost, tour_cost(&inst, &report.tour));
        assert_eq!(report.tour.len(), 13);
        assert_eq!(report.tour.first(), report.tour.last());
        assert!(solver.context().tour.is_valid_cycle());
        assert_eq!(solver.context().tour.recompute_cost(&inst), report.cost);
        assert_eq!(solver.best_cost(), Some(report.cost));
    }

    #[test]
    fn test_same_seed_same_result() {
        let inst = circle(15);
        let config = SolverConfig::default().with_max_trials(5).with_seed(11);
        let a = Solver::new(&inst, config.clone()).expect("valid").solve(None).expect("solved");
        let b = Solver::new(&inst, config).expect("valid").solve(None).expect("solved");
        assert_eq!(a.tour, b.tour);
        assert_eq!(a.cost, b.cost);
    }

    #[test]
    fn test_kicked_trials() {
        let inst = circle(16);
        let config = SolverConfig::default().with_max_trials(6).with_kick_type(1);
        let mut solver = Solver::new(&inst, config).expect("valid");
        let report = solver.solve(Some(scrambled(16).as_slice())).expect("solved");
        assert_eq!(report.trials, 6);
        assert_eq!(report.cost, tour_cost(&inst, &report.tour));
    }

    #[test]
    fn test_run_trial_never_worsens_best() {
        let inst = circle(10);
        let mut solver = Solver::new(&inst, SolverConfig::default()).expect("valid");
        solver.set_initial_tour(&scrambled(10)).expect("valid");
        let mut best = i64::MAX;
        for _ in 0..4 {
            let cost = solver.run_trial().expect("trial");
            best = best.min(cost);
            assert_eq!(solver.best_cost(), Some(best));
        }
        assert_eq!(solver.trials(), 4);
    }

    #[test]
    fn test_zero_time_limit_runs_one_trial() {
        let inst = circle(10);
        let config = SolverConfig::default()
            .with_max_trials(10)
            .with_time_limit_secs(0.0);
        let report = Solver::new(&inst, config).expect("valid").solve(None).expect("solved");
        assert_eq!(report.trials, 1);
    }

    #[test]
    fn test_records_trajectory() {
        let inst = circle(8);
        let config = SolverConfig::default()
            .with_max_trials(2)
            .with_trajectory(TrajectoryConfig::new(30, 3));
        let mut solver = Solver::new(&inst, config).expect("valid");
        let report = solver.solve(Some(scrambled(8).as_slice())).expect("solved");

        let rec = solver.trajectory();
        assert!(!rec.is_empty());
        assert!(rec.len() <= 30);
        let step = rec.step(0).expect("recorded");
        assert_eq!(step.tour_snapshot, scrambled(8).as_slice());
        assert_eq!(step.candidate_ids.len(), 3);

        let exported = solver.export_trajectory();
        assert_eq!(exported.final_cost, report.cost);
        assert_eq!(exported.recorded_steps, rec.len());
    }

    #[test]
    fn test_invalid_trajectory_bounds() {
        let inst = circle(6);
        let config = SolverConfig::default().with_trajectory(TrajectoryConfig::new(0, 4));
        let err = Solver::new(&inst, config).err();
        assert!(matches!(
            err,
            Some(SolverError::Trajectory(TrajectoryError::InvalidBounds { max_steps: 0, .. }))
        ));
    }

    #[test]
    fn test_invalid_initial_tour() {
        let inst = circle(5);
        let mut solver = Solver::new(&inst, SolverConfig::default()).expect("valid");
        let err = solver.solve(Some(&[1, 2, 2, 4, 5][..])).err();
        assert!(matches!(err, Some(SolverError::InvalidTour(_))));
    }
}
