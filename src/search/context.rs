//! Mutable state of one optimization run.

use super::engine::TrialPhase;
use super::queue::ActiveQueue;
use super::undo::{SwapRecord, UndoLog};
use crate::models::{Direction, NodeId, TspInstance};
use crate::tour::{HashTable, TourHash, TourStore};
use crate::trajectory::TrajectoryRecorder;

/// Search switches read by the engine on every trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Kick type of the run; 0 disables kicking.
    pub kick_type: usize,
    /// Maximum number of 2-opt moves per exchange; 0 means the node count.
    pub max_depth: usize,
    /// Whether the visited-tour table ends a trial.
    pub hashing: bool,
    /// Whether near edges are skipped as `(t1, t2)`.
    pub restricted_search: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            kick_type: 0,
            max_depth: 0,
            hashing: true,
            restricted_search: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Scratch {
    order: Vec<NodeId>,
    ids: Vec<NodeId>,
    costs: Vec<f64>,
}

/// Everything a run mutates, owned in one place.
///
/// The engine and exchange searches receive `&mut SolverContext` and read
/// the immutable instance separately.
#[derive(Debug, Clone)]
pub struct SolverContext {
    /// The current tour.
    pub tour: TourStore,
    /// Nodes that may still originate a move.
    pub queue: ActiveQueue,
    /// Moves made by the exchange in progress.
    pub undo: UndoLog,
    /// Per-node hash keys.
    pub keys: TourHash,
    /// Hash of the current tour.
    pub hash: u32,
    /// `(hash, cost)` pairs committed since the best tour last improved.
    /// Kept across trials; the solver resets it on a new best tour.
    pub table: HashTable,
    /// Decision recorder.
    pub recorder: TrajectoryRecorder,
    /// Running tour cost in unscaled units.
    pub cost: i64,
    /// Running penalty.
    pub penalty: i64,
    /// Current trial number, starting at 1.
    pub trial: usize,
    /// Search switches.
    pub params: SearchParams,
    /// Phase of the trial in progress.
    pub phase: TrialPhase,
    scratch: Scratch,
}

impl SolverContext {
    /// Creates a context over the identity tour of `keys`' dimension.
    pub fn new(dimension: usize, keys: TourHash, params: SearchParams) -> Self {
        Self {
            tour: TourStore::new(dimension),
            queue: ActiveQueue::new(dimension),
            undo: UndoLog::with_capacity(dimension),
            keys,
            hash: 0,
            table: HashTable::new(),
            recorder: TrajectoryRecorder::new(),
            cost: 0,
            penalty: 0,
            trial: 1,
            params,
            phase: TrialPhase::Initializing,
            scratch: Scratch::default(),
        }
    }

    /// Number of nodes.
    pub fn dimension(&self) -> usize {
        self.tour.dimension()
    }

    /// Makes the 2-opt move that replaces `(t1, t2)` and `(t3, t4)` by
    /// `(t2, t3)` and `(t4, t1)`, where `t2 = next(t1, dir)` and
    /// `t4 = prev(t3, dir)`.
    ///
    /// Either the `dir` path `t2..t4` or its complement `t3..t1` can be
    /// reversed to realize the move; the shorter one is. The move is logged
    /// for rollback and the tour hash is updated.
    pub fn two_opt_move(
        &mut self,
        t1: NodeId,
        t2: NodeId,
        t3: NodeId,
        t4: NodeId,
        dir: Direction,
    ) {
        debug_assert_eq!(self.tour.next(t1, dir), t2);
        debug_assert_eq!(self.tour.prev(t3, dir), t4);

        let n = self.dimension();
        let inner = self.succ_bounds(t2, t4, dir);
        let inner_len = self.tour.path_len(inner.0, inner.1);
        let (first, last) = if 2 * inner_len <= n {
            inner
        } else {
            self.succ_bounds(t3, t1, dir)
        };

        self.tour.reverse_segment(first, last);
        self.hash ^= self.keys.swap_delta(t1, t2, t3, t4);
        self.undo.push(SwapRecord {
            t1,
            t2,
            t3,
            t4,
            first,
            last,
        });
    }

    /// Bounds of the `succ` path that covers the `dir` path `from..to`.
    #[inline]
    fn succ_bounds(&self, from: NodeId, to: NodeId, dir: Direction) -> (NodeId, NodeId) {
        match dir {
            Direction::Forward => (from, to),
            Direction::Backward => (to, from),
        }
    }

    /// Undoes every logged move, newest first.
    pub fn rollback(&mut self) {
        while let Some(rec) = self.undo.pop() {
            self.tour.reverse_segment(rec.last, rec.first);
            self.hash ^= self.keys.swap_delta(rec.t1, rec.t2, rec.t3, rec.t4);
        }
    }

    /// Accepts every logged move: the endpoints become active and their
    /// committed links are refreshed.
    pub fn commit(&mut self) {
        while let Some(rec) = self.undo.pop() {
            for t in [rec.t1, rec.t2, rec.t3, rec.t4] {
                self.queue.activate(t);
                self.tour.store_old_links_of(t);
            }
        }
    }

    /// Mirrors the decision `(t1, t2)` with gain `g0` into the recorder.
    ///
    /// The state is the live tour from the first node, the running cost and
    /// the leading candidates of `t1`. Nothing is written when recording is
    /// off or the buffer is full.
    pub fn record_decision(&mut self, instance: &TspInstance, t1: NodeId, t2: NodeId, g0: i64) {
        if !self.recorder.is_enabled() || self.recorder.is_full() {
            return;
        }
        let precision = instance.precision() as f64;
        let width = self.recorder.max_candidates_per_step();

        let Scratch { order, ids, costs } = &mut self.scratch;
        self.tour.write_order(order);
        ids.clear();
        costs.clear();
        for c in instance.candidates(t1).iter().take(width) {
            ids.push(c.to);
            costs.push(c.cost as f64 / precision);
        }

        let state = self
            .recorder
            .record_state(t1, order, self.cost, ids, costs, ids.len());
        if state.is_recorded() {
            self.recorder.record_action(t2, g0 as f64 / precision);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::CostMatrix;

    fn context(order: &[NodeId]) -> SolverContext {
        let n = order.len();
        let keys = (1..=n as u32).map(|k| k.wrapping_mul(2654435761)).collect();
        let keys = TourHash::from_keys(keys);
        let mut ctx = SolverContext::new(n, keys, SearchParams::default());
        ctx.tour.relink(order).expect("valid order");
        ctx.hash = ctx.keys.of_tour(&ctx.tour);
        ctx
    }

    #[test]
    fn test_two_opt_move_forward() {
        let mut ctx = context(&[1, 2, 3, 4, 5, 6, 7, 8]);
        // Remove (1,2) and (4,5); add (2,5) and (4,1)
        ctx.two_opt_move(1, 2, 5, 4, Direction::Forward);
        assert!(ctx.tour.is_valid_cycle());
        assert_eq!(ctx.tour.order(), vec![1, 4, 3, 2, 5, 6, 7, 8]);
        assert_eq!(ctx.hash, ctx.keys.of_tour(&ctx.tour));
        assert_eq!(ctx.undo.len(), 1);
    }

    #[test]
    fn test_two_opt_move_reverses_shorter_side() {
        let mut ctx = context(&[1, 2, 3, 4, 5, 6, 7, 8]);
        // t2..t4 spans 2..7 (6 nodes); the complement 8..1 is reversed instead
        ctx.two_opt_move(1, 2, 8, 7, Direction::Forward);
        assert!(ctx.tour.is_valid_cycle());
        assert_eq!(ctx.tour.succ(8), 2);
        assert!(ctx.tour.succ(7) == 1 || ctx.tour.pred(7) == 1);
        assert!(ctx.tour.succ(2) == 3 || ctx.tour.pred(2) == 3);
        assert_eq!(ctx.hash, ctx.keys.of_tour(&ctx.tour));
    }

    #[test]
    fn test_two_opt_move_backward() {
        let mut ctx = context(&[1, 2, 3, 4, 5, 6]);
        // t2 = pred(1) = 6, t3 = 3, t4 = succ(3) = 4
        ctx.two_opt_move(1, 6, 3, 4, Direction::Backward);
        assert!(ctx.tour.is_valid_cycle());
        let adjacent = |a: NodeId, b: NodeId| ctx.tour.succ(a) == b || ctx.tour.pred(a) == b;
        assert!(adjacent(6, 3));
        assert!(adjacent(4, 1));
        assert!(!adjacent(1, 6));
        assert!(!adjacent(3, 4));
        assert_eq!(ctx.hash, ctx.keys.of_tour(&ctx.tour));
    }

    #[test]
    fn test_rollback_restores_tour_and_hash() {
        let mut ctx = context(&[1, 2, 3, 4, 5, 6, 7]);
        let hash = ctx.hash;
        ctx.two_opt_move(1, 2, 5, 4, Direction::Forward);
        let t2 = ctx.tour.next(1, Direction::Forward);
        if t2 == 4 {
            ctx.two_opt_move(1, 4, 7, 6, Direction::Forward);
        }
        ctx.rollback();
        assert!(ctx.undo.is_empty());
        assert_eq!(ctx.tour.order(), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(ctx.hash, hash);
        assert!(ctx.tour.is_valid_cycle());
    }

    #[test]
    fn test_commit_activates_endpoints() {
        let mut ctx = context(&[1, 2, 3, 4, 5, 6]);
        ctx.two_opt_move(1, 2, 4, 3, Direction::Forward);
        ctx.commit();
        assert!(ctx.undo.is_empty());
        for t in [1, 2, 3, 4] {
            assert!(ctx.queue.is_active(t));
            assert_eq!(ctx.tour.old_succ(t), ctx.tour.succ(t));
        }
        assert!(!ctx.queue.is_active(5));
    }

    #[test]
    fn test_record_decision() {
        let cm = CostMatrix::from_points(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let inst = TspInstance::new(cm).with_nearest_candidates(3);
        let mut ctx = context(&[1, 2, 3, 4]);
        ctx.cost = 4;
        ctx.recorder.initialize(4, 8, 2).expect("valid");

        // Disabled: nothing recorded
        ctx.record_decision(&inst, 1, 2, 200);
        assert_eq!(ctx.recorder.len(), 0);

        ctx.recorder.enable().expect("initialized");
        ctx.record_decision(&inst, 1, 2, 200);
        let step = ctx.recorder.step(0).expect("recorded");
        assert_eq!(step.origin, 1);
        assert_eq!(step.tour_snapshot, &[1, 2, 3, 4]);
        assert_eq!(step.tour_cost, 4);
        assert_eq!(step.candidate_count, 2);
        assert_eq!(step.candidate_ids, &[2, 4]);
        assert_eq!(step.candidate_costs, &[2.0, 2.0]);
        assert_eq!(step.chosen, 2);
        assert_eq!(step.gain, 2.0);
    }
}
