//! Deep exchange search.
//!
//! # Algorithm
//!
//! Starting from the removed edge `(t1, t2)` with gain `G = C(t1, t2)`,
//! repeatedly extend a sequential chain of 2-opt moves:
//!
//! ```text
//! for each candidate t3 of last (not a tour neighbour of last):
//!     g1 = G - C(last, t3)              must be positive
//!     t4 = prev(t3, dir)                (t3, t4) neither fixed nor added
//!     g2 = g1 + C(t3, t4)
//!     if g2 - C(t4, t1) > 0: make the move, stop with gain g2 - C(t4, t1)
//! make the move with the largest g2, G = g2, last = t4, go deeper
//! ```
//!
//! Every move keeps the tour a single cycle, so the chain can be closed at
//! any level by the edge `(t4, t1)`. Edges added by the chain are never
//! removed again within the same search.
//!
//! # Complexity
//!
//! O(depth · k) candidate evaluations for k candidates per node, plus the
//! reversal cost of each move (at most n/2 nodes).
//!
//! # Reference
//!
//! Lin, S. & Kernighan, B.W. (1973). "An effective heuristic algorithm for
//! the traveling-salesman problem", *Operations Research* 21(2), 498-516.
//!
//! Helsgaun, K. (2000). "An effective implementation of the Lin-Kernighan
//! traveling salesman heuristic", *EJOR* 126(1), 106-130.

use super::SolverContext;
use crate::models::{Direction, NodeId, TspInstance};

/// Result of one exchange search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The tour was improved; the moves are still in the undo log.
    Improved {
        /// Reduction of the scaled tour cost.
        gain: i64,
        /// Reduction of the penalty.
        penalty_gain: i64,
    },
    /// No improving chain was found. Speculative moves remain in the undo
    /// log for the caller to roll back.
    Rejected,
}

/// A move search invoked for every `(t1, t2)` choice.
///
/// Implementations change the tour only through
/// [`SolverContext::two_opt_move`], so that the engine can commit or roll
/// back whatever they did.
pub trait ExchangeSearch {
    /// Searches for an improving exchange that removes `(t1, t2)`, where
    /// `g0 = C(t1, t2)`.
    fn search(
        &mut self,
        instance: &TspInstance,
        ctx: &mut SolverContext,
        t1: NodeId,
        t2: NodeId,
        g0: i64,
    ) -> ExchangeOutcome;
}

/// Variable-depth sequential 2-opt search (the classic LK step).
///
/// # Examples
///
/// ```
/// use u_lkh::distance::CostMatrix;
/// use u_lkh::models::TspInstance;
/// use u_lkh::search::{lin_kernighan, SearchParams, SequentialExchange, SolverContext};
/// use u_lkh::tour::TourHash;
///
/// // A square visited in crossing order 1, 3, 2, 4
/// let cm = CostMatrix::from_points(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
/// let inst = TspInstance::new(cm).with_nearest_candidates(3);
///
/// let keys = TourHash::from_keys(vec![3, 5, 7, 11]);
/// let mut ctx = SolverContext::new(4, keys, SearchParams::default());
/// ctx.tour.relink(&[1, 3, 2, 4]).unwrap();
///
/// let result = lin_kernighan(&inst, &mut ctx, &mut SequentialExchange::new());
/// assert_eq!(result.cost, 40);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SequentialExchange {
    added: Vec<(NodeId, NodeId)>,
}

impl SequentialExchange {
    /// Creates a search with an empty tabu list.
    pub fn new() -> Self {
        Self::default()
    }

    fn is_added(&self, a: NodeId, b: NodeId) -> bool {
        self.added
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }
}

impl ExchangeSearch for SequentialExchange {
    fn search(
        &mut self,
        instance: &TspInstance,
        ctx: &mut SolverContext,
        t1: NodeId,
        t2: NodeId,
        g0: i64,
    ) -> ExchangeOutcome {
        let max_depth = match ctx.params.max_depth {
            0 => ctx.dimension(),
            d => d,
        };
        let mut dir = if ctx.tour.succ(t1) == t2 {
            Direction::Forward
        } else {
            Direction::Backward
        };
        let mut last = t2;
        let mut gain = g0;
        self.added.clear();

        for _ in 0..max_depth {
            let mut best: Option<(NodeId, NodeId, i64)> = None;

            for cand in instance.candidates(last) {
                let t3 = cand.to;
                if t3 == last || t3 == ctx.tour.succ(last) || t3 == ctx.tour.pred(last) {
                    continue;
                }
                let g1 = gain - instance.cost(last, t3);
                if g1 <= 0 {
                    continue;
                }
                let t4 = ctx.tour.prev(t3, dir);
                if instance.is_fixed(t3, t4) || self.is_added(t3, t4) {
                    continue;
                }
                let g2 = g1 + instance.cost(t3, t4);
                let closed = g2 - instance.cost(t4, t1);
                if closed > 0 {
                    ctx.two_opt_move(t1, last, t3, t4, dir);
                    return ExchangeOutcome::Improved {
                        gain: closed,
                        penalty_gain: 0,
                    };
                }
                if best.map_or(true, |(_, _, g)| g2 > g) {
                    best = Some((t3, t4, g2));
                }
            }

            let Some((t3, t4, g2)) = best else {
                break;
            };
            ctx.two_opt_move(t1, last, t3, t4, dir);
            self.added.push((last, t3));
            if ctx.tour.next(t1, dir) != t4 {
                dir = dir.reversed();
            }
            gain = g2;
            last = t4;
        }

        ExchangeOutcome::Rejected
    }
}
