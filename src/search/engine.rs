//! One Lin-Kernighan trial.
//!
//! # Algorithm
//!
//! 1. Renumber ranks from the first node, compute the cost and hash of the
//!    starting tour and activate its nodes.
//! 2. Pop an active node `t1`. For `t2` in (`pred(t1)`, `succ(t1)`), skip
//!    fixed edges and, under restricted search, near edges. Otherwise
//!    record the decision, run the exchange search with `g0 = C(t1, t2)`
//!    and either commit its moves (on positive gain or penalty gain) or roll
//!    them back.
//! 3. After a commit, stop if the `(hash, cost)` pair was already reached;
//!    otherwise remember it, reactivate `t1` and continue with the next
//!    active node.
//! 4. When the queue is empty (or the trial converged), renumber ranks and
//!    return the cost.
//!
//! # Complexity
//!
//! Each iteration costs one exchange search. The number of iterations is
//! bounded by the number of improvements, since every improvement lowers
//! the cost and a failed node stays passive until a later move touches it.

use super::exchange::{ExchangeOutcome, ExchangeSearch};
use super::SolverContext;
use crate::models::{NodeId, TspInstance};

/// Phase of the trial in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrialPhase {
    /// Computing the starting cost and hash, seeding the queue.
    #[default]
    Initializing,
    /// Popping active nodes and running exchange searches.
    Searching,
    /// An improving exchange was just committed.
    Improved,
    /// A committed tour matched one already reached this trial.
    Converged,
    /// Renumbering ranks before returning.
    Finalizing,
}

/// Summary of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialResult {
    /// Tour cost at the end of the trial, in unscaled units.
    pub cost: i64,
    /// Penalty at the end of the trial.
    pub penalty: i64,
    /// Number of committed exchanges.
    pub improvements: usize,
    /// Whether the trial ended on a revisited tour.
    pub converged: bool,
}

/// Runs one trial from the current tour of `ctx` until no active node
/// remains or the trial converges.
///
/// The tour, its cost, hash and penalty in `ctx` are updated in place.
pub fn lin_kernighan<E>(
    instance: &TspInstance,
    ctx: &mut SolverContext,
    exchange: &mut E,
) -> TrialResult
where
    E: ExchangeSearch + ?Sized,
{
    ctx.phase = TrialPhase::Initializing;
    initialize_trial(instance, ctx);
    log::debug!(
        "search.trial: trial={} cost={} active={}",
        ctx.trial,
        ctx.cost,
        ctx.queue.len()
    );

    let precision = instance.precision();
    let mut improvements = 0;
    let mut converged = false;
    ctx.phase = TrialPhase::Searching;

    'nodes: while let Some(t1) = ctx.queue.remove_first() {
        let succ_t1 = ctx.tour.succ(t1);
        for t2 in [ctx.tour.pred(t1), succ_t1] {
            if instance.is_fixed(t1, t2) || is_restricted(instance, ctx, t1, t2) {
                continue;
            }
            let g0 = instance.cost(t1, t2);
            ctx.record_decision(instance, t1, t2, g0);

            match exchange.search(instance, ctx, t1, t2, g0) {
                ExchangeOutcome::Improved { gain, penalty_gain }
                    if gain > 0 || penalty_gain > 0 =>
                {
                    debug_assert_eq!(gain % precision, 0);
                    ctx.phase = TrialPhase::Improved;
                    ctx.cost -= gain / precision;
                    ctx.penalty -= penalty_gain;
                    ctx.commit();
                    improvements += 1;
                    debug_assert!(ctx.tour.is_valid_cycle());
                    log::trace!(
                        "search.improve: t1={t1} t2={t2} gain={} cost={}",
                        gain / precision,
                        ctx.cost
                    );

                    if ctx.params.hashing {
                        if ctx.table.search(ctx.hash, ctx.cost) {
                            ctx.phase = TrialPhase::Converged;
                            converged = true;
                            break 'nodes;
                        }
                        ctx.table.insert(ctx.hash, ctx.cost);
                    }
                    ctx.queue.activate(t1);
                    ctx.phase = TrialPhase::Searching;
                    break;
                }
                _ => ctx.rollback(),
            }
        }
    }

    ctx.phase = TrialPhase::Finalizing;
    ctx.tour.normalize_ranks();
    log::debug!(
        "search.trial_done: trial={} cost={} improvements={improvements} converged={converged}",
        ctx.trial,
        ctx.cost
    );

    TrialResult {
        cost: ctx.cost,
        penalty: ctx.penalty,
        improvements,
        converged,
    }
}

fn initialize_trial(instance: &TspInstance, ctx: &mut SolverContext) {
    ctx.undo.clear();
    ctx.queue.clear();
    ctx.tour.normalize_ranks();
    ctx.tour.store_old_links();
    ctx.cost = ctx.tour.recompute_cost(instance);
    ctx.hash = ctx.keys.of_tour(&ctx.tour);
    ctx.penalty = 0;

    let skip_best_edges = ctx.params.kick_type > 0 && ctx.trial > 1 && ctx.tour.has_best();
    let first = ctx.tour.first();
    let mut t = first;
    loop {
        let in_best = skip_best_edges
            && ctx.tour.in_best_tour(t, ctx.tour.pred(t))
            && ctx.tour.in_best_tour(t, ctx.tour.succ(t));
        if !in_best {
            ctx.queue.activate(t);
        }
        t = ctx.tour.succ(t);
        if t == first {
            break;
        }
    }
}

/// A near edge is one of the best tour once a best tour exists, and one of
/// the minimum 1-tree before that.
fn is_restricted(instance: &TspInstance, ctx: &SolverContext, t1: NodeId, t2: NodeId) -> bool {
    if !ctx.params.restricted_search || (ctx.trial > 1 && ctx.params.kick_type > 0) {
        return false;
    }
    if ctx.tour.has_best() {
        ctx.tour.in_best_tour(t1, t2)
    } else {
        instance.in_tree(t1, t2)
    }
}
