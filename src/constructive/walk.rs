//! Randomized restarts: candidate walks and double-bridge kicks.
//!
//! # Algorithm
//!
//! [`random_walk_tour`] grows a tour from a start node. At each step it
//! prefers an unvisited candidate that lies on the best tour with alpha 0,
//! then any unvisited candidate chosen at random, and finally any unvisited
//! node chosen at random.
//!
//! [`double_bridge`] cuts a tour into four parts `A B C D` and reconnects
//! them as `A C B D`. The result cannot be undone by a single sequential
//! 2-opt or 3-opt move, which makes it a good perturbation between trials.
//!
//! # Complexity
//!
//! The walk is O(n · k) for k candidates per node; the kick is O(n).
//!
//! # Reference
//!
//! Martin, O., Otto, S.W. & Felten, E.W. (1991). "Large-step Markov chains
//! for the traveling salesman problem", *Complex Systems* 5(3), 299-326.

use rand::Rng;

use crate::models::{NodeId, TspInstance};
use crate::tour::TourStore;

/// Builds a tour by a randomized walk over candidate edges.
///
/// `best` supplies the best tour so far, if any; its alpha-0 candidate
/// edges are followed first.
///
/// # Panics
///
/// Panics if `start` is outside `1..=dimension`.
///
/// # Examples
///
/// ```
/// use u_lkh::distance::CostMatrix;
/// use u_lkh::models::TspInstance;
/// use u_lkh::constructive::random_walk_tour;
///
/// let cm = CostMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let inst = TspInstance::new(cm).with_nearest_candidates(2);
/// let mut rng = u_numflow::random::create_rng(42);
///
/// let mut tour = random_walk_tour(&inst, None, 2, &mut rng);
/// assert_eq!(tour[0], 2);
/// tour.sort_unstable();
/// assert_eq!(tour, vec![1, 2, 3, 4]);
/// ```
pub fn random_walk_tour<R: Rng>(
    instance: &TspInstance,
    best: Option<&TourStore>,
    start: NodeId,
    rng: &mut R,
) -> Vec<NodeId> {
    let n = instance.dimension();
    assert!((1..=n).contains(&start), "start node {start} outside 1..={n}");

    let mut pool = Unvisited::new(n);
    let mut order = Vec::with_capacity(n);
    let mut choices = Vec::new();
    pool.take(start);
    order.push(start);

    let mut current = start;
    while !pool.is_empty() {
        let cands = instance.candidates(current);
        let next = cands
            .iter()
            .find(|c| {
                c.alpha == 0
                    && pool.contains(c.to)
                    && best.is_some_and(|b| b.in_best_tour(current, c.to))
            })
            .map(|c| c.to)
            .or_else(|| {
                choices.clear();
                choices.extend(cands.iter().map(|c| c.to).filter(|&to| pool.contains(to)));
                pick(&choices, rng)
            })
            .or_else(|| pick(&pool.nodes, rng));

        let Some(node) = next else {
            break;
        };
        pool.take(node);
        order.push(node);
        current = node;
    }

    order
}

/// Unvisited nodes with O(1) membership and removal.
struct Unvisited {
    nodes: Vec<NodeId>,
    position: Vec<Option<usize>>,
}

impl Unvisited {
    fn new(n: usize) -> Self {
        Self {
            nodes: (1..=n).collect(),
            position: (0..n).map(Some).collect(),
        }
    }

    fn contains(&self, node: NodeId) -> bool {
        self.position[node - 1].is_some()
    }

    fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn take(&mut self, node: NodeId) {
        let Some(i) = self.position[node - 1].take() else {
            return;
        };
        self.nodes.swap_remove(i);
        if let Some(&moved) = self.nodes.get(i) {
            self.position[moved - 1] = Some(i);
        }
    }
}

fn pick<R: Rng>(items: &[NodeId], rng: &mut R) -> Option<NodeId> {
    if items.is_empty() {
        return None;
    }
    let i = rng.random_range(0..items.len() as u64) as usize;
    Some(items[i])
}

/// Applies a random double-bridge kick to `order`.
///
/// Tours with fewer than 4 nodes are returned unchanged.
///
/// # Examples
///
/// ```
/// use u_lkh::constructive::double_bridge;
///
/// let mut rng = u_numflow::random::create_rng(42);
/// let order: Vec<usize> = (1..=8).collect();
/// let kicked = double_bridge(&order, &mut rng);
///
/// assert_eq!(kicked[0], 1);
/// assert_ne!(kicked, order);
/// ```
pub fn double_bridge<R: Rng>(order: &[NodeId], rng: &mut R) -> Vec<NodeId> {
    let n = order.len();
    if n < 4 {
        return order.to_vec();
    }
    let a = 1 + rng.random_range(0..(n - 3) as u64) as usize;
    let b = a + 1 + rng.random_range(0..(n - a - 2) as u64) as usize;
    let c = b + 1 + rng.random_range(0..(n - b - 1) as u64) as usize;

    let mut out = Vec::with_capacity(n);
    out.extend_from_slice(&order[..a]);
    out.extend_from_slice(&order[b..c]);
    out.extend_from_slice(&order[a..b]);
    out.extend_from_slice(&order[c..]);
    out
}
