//! Symmetric TSP instance.

use super::{Candidate, CandidateCatalog, NodeId};
use crate::distance::CostMatrix;
use crate::error::{Result, SolverError};

/// Precision used when none is given, matching the usual LKH default.
pub const DEFAULT_PRECISION: i64 = 100;

/// A symmetric TSP instance as seen by the local search.
///
/// Holds the unscaled cost matrix together with the data produced by the
/// lower-bound computation: per-node penalties `pi`, the global `precision`
/// all costs are scaled by, the candidate catalog, and optionally the parent
/// of each node in the minimum 1-tree. Edges may also be fixed, in which case
/// the search never removes them.
///
/// The scaled edge cost is `C(a, b) = d(a, b) * precision + pi(a) + pi(b)`.
///
/// # Examples
///
/// ```
/// use u_lkh::distance::CostMatrix;
/// use u_lkh::models::TspInstance;
///
/// let cm = CostMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (6.0, 0.0)]);
/// let instance = TspInstance::new(cm).with_nearest_candidates(2);
///
/// assert_eq!(instance.dimension(), 3);
/// assert_eq!(instance.cost(1, 2), 500);
/// assert_eq!(instance.candidates(1).len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TspInstance {
    costs: CostMatrix,
    precision: i64,
    pi: Vec<i64>,
    candidates: CandidateCatalog,
    fixed: Vec<[Option<NodeId>; 2]>,
    tree_parent: Vec<Option<NodeId>>,
}

impl TspInstance {
    /// Creates an instance with precision 100, zero penalties, no fixed
    /// edges and an empty candidate catalog.
    pub fn new(costs: CostMatrix) -> Self {
        let n = costs.size();
        Self {
            costs,
            precision: DEFAULT_PRECISION,
            pi: vec![0; n],
            candidates: CandidateCatalog::new(n),
            fixed: vec![[None, None]; n],
            tree_parent: vec![None; n],
        }
    }

    /// Sets the cost scale factor. Values below 1 are clamped to 1.
    pub fn with_precision(mut self, precision: i64) -> Self {
        self.precision = precision.max(1);
        self
    }

    /// Sets the node penalties; `pi[0]` belongs to node 1.
    pub fn with_pi(mut self, pi: Vec<i64>) -> Result<Self> {
        if pi.len() != self.dimension() {
            return Err(SolverError::invalid_input(format!(
                "expected {} penalties, got {}",
                self.dimension(),
                pi.len()
            )));
        }
        self.pi = pi;
        Ok(self)
    }

    /// Replaces the candidate catalog.
    ///
    /// Every listed neighbour must be a node id other than its owner. The
    /// search takes edge gains from [`cost`](Self::cost); catalog costs are
    /// only reported.
    pub fn with_candidates(mut self, candidates: CandidateCatalog) -> Result<Self> {
        let n = self.dimension();
        if candidates.dimension() != n {
            return Err(SolverError::invalid_input(format!(
                "candidate catalog covers {} nodes, instance has {n}",
                candidates.dimension()
            )));
        }
        for from in 1..=n {
            for c in candidates.get(from) {
                self.check_node(c.to)?;
                if c.to == from {
                    return Err(SolverError::invalid_input(format!(
                        "node {from} lists itself as a candidate"
                    )));
                }
            }
        }
        self.candidates = candidates;
        Ok(self)
    }

    /// Builds a k-nearest candidate catalog from the current costs,
    /// penalties and precision.
    pub fn with_nearest_candidates(mut self, k: usize) -> Self {
        self.candidates = CandidateCatalog::nearest(&self.costs, &self.pi, self.precision, k);
        self
    }

    /// Fixes the edge `(a, b)` so that it is never removed from a tour.
    ///
    /// A node can take part in at most two fixed edges.
    pub fn with_fixed_edge(mut self, a: NodeId, b: NodeId) -> Result<Self> {
        self.check_node(a)?;
        self.check_node(b)?;
        for (from, to) in [(a, b), (b, a)] {
            let slots = &mut self.fixed[from - 1];
            match slots.iter_mut().find(|s| s.is_none()) {
                Some(slot) => *slot = Some(to),
                None => {
                    return Err(SolverError::invalid_input(format!(
                        "node {from} already has two fixed edges"
                    )))
                }
            }
        }
        Ok(self)
    }

    /// Sets the parent of every node in the minimum 1-tree; `parents[0]`
    /// belongs to node 1.
    pub fn with_tree_parents(mut self, parents: Vec<Option<NodeId>>) -> Result<Self> {
        if parents.len() != self.dimension() {
            return Err(SolverError::invalid_input(format!(
                "expected {} tree parents, got {}",
                self.dimension(),
                parents.len()
            )));
        }
        self.tree_parent = parents;
        Ok(self)
    }

    /// Number of nodes.
    pub fn dimension(&self) -> usize {
        self.costs.size()
    }

    /// Cost scale factor.
    pub fn precision(&self) -> i64 {
        self.precision
    }

    /// Penalty of `node`.
    #[inline]
    pub fn pi(&self, node: NodeId) -> i64 {
        self.pi[node - 1]
    }

    /// Unscaled edge cost.
    #[inline]
    pub fn distance(&self, a: NodeId, b: NodeId) -> i64 {
        self.costs.get(a, b)
    }

    /// Scaled edge cost `d(a, b) * precision + pi(a) + pi(b)`.
    #[inline]
    pub fn cost(&self, a: NodeId, b: NodeId) -> i64 {
        self.costs.get(a, b) * self.precision + self.pi[a - 1] + self.pi[b - 1]
    }

    /// Returns `true` if the cost matrix is symmetric.
    pub fn is_symmetric(&self) -> bool {
        self.costs.is_symmetric()
    }

    /// Candidate edges of `node`.
    #[inline]
    pub fn candidates(&self, node: NodeId) -> &[Candidate] {
        self.candidates.get(node)
    }

    /// The whole candidate catalog.
    pub fn catalog(&self) -> &CandidateCatalog {
        &self.candidates
    }

    /// Returns `true` if `(a, b)` is a fixed edge.
    #[inline]
    pub fn is_fixed(&self, a: NodeId, b: NodeId) -> bool {
        self.fixed[a - 1].contains(&Some(b))
    }

    /// Parent of `node` in the minimum 1-tree, if known.
    pub fn tree_parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree_parent[node - 1]
    }

    /// Returns `true` if `(a, b)` is an edge of the minimum 1-tree.
    pub fn in_tree(&self, a: NodeId, b: NodeId) -> bool {
        self.tree_parent(a) == Some(b) || self.tree_parent(b) == Some(a)
    }

    fn check_node(&self, node: NodeId) -> Result<()> {
        if node == 0 || node > self.dimension() {
            return Err(SolverError::invalid_input(format!(
                "node {node} outside 1..={}",
                self.dimension()
            )));
        }
        Ok(())
    }
}
