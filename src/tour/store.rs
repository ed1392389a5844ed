//! Doubly linked tour with positional ranks.
//!
//! # Representation
//!
//! Nodes live in a flat arena indexed by `id - 1`. Each record carries the
//! current `pred`/`succ` links, a cyclic rank, the links at the last commit
//! (`old_pred`/`old_succ`) and the links of the best tour seen so far. There
//! is no global reversal flag: callers pass an explicit [`Direction`].
//!
//! # Complexity
//!
//! Queries are O(1). [`TourStore::reverse_segment`] costs O(path length),
//! and [`TourStore::relink`] / [`TourStore::normalize_ranks`] cost O(n).

use crate::error::{Result, SolverError};
use crate::models::{Direction, NodeId, TspInstance};

#[derive(Debug, Clone, Copy, Default)]
struct TourNode {
    pred: NodeId,
    succ: NodeId,
    rank: usize,
    old_pred: NodeId,
    old_succ: NodeId,
    best_pred: Option<NodeId>,
    best_succ: Option<NodeId>,
}

/// The current cyclic tour of one optimization run.
///
/// # Examples
///
/// ```
/// use u_lkh::tour::TourStore;
///
/// let mut tour = TourStore::from_order(&[1, 2, 3, 4, 5]).unwrap();
/// tour.reverse_segment(2, 4);
/// assert_eq!(tour.order(), vec![1, 4, 3, 2, 5]);
///
/// // Reversing the same span again with swapped bounds restores it
/// tour.reverse_segment(4, 2);
/// assert_eq!(tour.order(), vec![1, 2, 3, 4, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct TourStore {
    nodes: Vec<TourNode>,
    first: NodeId,
}

impl TourStore {
    /// Creates the identity tour `1, 2, ..., dimension`.
    ///
    /// # Panics
    ///
    /// Panics if `dimension` is zero.
    pub fn new(dimension: usize) -> Self {
        assert!(dimension > 0, "a tour needs at least one node");
        let mut tour = Self {
            nodes: vec![TourNode::default(); dimension],
            first: 1,
        };
        for id in 1..=dimension {
            let succ = if id == dimension { 1 } else { id + 1 };
            tour.link(id, succ);
        }
        tour.normalize_ranks();
        tour.store_old_links();
        tour
    }

    /// Creates a tour that visits `order` in sequence.
    pub fn from_order(order: &[NodeId]) -> Result<Self> {
        if order.is_empty() {
            return Err(SolverError::invalid_tour("tour is empty"));
        }
        let mut tour = Self::new(order.len());
        tour.relink(order)?;
        tour.store_old_links();
        Ok(tour)
    }

    /// Number of nodes.
    pub fn dimension(&self) -> usize {
        self.nodes.len()
    }

    /// The anchor node that traversals and rank numbering start from.
    pub fn first(&self) -> NodeId {
        self.first
    }

    /// Moves the anchor to `node` and renumbers ranks from it.
    pub fn set_first(&mut self, node: NodeId) {
        self.first = node;
        self.normalize_ranks();
    }

    #[inline]
    fn node(&self, id: NodeId) -> &TourNode {
        &self.nodes[id - 1]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut TourNode {
        &mut self.nodes[id - 1]
    }

    #[inline]
    fn link(&mut self, a: NodeId, b: NodeId) {
        self.node_mut(a).succ = b;
        self.node_mut(b).pred = a;
    }

    /// Successor of `node`.
    #[inline]
    pub fn succ(&self, node: NodeId) -> NodeId {
        self.node(node).succ
    }

    /// Predecessor of `node`.
    #[inline]
    pub fn pred(&self, node: NodeId) -> NodeId {
        self.node(node).pred
    }

    /// Neighbour of `node` one step along `dir`.
    #[inline]
    pub fn next(&self, node: NodeId, dir: Direction) -> NodeId {
        match dir {
            Direction::Forward => self.succ(node),
            Direction::Backward => self.pred(node),
        }
    }

    /// Neighbour of `node` one step against `dir`.
    #[inline]
    pub fn prev(&self, node: NodeId, dir: Direction) -> NodeId {
        self.next(node, dir.reversed())
    }

    /// Cyclic position of `node`, in `1..=dimension`.
    #[inline]
    pub fn rank(&self, node: NodeId) -> usize {
        self.node(node).rank
    }

    /// Number of `succ` steps from `a` to `b`.
    #[inline]
    fn offset(&self, a: NodeId, b: NodeId) -> usize {
        let n = self.dimension();
        (self.rank(b) + n - self.rank(a)) % n
    }

    /// Number of nodes on the `succ` path from `a` to `b`, both included.
    #[inline]
    pub fn path_len(&self, a: NodeId, b: NodeId) -> usize {
        self.offset(a, b) + 1
    }

    /// Returns `true` if `b` lies on the `dir` path from `a` to `c`
    /// (endpoints included).
    #[inline]
    pub fn between(&self, a: NodeId, b: NodeId, c: NodeId, dir: Direction) -> bool {
        match dir {
            Direction::Forward => self.offset(a, b) <= self.offset(a, c),
            Direction::Backward => self.offset(c, b) <= self.offset(c, a),
        }
    }

    /// Renumbers ranks `1..=dimension` walking `succ` from the first node.
    pub fn normalize_ranks(&mut self) {
        let mut node = self.first;
        for rank in 1..=self.dimension() {
            self.node_mut(node).rank = rank;
            node = self.succ(node);
        }
    }

    /// Reverses the path that runs from `a` to `b` following `succ`.
    ///
    /// Both boundary edges are relinked and the ranks along the path are
    /// mirrored, so ranks stay consistent without a renumbering pass.
    /// Afterwards the same nodes run from `b` to `a`, which makes
    /// `reverse_segment(b, a)` the exact inverse. A path covering the whole
    /// cycle reverses the tour orientation.
    ///
    /// # Complexity
    ///
    /// O(path length).
    pub fn reverse_segment(&mut self, a: NodeId, b: NodeId) {
        let n = self.dimension();
        let len = self.path_len(a, b);
        if len == 1 {
            return;
        }
        let before = self.pred(a);
        let after = self.succ(b);
        let r0 = self.rank(a) - 1;

        let mut node = a;
        for k in 0..len {
            let rec = self.node_mut(node);
            let next = rec.succ;
            std::mem::swap(&mut rec.pred, &mut rec.succ);
            rec.rank = (r0 + len - 1 - k) % n + 1;
            node = next;
        }

        if len < n {
            self.link(before, b);
            self.link(a, after);
        }
    }

    /// Rebuilds the cycle so that it visits `order` in sequence.
    ///
    /// `order` must be a permutation of `1..=dimension`. Its first element
    /// becomes the anchor.
    pub fn relink(&mut self, order: &[NodeId]) -> Result<()> {
        let n = self.dimension();
        if order.len() != n {
            return Err(SolverError::invalid_tour(format!(
                "expected {n} nodes, got {}",
                order.len()
            )));
        }
        let mut seen = vec![false; n];
        for &id in order {
            if id == 0 || id > n {
                return Err(SolverError::invalid_tour(format!(
                    "node {id} outside 1..={n}"
                )));
            }
            if std::mem::replace(&mut seen[id - 1], true) {
                return Err(SolverError::invalid_tour(format!("node {id} appears twice")));
            }
        }

        for w in order.windows(2) {
            self.link(w[0], w[1]);
        }
        self.link(order[n - 1], order[0]);
        self.first = order[0];
        self.normalize_ranks();
        Ok(())
    }

    /// Node ids in tour order starting at the first node.
    pub fn order(&self) -> Vec<NodeId> {
        let mut buf = Vec::with_capacity(self.dimension());
        self.write_order(&mut buf);
        buf
    }

    /// Writes the tour order into `buf`, replacing its contents.
    pub fn write_order(&self, buf: &mut Vec<NodeId>) {
        buf.clear();
        let mut node = self.first;
        for _ in 0..self.dimension() {
            buf.push(node);
            node = self.succ(node);
        }
    }

    /// Sum of precision-scaled edge costs with penalties removed.
    pub fn raw_cost(&self, instance: &TspInstance) -> i64 {
        (1..=self.dimension())
            .map(|a| {
                let b = self.succ(a);
                instance.cost(a, b) - instance.pi(a) - instance.pi(b)
            })
            .sum()
    }

    /// Tour length in unscaled cost units.
    pub fn recompute_cost(&self, instance: &TspInstance) -> i64 {
        self.raw_cost(instance) / instance.precision()
    }

    /// Checks every structural invariant: one component of `dimension` nodes,
    /// mutual `pred`/`succ` links and consecutive ranks.
    pub fn is_valid_cycle(&self) -> bool {
        let n = self.dimension();
        let mut seen = vec![false; n];
        let mut node = self.first;
        for _ in 0..n {
            if node == 0 || node > n || std::mem::replace(&mut seen[node - 1], true) {
                return false;
            }
            let succ = self.succ(node);
            if succ == 0 || succ > n || self.pred(succ) != node {
                return false;
            }
            if self.rank(succ) != self.rank(node) % n + 1 {
                return false;
            }
            node = succ;
        }
        node == self.first
    }

    /// Successor of `node` at the last commit.
    pub fn old_succ(&self, node: NodeId) -> NodeId {
        self.node(node).old_succ
    }

    /// Predecessor of `node` at the last commit.
    pub fn old_pred(&self, node: NodeId) -> NodeId {
        self.node(node).old_pred
    }

    /// Copies the current links of `node` into its committed links.
    pub fn store_old_links_of(&mut self, node: NodeId) {
        let rec = self.node_mut(node);
        rec.old_pred = rec.pred;
        rec.old_succ = rec.succ;
    }

    /// Copies the current links of every node into the committed links.
    pub fn store_old_links(&mut self) {
        for rec in &mut self.nodes {
            rec.old_pred = rec.pred;
            rec.old_succ = rec.succ;
        }
    }

    /// Remembers the current tour as the best tour.
    pub fn record_best(&mut self) {
        for rec in &mut self.nodes {
            rec.best_pred = Some(rec.pred);
            rec.best_succ = Some(rec.succ);
        }
    }

    /// Returns `true` once a best tour has been recorded.
    pub fn has_best(&self) -> bool {
        self.nodes.first().is_some_and(|rec| rec.best_succ.is_some())
    }

    /// Returns `true` if `(a, b)` is an edge of the recorded best tour.
    #[inline]
    pub fn in_best_tour(&self, a: NodeId, b: NodeId) -> bool {
        let rec = self.node(a);
        rec.best_succ == Some(b) || rec.best_pred == Some(b)
    }

    /// Successor of `node` in the recorded best tour.
    pub fn best_succ(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).best_succ
    }
}
