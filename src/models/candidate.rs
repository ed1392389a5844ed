//! Candidate edge catalog.
//!
//! Each node carries an ordered list of incident candidate edges. The move
//! search only ever looks at these edges when it adds an edge to the tour, so
//! the catalog bounds the search neighbourhood. Lists are produced outside
//! the search (normally from alpha-nearness) and are read front-to-back,
//! never mutated.

use super::NodeId;
use crate::distance::CostMatrix;

/// A candidate edge from the owning node to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// The neighbor at the other end of the edge.
    pub to: NodeId,
    /// Precision-scaled edge cost, penalties included.
    pub cost: i64,
    /// Rank of the edge (alpha value); lower is more promising.
    pub alpha: i64,
}

/// Ordered candidate lists for every node of an instance.
///
/// # Examples
///
/// ```
/// use u_lkh::models::{Candidate, CandidateCatalog};
///
/// let mut catalog = CandidateCatalog::new(3);
/// catalog.push(1, Candidate { to: 2, cost: 100, alpha: 0 });
/// assert_eq!(catalog.get(1).len(), 1);
/// assert_eq!(catalog.first_empty(), Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CandidateCatalog {
    lists: Vec<Vec<Candidate>>,
}

impl CandidateCatalog {
    /// Creates a catalog with an empty list for each of `dimension` nodes.
    pub fn new(dimension: usize) -> Self {
        Self {
            lists: vec![Vec::new(); dimension],
        }
    }

    /// Creates a catalog from per-node lists; `lists[0]` belongs to node 1.
    pub fn from_lists(lists: Vec<Vec<Candidate>>) -> Self {
        Self { lists }
    }

    /// Builds a k-nearest catalog from scaled edge costs.
    ///
    /// For every node the `k` cheapest other nodes under
    /// `costs * precision + pi(a) + pi(b)` are listed in ascending cost order
    /// (ties by id). The alpha value is the zero-based rank within the list.
    pub fn nearest(costs: &CostMatrix, pi: &[i64], precision: i64, k: usize) -> Self {
        let n = costs.size();
        let scaled = |a: NodeId, b: NodeId| costs.get(a, b) * precision + pi[a - 1] + pi[b - 1];

        let lists = (1..=n)
            .map(|a| {
                let mut others: Vec<(i64, NodeId)> = (1..=n)
                    .filter(|&b| b != a)
                    .map(|b| (scaled(a, b), b))
                    .collect();
                others.sort_unstable();
                others
                    .into_iter()
                    .take(k)
                    .enumerate()
                    .map(|(rank, (cost, to))| Candidate {
                        to,
                        cost,
                        alpha: rank as i64,
                    })
                    .collect()
            })
            .collect();

        Self { lists }
    }

    /// Appends a candidate to the list of node `from`.
    pub fn push(&mut self, from: NodeId, candidate: Candidate) {
        self.lists[from - 1].push(candidate);
    }

    /// Returns the candidates of `node` in catalog order.
    #[inline]
    pub fn get(&self, node: NodeId) -> &[Candidate] {
        &self.lists[node - 1]
    }

    /// Number of nodes covered by this catalog.
    pub fn dimension(&self) -> usize {
        self.lists.len()
    }

    /// Returns the first node whose candidate list is empty, if any.
    pub fn first_empty(&self) -> Option<NodeId> {
        self.lists.iter().position(|l| l.is_empty()).map(|i| i + 1)
    }

    /// Returns `true` if `to` is listed as a candidate of `from`.
    pub fn contains(&self, from: NodeId, to: NodeId) -> bool {
        self.get(from).iter().any(|c| c.to == to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_costs() -> CostMatrix {
        CostMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (4.0, 0.0)])
    }

    #[test]
    fn test_nearest_orders_by_cost() {
        let cm = line_costs();
        let catalog = CandidateCatalog::nearest(&cm, &[0; 4], 100, 2);
        let ids: Vec<NodeId> = catalog.get(1).iter().map(|c| c.to).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(catalog.get(1)[0].cost, 100);
        assert_eq!(catalog.get(1)[0].alpha, 0);
        assert_eq!(catalog.get(1)[1].alpha, 1);
    }

    #[test]
    fn test_nearest_includes_penalties() {
        let cm = line_costs();
        let pi = vec![0, 0, 500, 0];
        let catalog = CandidateCatalog::nearest(&cm, &pi, 100, 1);
        // 1->2 costs 100 + 0 + 0; 2->3 would be 100 + 500, so 2's nearest is 1
        assert_eq!(catalog.get(2)[0].to, 1);
        assert_eq!(catalog.get(3)[0].cost, 100 + 500);
    }

    #[test]
    fn test_nearest_caps_at_dimension() {
        let cm = line_costs();
        let catalog = CandidateCatalog::nearest(&cm, &[0; 4], 1, 10);
        assert_eq!(catalog.get(4).len(), 3);
        assert!(catalog.first_empty().is_none());
    }

    #[test]
    fn test_push_and_contains() {
        let mut catalog = CandidateCatalog::new(2);
        catalog.push(2, Candidate { to: 1, cost: 7, alpha: 0 });
        assert!(catalog.contains(2, 1));
        assert!(!catalog.contains(1, 2));
        assert_eq!(catalog.first_empty(), Some(1));
        assert_eq!(catalog.dimension(), 2);
    }
}
