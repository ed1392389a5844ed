//! Nearest-neighbor tour construction.
//!
//! Builds a tour greedily: starting from a given node, always move to the
//! cheapest unvisited node under the scaled cost `C(a, b)`.
//!
//! # Complexity
//!
//! O(n²) where n = number of nodes.
//!
//! # Reference
//!
//! Rosenkrantz, D.J., Stearns, R.E. & Lewis, P.M. (1977). "An analysis of
//! several heuristics for the traveling salesman problem", *SIAM Journal on
//! Computing* 6(3), 563-581.

use crate::models::{NodeId, TspInstance};

/// Constructs a tour with the nearest-neighbor heuristic.
///
/// Ties go to the lowest node id. The returned order starts at `start` and
/// contains every node once.
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
/// use u_lkh::constructive::nearest_neighbor_tour;
///
/// let cm = CostMatrix::from_points(&[(0.0, 0.0), (3.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
/// let inst = TspInstance::new(cm);
///
/// assert_eq!(nearest_neighbor_tour(&inst, 1), vec![1, 3, 4, 2]);
/// ```
pub fn nearest_neighbor_tour(instance: &TspInstance, start: NodeId) -> Vec<NodeId> {
    let n = instance.dimension();
    assert!((1..=n).contains(&start), "start node {start} outside 1..={n}");

    let mut visited = vec![false; n];
    visited[start - 1] = true;
    let mut order = Vec::with_capacity(n);
    order.push(start);

    let mut current = start;
    while order.len() < n {
        let mut best: Option<(NodeId, i64)> = None;
        for next in 1..=n {
            if visited[next - 1] {
                continue;
            }
            let c = instance.cost(current, next);
            if best.map_or(true, |(_, bc)| c < bc) {
                best = Some((next, c));
            }
        }
        let Some((next, _)) = best else {
            break;
        };
        visited[next - 1] = true;
        order.push(next);
        current = next;
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::CostMatrix;

    fn line_instance() -> TspInstance {
        // Nodes at x = 0, 1, 2, 3 given out of order
        let cm = CostMatrix::from_points(&[(2.0, 0.0), (0.0, 0.0), (3.0, 0.0), (1.0, 0.0)]);
        TspInstance::new(cm)
    }

    #[test]
    fn test_nn_visits_all() {
        let inst = line_instance();
        let mut tour = nearest_neighbor_tour(&inst, 1);
        assert_eq!(tour.len(), 4);
        tour.sort_unstable();
        assert_eq!(tour, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_nn_follows_line() {
        let inst = line_instance();
        assert_eq!(nearest_neighbor_tour(&inst, 2), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_nn_tie_goes_to_lowest_id() {
        // From x = 2, both x = 1 (node 4) and x = 3 (node 3) are 1 away
        let inst = line_instance();
        assert_eq!(nearest_neighbor_tour(&inst, 1)[1], 3);
    }

    #[test]
    fn test_nn_uses_penalties() {
        let inst = line_instance()
            .with_pi(vec![0, 0, 0, 1000])
            .expect("valid");
        // Node 4 is nearest to node 2 by distance but carries a large penalty
        assert_eq!(nearest_neighbor_tour(&inst, 2)[1], 1);
    }
}
