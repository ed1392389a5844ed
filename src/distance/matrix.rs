//! Dense integer cost matrix.

use crate::models::NodeId;

/// A dense n×n integer cost matrix stored in row-major order.
///
/// Nodes are addressed by their 1-based id, so `get(1, 2)` is the cost of
/// the edge between the first and second node. Costs are unscaled; the
/// instance multiplies them by its precision.
///
/// # Examples
///
/// ```
/// use u_lkh::distance::CostMatrix;
///
/// let cm = CostMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// assert_eq!(cm.get(1, 2), 5);
/// assert_eq!(cm.get(1, 3), 10);
/// assert_eq!(cm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct CostMatrix {
    data: Vec<i64>,
    size: usize,
}

impl CostMatrix {
    /// Creates a cost matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Computes a rounded Euclidean cost matrix from point coordinates.
    ///
    /// Each cost is the Euclidean distance rounded to the nearest integer,
    /// the TSPLIB `EUC_2D` convention.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut cm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = points[i].0 - points[j].0;
                let dy = points[i].1 - points[j].1;
                let d = (dx.hypot(dy) + 0.5).floor() as i64;
                cm.set(i + 1, j + 1, d);
                cm.set(j + 1, i + 1, d);
            }
        }
        cm
    }

    /// Creates a cost matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<i64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the cost of the edge from node `from` to node `to`.
    ///
    /// # Panics
    ///
    /// Panics if either id is outside `1..=size`.
    #[inline]
    pub fn get(&self, from: NodeId, to: NodeId) -> i64 {
        self.data[(from - 1) * self.size + (to - 1)]
    }

    /// Sets the cost of the edge from node `from` to node `to`.
    pub fn set(&mut self, from: NodeId, to: NodeId, cost: i64) {
        self.data[(from - 1) * self.size + (to - 1)] = cost;
    }

    /// Number of nodes in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if `get(a, b) == get(b, a)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        for i in 1..=self.size {
            for j in (i + 1)..=self.size {
                if self.get(i, j) != self.get(j, i) {
                    return false;
                }
            }
        }
        true
    }
}
