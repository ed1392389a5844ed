//! FIFO of active nodes.
//!
//! A node is "active" while it may still originate an improving move. The
//! queue holds each node at most once and hands them out in insertion order.

use std::collections::VecDeque;

use crate::models::NodeId;

/// Insertion-ordered set of nodes eligible to serve as `t1`.
///
/// # Examples
///
/// ```
/// use u_lkh::search::ActiveQueue;
///
/// let mut q = ActiveQueue::new(4);
/// assert!(q.activate(3));
/// assert!(q.activate(1));
/// assert!(!q.activate(3));
/// assert_eq!(q.remove_first(), Some(3));
/// assert_eq!(q.remove_first(), Some(1));
/// assert_eq!(q.remove_first(), None);
/// ```
#[derive(Debug, Clone)]
pub struct ActiveQueue {
    order: VecDeque<NodeId>,
    queued: Vec<bool>,
}

impl ActiveQueue {
    /// Creates an empty queue for nodes `1..=dimension`.
    pub fn new(dimension: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(dimension),
            queued: vec![false; dimension],
        }
    }

    /// Appends `node` unless it is already queued. Returns `true` if it was
    /// appended.
    #[inline]
    pub fn activate(&mut self, node: NodeId) -> bool {
        let slot = &mut self.queued[node - 1];
        if *slot {
            return false;
        }
        *slot = true;
        self.order.push_back(node);
        true
    }

    /// Pops the oldest active node, which becomes passive.
    #[inline]
    pub fn remove_first(&mut self) -> Option<NodeId> {
        let node = self.order.pop_front()?;
        self.queued[node - 1] = false;
        Some(node)
    }

    /// Returns `true` if `node` is queued.
    pub fn is_active(&self, node: NodeId) -> bool {
        self.queued[node - 1]
    }

    /// Number of queued nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no node is queued.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Makes every node passive.
    pub fn clear(&mut self) {
        self.order.clear();
        self.queued.fill(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut q = ActiveQueue::new(5);
        for n in [5, 2, 4] {
            assert!(q.activate(n));
        }
        assert_eq!(q.len(), 3);
        assert_eq!(q.remove_first(), Some(5));
        assert_eq!(q.remove_first(), Some(2));
        assert_eq!(q.remove_first(), Some(4));
        assert!(q.is_empty());
    }

    #[test]
    fn test_no_duplicates() {
        let mut q = ActiveQueue::new(3);
        assert!(q.activate(2));
        assert!(!q.activate(2));
        assert_eq!(q.len(), 1);
        assert!(q.is_active(2));
    }

    #[test]
    fn test_reactivate_after_removal() {
        let mut q = ActiveQueue::new(3);
        q.activate(1);
        q.activate(2);
        assert_eq!(q.remove_first(), Some(1));
        assert!(!q.is_active(1));
        assert!(q.activate(1));
        assert_eq!(q.remove_first(), Some(2));
        assert_eq!(q.remove_first(), Some(1));
    }

    #[test]
    fn test_clear() {
        let mut q = ActiveQueue::new(3);
        q.activate(1);
        q.activate(3);
        q.clear();
        assert!(q.is_empty());
        assert!(!q.is_active(3));
        assert_eq!(q.remove_first(), None);
    }
}
