//! Transaction log of speculative 2-opt moves.
//!
//! Every move made during an exchange search is pushed as a [`SwapRecord`].
//! A rejected search pops the records in reverse and undoes each reversal.
//! A successful one pops them the same way and commits the touched nodes.

use crate::models::NodeId;

/// One 2-opt move: edges `(t1, t2)` and `(t3, t4)` were replaced by
/// `(t2, t3)` and `(t4, t1)` by reversing the `succ` path `first..=last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRecord {
    /// Origin of the move.
    pub t1: NodeId,
    /// Endpoint of the first removed edge.
    pub t2: NodeId,
    /// Endpoint of the added edge from `t2`.
    pub t3: NodeId,
    /// Endpoint of the second removed edge.
    pub t4: NodeId,
    /// Start of the reversed path before the move.
    pub first: NodeId,
    /// End of the reversed path before the move.
    pub last: NodeId,
}

/// LIFO stack of [`SwapRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoLog {
    records: Vec<SwapRecord>,
}

impl UndoLog {
    /// Creates an empty log with room for `capacity` records.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Records a move.
    #[inline]
    pub fn push(&mut self, record: SwapRecord) {
        self.records.push(record);
    }

    /// Removes and returns the most recent move.
    #[inline]
    pub fn pop(&mut self) -> Option<SwapRecord> {
        self.records.pop()
    }

    /// Number of logged moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing is logged.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forgets every record without undoing it.
    #[inline]
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(t1: NodeId) -> SwapRecord {
        SwapRecord {
            t1,
            t2: t1 + 1,
            t3: t1 + 2,
            t4: t1 + 3,
            first: t1 + 1,
            last: t1 + 3,
        }
    }

    #[test]
    fn test_pop_is_lifo() {
        let mut log = UndoLog::with_capacity(4);
        log.push(rec(1));
        log.push(rec(2));
        assert_eq!(log.len(), 2);
        assert_eq!(log.pop().map(|r| r.t1), Some(2));
        assert_eq!(log.pop().map(|r| r.t1), Some(1));
        assert!(log.pop().is_none());
    }

    #[test]
    fn test_clear_forgets_records() {
        let mut log = UndoLog::default();
        log.push(rec(1));
        log.push(rec(2));
        log.clear();
        assert!(log.is_empty());
        assert!(log.pop().is_none());
    }
}
