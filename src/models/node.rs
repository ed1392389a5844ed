//! Node identity and traversal direction.

/// Identity of a node: `1..=dimension`, stable for the problem's lifetime.
pub type NodeId = usize;

/// Orientation in which a tour is traversed.
///
/// Direction-aware tour queries take a `Direction` instead of consulting a
/// shared orientation flag, so a search can walk "its" way round the cycle
/// without affecting anyone else.
///
/// # Examples
///
/// ```
/// use u_lkh::models::Direction;
///
/// assert_eq!(Direction::Forward.reversed(), Direction::Backward);
/// assert_eq!(Direction::Backward.reversed(), Direction::Forward);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow successor links.
    Forward,
    /// Follow predecessor links.
    Backward,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}
