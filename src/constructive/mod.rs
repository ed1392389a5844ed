//! Starting tours for Lin-Kernighan trials.
//!
//! - [`nearest_neighbor_tour`]: greedy nearest-neighbor tour, O(n²)
//! - [`random_walk_tour`]: randomized walk over candidate edges, O(n · k)
//! - [`double_bridge`]: segment-swap kick of an existing tour (Martin, Otto & Felten, 1991), O(n)

mod nearest_neighbor;
mod walk;

pub use nearest_neighbor::nearest_neighbor_tour;
pub use walk::{double_bridge, random_walk_tour};
