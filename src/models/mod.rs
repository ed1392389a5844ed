//! Domain model types for symmetric TSP instances.
//!
//! Provides node identities and traversal direction, the per-node candidate
//! edge catalog, and the problem instance that ties costs, penalties and
//! candidates together.

mod candidate;
mod node;
mod problem;

pub use candidate::{Candidate, CandidateCatalog};
pub use node::{Direction, NodeId};
pub use problem::TspInstance;
