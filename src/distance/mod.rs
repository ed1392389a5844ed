//! Edge cost matrices.
//!
//! Provides a dense integer cost matrix for symmetric TSP instances.

mod matrix;

pub use matrix::CostMatrix;
