//! Error types.
//!
//! Only conditions that end a run are errors. Recorder calls made while
//! disabled or at capacity, and exchanges that fail to improve, are reported
//! through [`RecordStatus`](crate::trajectory::RecordStatus) and
//! [`ExchangeOutcome`](crate::search::ExchangeOutcome) instead.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::models::NodeId;

/// A fatal error that aborts an optimization run.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The problem has too few nodes to form a tour.
    #[error("invalid dimension: {0} (at least 3 nodes are required)")]
    InvalidDimension(usize),
    /// A node has no candidate edges while candidates are required.
    #[error("node {node} has no candidates")]
    EmptyCandidateSet {
        /// The node with the empty candidate set.
        node: NodeId,
    },
    /// A tour is not a permutation of the node ids.
    #[error("invalid tour: {0}")]
    InvalidTour(String),
    /// Problem data is inconsistent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The trajectory recorder could not be set up.
    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),
}

impl SolverError {
    /// Creates an [`InvalidTour`](Self::InvalidTour) error.
    pub fn invalid_tour(message: impl Into<String>) -> Self {
        Self::InvalidTour(message.into())
    }

    /// Creates an [`InvalidInput`](Self::InvalidInput) error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Errors from trajectory recorder setup.
#[derive(Debug, Error)]
pub enum TrajectoryError {
    /// One of the bounds passed to `initialize` is zero.
    #[error(
        "invalid trajectory bounds: dimension={dimension} max_steps={max_steps} max_candidates_per_step={max_candidates_per_step}"
    )]
    InvalidBounds {
        /// Requested tour snapshot width.
        dimension: usize,
        /// Requested step capacity.
        max_steps: usize,
        /// Requested candidate slots per step.
        max_candidates_per_step: usize,
    },
    /// Recording was enabled before a successful `initialize`.
    #[error("trajectory recorder is not initialized")]
    Uninitialized,
    /// Backing storage could not be allocated.
    #[error("trajectory allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}

/// Result alias for fallible solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;
