//! # u-lkh
//!
//! Lin-Kernighan local search for the symmetric traveling salesman problem,
//! with a bounded recorder that captures every local decision the search
//! makes (tour, candidates considered, move chosen, gain).
//!
//! ## Modules
//!
//! - [`models`]: instance, candidate catalog, node ids and directions
//! - [`distance`]: integer cost matrix
//! - [`tour`]: linked tour with ranks, tour hashing, visited-tour table
//! - [`search`]: one Lin-Kernighan trial and the deep exchange search
//! - [`trajectory`]: fixed-capacity decision recorder and its export
//! - [`constructive`]: nearest-neighbor, random-walk and kicked start tours
//! - [`solver`]: repeated trials, best-tour tracking and deadline
//! - [`config`]: run parameters
//!
//! ## Quick start
//!
//! ```
//! use u_lkh::config::{SolverConfig, TrajectoryConfig};
//! use u_lkh::distance::CostMatrix;
//! use u_lkh::models::TspInstance;
//! use u_lkh::Solver;
//!
//! let pts: Vec<(f64, f64)> = (0..8)
//!     .map(|i| ((i * 37 % 11) as f64, (i * 13 % 7) as f64))
//!     .collect();
//! let inst = TspInstance::new(CostMatrix::from_points(&pts)).with_nearest_candidates(5);
//!
//! let config = SolverConfig::default()
//!     .with_max_trials(4)
//!     .with_trajectory(TrajectoryConfig::new(100, 5));
//! let mut solver = Solver::new(&inst, config).unwrap();
//! let report = solver.solve(None).unwrap();
//!
//! assert_eq!(report.tour.len(), 9);
//! assert!(solver.trajectory().len() <= 100);
//! ```
//!
//! Logging goes through the [`log`] facade; the crate never installs a
//! logger.

pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod models;
pub mod search;
pub mod solver;
pub mod tour;
pub mod trajectory;

pub use error::{Result, SolverError, TrajectoryError};
pub use solver::{SolveReport, Solver};
