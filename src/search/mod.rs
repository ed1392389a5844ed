//! Lin-Kernighan move search.
//!
//! - [`lin_kernighan`]: one trial: pop active nodes, search, commit or roll
//!   back, stop on a revisited tour
//! - [`ExchangeSearch`]: the pluggable deep move search, with
//!   [`SequentialExchange`] as the variable-depth 2-opt implementation
//! - [`SolverContext`]: all mutable run state
//! - [`ActiveQueue`] and [`UndoLog`]: the FIFO of active nodes and the
//!   transaction log of speculative moves

mod context;
mod engine;
mod exchange;
mod queue;
mod undo;

pub use context::{SearchParams, SolverContext};
pub use engine::{lin_kernighan, TrialPhase, TrialResult};
pub use exchange::{ExchangeOutcome, ExchangeSearch, SequentialExchange};
pub use queue::ActiveQueue;
pub use undo::{SwapRecord, UndoLog};
