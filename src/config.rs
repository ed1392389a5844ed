//! Run configuration.

use serde::{Deserialize, Serialize};

/// Bounds of the trajectory buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    /// Maximum number of recorded decisions.
    pub max_steps: usize,
    /// Candidate slots stored per decision.
    pub max_candidates_per_step: usize,
}

impl TrajectoryConfig {
    /// Creates a trajectory configuration.
    pub fn new(max_steps: usize, max_candidates_per_step: usize) -> Self {
        Self {
            max_steps,
            max_candidates_per_step,
        }
    }
}

/// Parameters of an optimization run.
///
/// # Examples
///
/// ```
/// use u_lkh::config::{SolverConfig, TrajectoryConfig};
///
/// let config = SolverConfig::default()
///     .with_max_trials(5)
///     .with_seed(7)
///     .with_trajectory(TrajectoryConfig::new(100, 5));
///
/// assert_eq!(config.max_trials, Some(5));
/// assert!(config.hashing);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Number of trials; `None` runs one trial per node.
    pub max_trials: Option<usize>,
    /// Seed of the run's random number generator.
    pub seed: u64,
    /// Wall-clock budget in seconds, checked before every trial but the
    /// first.
    pub time_limit_secs: Option<f64>,
    /// Later trials restart from a double-bridge kick of the best tour when
    /// positive, and from a fresh random walk otherwise.
    pub kick_type: usize,
    /// Maximum number of 2-opt moves in one exchange; 0 means no limit
    /// beyond the node count.
    pub max_depth: usize,
    /// End a trial once it revisits a tour.
    pub hashing: bool,
    /// Skip `t2` choices whose edge is near (in the best tour or the 1-tree).
    pub restricted_search: bool,
    /// Fail before searching if any node has an empty candidate list.
    pub require_candidates: bool,
    /// Record decisions into a trajectory buffer of this size.
    pub trajectory: Option<TrajectoryConfig>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_trials: None,
            seed: 1,
            time_limit_secs: None,
            kick_type: 0,
            max_depth: 0,
            hashing: true,
            restricted_search: true,
            require_candidates: true,
            trajectory: None,
        }
    }
}

impl SolverConfig {
    /// Sets the number of trials.
    pub fn with_max_trials(mut self, trials: usize) -> Self {
        self.max_trials = Some(trials);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit_secs(mut self, secs: f64) -> Self {
        self.time_limit_secs = Some(secs);
        self
    }

    /// Sets the kick type.
    pub fn with_kick_type(mut self, kick_type: usize) -> Self {
        self.kick_type = kick_type;
        self
    }

    /// Sets the exchange depth limit.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Enables or disables duplicate-tour detection.
    pub fn with_hashing(mut self, enabled: bool) -> Self {
        self.hashing = enabled;
        self
    }

    /// Enables or disables restricted `t2` selection.
    pub fn with_restricted_search(mut self, enabled: bool) -> Self {
        self.restricted_search = enabled;
        self
    }

    /// Sets whether empty candidate lists are an error.
    pub fn with_require_candidates(mut self, required: bool) -> Self {
        self.require_candidates = required;
        self
    }

    /// Enables trajectory recording.
    pub fn with_trajectory(mut self, trajectory: TrajectoryConfig) -> Self {
        self.trajectory = Some(trajectory);
        self
    }
}
