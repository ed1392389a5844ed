//! Read-side views and the owned trajectory export.

use serde::{Deserialize, Serialize};

use crate::models::NodeId;

/// Outcome of a recorder call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    /// The call wrote into the buffer.
    Recorded,
    /// The call was a no-op.
    Rejected(Rejection),
}

impl RecordStatus {
    /// Returns `true` for [`RecordStatus::Recorded`].
    pub fn is_recorded(self) -> bool {
        matches!(self, Self::Recorded)
    }
}

/// Why a recorder call was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Recording is switched off.
    Disabled,
    /// No buffer has been allocated.
    Uninitialized,
    /// Every step slot is used.
    Full,
}

/// Whether the recorder expects a state or an action next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepPhase {
    /// The next call should be `record_state`.
    #[default]
    Idle,
    /// A state was written; `record_action` completes the step.
    AwaitingAction,
}

/// Borrowed view of one recorded (state, action) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryStep<'a> {
    /// Node the decision originated from.
    pub origin: NodeId,
    /// Tour order at the decision, `dimension` ids.
    pub tour_snapshot: &'a [NodeId],
    /// Running tour cost at the decision.
    pub tour_cost: i64,
    /// Candidate ids, zero beyond `candidate_count`.
    pub candidate_ids: &'a [NodeId],
    /// Candidate costs divided by precision, zero beyond `candidate_count`.
    pub candidate_costs: &'a [f64],
    /// Number of meaningful candidate slots.
    pub candidate_count: usize,
    /// Node chosen by the decision.
    pub chosen: NodeId,
    /// Gain attached to the choice, divided by precision.
    pub gain: f64,
}

/// State half of an exported step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryState {
    pub current_node: NodeId,
    pub tour_snapshot: Vec<NodeId>,
    pub tour_cost: i64,
    pub candidate_ids: Vec<NodeId>,
    pub candidate_costs: Vec<f64>,
    pub actual_num_candidates: usize,
}

/// Action half of an exported step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryAction {
    pub chosen_node: NodeId,
    pub gain: f64,
}

/// Owned copy of a recorded trajectory, ready to hand to a host.
///
/// `states[i]` and `actions[i]` form step `i`. Every snapshot holds exactly
/// `dimension` ids and every candidate array exactly
/// `max_candidates_per_step` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub final_cost: i64,
    pub dimension: usize,
    pub max_candidates_per_step: usize,
    pub recorded_steps: usize,
    pub states: Vec<TrajectoryState>,
    pub actions: Vec<TrajectoryAction>,
}

impl Trajectory {
    /// Serializes the trajectory as a JSON object.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Returns `true` if no step was recorded.
    pub fn is_empty(&self) -> bool {
        self.recorded_steps == 0
    }
}
