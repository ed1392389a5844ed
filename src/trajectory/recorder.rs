//! Bounded recorder of search decisions.
//!
//! # Layout
//!
//! Storage is four flat buffers sized once by
//! [`TrajectoryRecorder::initialize`]:
//!
//! ```text
//! snapshots        max_steps * dimension              node ids
//! scalars          max_steps                          origin, cost, count, chosen, gain
//! candidate_ids    max_steps * max_candidates_per_step node ids
//! candidate_costs  max_steps * max_candidates_per_step costs / precision
//! ```
//!
//! Recording never allocates. A step is written in two halves: `record_state`
//! fills the slot at index `len`, and `record_action` completes it and
//! advances `len`. Calls made while disabled, uninitialized or full are
//! no-ops reported through [`RecordStatus::Rejected`].

use super::step::{
    RecordStatus, Rejection, StepPhase, Trajectory, TrajectoryAction, TrajectoryState,
    TrajectoryStep,
};
use crate::error::TrajectoryError;
use crate::models::NodeId;

#[derive(Debug, Clone, Copy, Default)]
struct StepScalars {
    origin: NodeId,
    tour_cost: i64,
    candidate_count: usize,
    chosen: NodeId,
    gain: f64,
}

/// Fixed-capacity log of (state, action) pairs.
///
/// # Examples
///
/// ```
/// use u_lkh::trajectory::{RecordStatus, TrajectoryRecorder};
///
/// let mut rec = TrajectoryRecorder::new();
/// rec.initialize(3, 10, 2).unwrap();
/// rec.enable().unwrap();
///
/// rec.record_state(1, &[1, 2, 3], 30, &[2, 3, 9], &[1.0, 2.0, 4.0], 3);
/// assert_eq!(rec.record_action(2, 1.0), RecordStatus::Recorded);
///
/// let step = rec.step(0).unwrap();
/// assert_eq!(step.candidate_ids, &[2, 3]);
/// assert_eq!(step.candidate_count, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TrajectoryRecorder {
    snapshots: Vec<NodeId>,
    scalars: Vec<StepScalars>,
    candidate_ids: Vec<NodeId>,
    candidate_costs: Vec<f64>,
    dimension: usize,
    capacity: usize,
    candidate_width: usize,
    len: usize,
    enabled: bool,
    phase: StepPhase,
}

impl TrajectoryRecorder {
    /// Creates an uninitialized recorder that owns no storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates storage for `max_steps` steps of a `dimension`-node tour
    /// with up to `max_candidates_per_step` candidates each.
    ///
    /// Any previous buffer is released first. Recording starts disabled.
    ///
    /// # Errors
    ///
    /// [`TrajectoryError::InvalidBounds`] if a bound is zero, and
    /// [`TrajectoryError::Allocation`] if memory cannot be reserved. In both
    /// cases the recorder is left uninitialized.
    pub fn initialize(
        &mut self,
        dimension: usize,
        max_steps: usize,
        max_candidates_per_step: usize,
    ) -> Result<(), TrajectoryError> {
        self.cleanup();
        if dimension == 0 || max_steps == 0 || max_candidates_per_step == 0 {
            return Err(TrajectoryError::InvalidBounds {
                dimension,
                max_steps,
                max_candidates_per_step,
            });
        }

        if let Err(e) = self.allocate(dimension, max_steps, max_candidates_per_step) {
            self.cleanup();
            return Err(e);
        }

        self.dimension = dimension;
        self.capacity = max_steps;
        self.candidate_width = max_candidates_per_step;
        log::debug!(
            "trajectory.initialize: dimension={dimension} max_steps={max_steps} max_candidates={max_candidates_per_step}"
        );
        Ok(())
    }

    fn allocate(
        &mut self,
        dimension: usize,
        max_steps: usize,
        width: usize,
    ) -> Result<(), TrajectoryError> {
        let snapshot_len = max_steps.saturating_mul(dimension);
        let candidate_len = max_steps.saturating_mul(width);

        self.snapshots.try_reserve_exact(snapshot_len)?;
        self.scalars.try_reserve_exact(max_steps)?;
        self.candidate_ids.try_reserve_exact(candidate_len)?;
        self.candidate_costs.try_reserve_exact(candidate_len)?;

        self.snapshots.resize(snapshot_len, 0);
        self.scalars.resize(max_steps, StepScalars::default());
        self.candidate_ids.resize(candidate_len, 0);
        self.candidate_costs.resize(candidate_len, 0.0);
        Ok(())
    }

    /// Releases all storage and zeroes every bound. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        *self = Self::default();
    }

    /// Turns recording on.
    ///
    /// # Errors
    ///
    /// [`TrajectoryError::Uninitialized`] if no buffer is allocated.
    pub fn enable(&mut self) -> Result<(), TrajectoryError> {
        if !self.is_initialized() {
            self.enabled = false;
            return Err(TrajectoryError::Uninitialized);
        }
        self.enabled = true;
        Ok(())
    }

    /// Turns recording off. Recorded steps are kept.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    fn gate(&self) -> Option<Rejection> {
        if !self.is_initialized() {
            Some(Rejection::Uninitialized)
        } else if !self.enabled {
            Some(Rejection::Disabled)
        } else if self.is_full() {
            Some(Rejection::Full)
        } else {
            None
        }
    }

    /// Writes the state half of the next step.
    ///
    /// `tour` is zero-padded or truncated to `dimension` ids. At most
    /// `max_candidates_per_step` of the first `count` candidates are kept
    /// and the remaining slots are zeroed.
    pub fn record_state(
        &mut self,
        origin: NodeId,
        tour: &[NodeId],
        tour_cost: i64,
        candidate_ids: &[NodeId],
        candidate_costs: &[f64],
        count: usize,
    ) -> RecordStatus {
        if let Some(reason) = self.gate() {
            return RecordStatus::Rejected(reason);
        }
        let step = self.len;

        let snap = &mut self.snapshots[step * self.dimension..(step + 1) * self.dimension];
        let n = tour.len().min(self.dimension);
        snap[..n].copy_from_slice(&tour[..n]);
        snap[n..].fill(0);

        let count = count
            .min(candidate_ids.len())
            .min(candidate_costs.len())
            .min(self.candidate_width);
        let range = step * self.candidate_width..(step + 1) * self.candidate_width;
        let ids = &mut self.candidate_ids[range.clone()];
        ids[..count].copy_from_slice(&candidate_ids[..count]);
        ids[count..].fill(0);
        let costs = &mut self.candidate_costs[range];
        costs[..count].copy_from_slice(&candidate_costs[..count]);
        costs[count..].fill(0.0);

        let s = &mut self.scalars[step];
        s.origin = origin;
        s.tour_cost = tour_cost;
        s.candidate_count = count;

        self.phase = StepPhase::AwaitingAction;
        RecordStatus::Recorded
    }

    /// Writes the action half of the pending step and advances the length.
    pub fn record_action(&mut self, chosen: NodeId, gain: f64) -> RecordStatus {
        if let Some(reason) = self.gate() {
            return RecordStatus::Rejected(reason);
        }
        debug_assert_eq!(
            self.phase,
            StepPhase::AwaitingAction,
            "called `TrajectoryRecorder::record_action` without a preceding state"
        );

        let s = &mut self.scalars[self.len];
        s.chosen = chosen;
        s.gain = gain;
        self.len += 1;
        self.phase = StepPhase::Idle;
        RecordStatus::Recorded
    }

    /// Returns `true` once storage is allocated.
    pub fn is_initialized(&self) -> bool {
        self.capacity > 0
    }

    /// Returns `true` if recording is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` if every step slot is used.
    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// Number of completed steps.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no step was completed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of steps.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tour snapshot width.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Candidate slots per step.
    pub fn max_candidates_per_step(&self) -> usize {
        self.candidate_width
    }

    /// Whether a state is waiting for its action.
    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// Returns the completed step at `index`.
    pub fn step(&self, index: usize) -> Option<TrajectoryStep<'_>> {
        if index >= self.len {
            return None;
        }
        let s = &self.scalars[index];
        let cands = index * self.candidate_width..(index + 1) * self.candidate_width;
        Some(TrajectoryStep {
            origin: s.origin,
            tour_snapshot: &self.snapshots[index * self.dimension..(index + 1) * self.dimension],
            tour_cost: s.tour_cost,
            candidate_ids: &self.candidate_ids[cands.clone()],
            candidate_costs: &self.candidate_costs[cands],
            candidate_count: s.candidate_count,
            chosen: s.chosen,
            gain: s.gain,
        })
    }

    /// Iterates the completed steps in recording order.
    pub fn steps(&self) -> impl Iterator<Item = TrajectoryStep<'_>> + '_ {
        (0..self.len).filter_map(move |i| self.step(i))
    }

    /// Copies the completed steps into an owned [`Trajectory`].
    pub fn to_trajectory(&self, final_cost: i64) -> Trajectory {
        let (states, actions) = self
            .steps()
            .map(|s| {
                (
                    TrajectoryState {
                        current_node: s.origin,
                        tour_snapshot: s.tour_snapshot.to_vec(),
                        tour_cost: s.tour_cost,
                        candidate_ids: s.candidate_ids.to_vec(),
                        candidate_costs: s.candidate_costs.to_vec(),
                        actual_num_candidates: s.candidate_count,
                    },
                    TrajectoryAction {
                        chosen_node: s.chosen,
                        gain: s.gain,
                    },
                )
            })
            .unzip();

        Trajectory {
            final_cost,
            dimension: self.dimension,
            max_candidates_per_step: self.candidate_width,
            recorded_steps: self.len,
            states,
            actions,
        }
    }
}
