//! Decision trajectory recording.
//!
//! The engine mirrors every `(t1, t2)` decision into a
//! [`TrajectoryRecorder`]: the tour at that moment, its cost, the leading
//! candidates of `t1`, the chosen `t2` and the initial gain. The buffer is
//! allocated once and never grows, so recording cannot change what the
//! search does or how it scales.

mod recorder;
mod step;

pub use recorder::TrajectoryRecorder;
pub use step::{
    RecordStatus, Rejection, StepPhase, Trajectory, TrajectoryAction, TrajectoryState,
    TrajectoryStep,
};
