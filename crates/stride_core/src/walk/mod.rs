//! Step planning and walking: step parameters, rate-limited planning,
//! per-foot target poses and the walk-time heuristic.

pub mod estimator;
pub mod params;
pub mod planner;
pub mod step;

pub use estimator::{WalkMode, WalkSpeeds, WalkTimeEstimator};
pub use params::{WalkParamSet, WalkParameters};
pub use planner::{calculate_foot_target_pose, calculate_relative_free_foot_pose, calculate_step};
pub use step::Step;
