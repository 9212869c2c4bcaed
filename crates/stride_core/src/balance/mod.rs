//! Stateless balancing engine.
//!
//! Adjusts candidate limb target poses against the current body
//! orientation so the torso is driven toward an intended leaning vector.
//! Pure functions of this cycle's inputs; any singularity degrades to a
//! zero correction and the next cycle recovers from fresh input.

pub mod engine;
pub mod params;

pub use engine::adjust_target_poses;
pub use params::BalancingParams;
