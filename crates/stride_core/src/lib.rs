//! # stride_core - Humanoid Soccer Movement Engine
//!
//! Movement-planning and execution core for a bipedal soccer agent.
//! Generates, once per fixed control cycle, target 6-DOF poses for each
//! foot and arm, arbitrates between whole-body behaviors (walking, kick
//! variants, single-leg stabilization) and keeps the robot upright while
//! doing so.
//!
//! ## Design
//! - Single-threaded and cycle-driven: one synchronous
//!   [`MovementEngine::perform_cycle`] call per control cycle, no internal
//!   threads, no blocking
//! - Deterministic and replayable: identical inputs produce identical
//!   poses (distribution sampling uses seeded RNGs)
//! - Every cycle yields a pose: failures degrade locally and self-heal
//!   from the next cycle's fresh input
//!
//! The world/agent estimation, per-limb inverse kinematics and strategic
//! behavior selection are external collaborators; see [`snapshot`] for
//! the read-only inputs and [`behavior::LimbTargets`] for the output.

pub mod balance;
pub mod behavior;
pub mod error;
pub mod geometry;
pub mod interpolation;
pub mod kick;
pub mod math;
pub mod movement;
pub mod snapshot;
pub mod walk;

// Re-export the cycle-facing API
pub use behavior::{
    BehaviorId, EngineConfig, KickConfig, KickScore, LimbTargets, MovementEngine,
};
pub use error::{ConfigError, Result};
pub use geometry::{Angle, Area2D, Pose2D, Pose6D, RotationOrder};
pub use snapshot::{
    AgentSnapshot, BallSnapshot, FieldModel, GameState, InformationSource, SupportFoot,
    ThisPlayer, WorldSnapshot,
};
pub use walk::{Step, WalkParamSet, WalkParameters};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
