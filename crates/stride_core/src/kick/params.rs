//! Per-kick-type configuration.
//!
//! Immutable once built; everything that changes at runtime (intended
//! direction, expected ball position) lives on the
//! [`KickDecider`](super::decider::KickDecider) instead.

use crate::error::{ConfigError, Result};
use crate::geometry::{Angle, Area2D, Pose2D, Pose6D};
use crate::snapshot::SupportFoot;
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Opponent-distance default when a kick does not care about far
/// opponents.
pub const DEFAULT_MAX_OPPONENT_DISTANCE: f32 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KickParameters {
    pub name: String,
    pub kicking_foot: SupportFoot,
    /// Pose to navigate to relative to ball and kick direction, in order
    /// to be able to perform this kick.
    pub relative_run_to_pose: Pose2D,
    /// Speed we want to arrive with at the run-to pose (local frame).
    pub speed_at_run_to_pose: Vector2<f32>,
    /// Ball direction relative to the body when the kick triggers.
    pub relative_kick_direction: Angle,
    pub max_kick_distance: f32,
    pub min_kick_distance: f32,
    /// An opponent closer than this (relative to our own ball distance)
    /// makes the kick inapplicable.
    pub opponent_min_distance: f32,
    /// An opponent farther than this makes the kick pointless (used by
    /// dribble-style kicks).
    pub opponent_max_distance: f32,
    /// Max ball speed (m/cycle) at which the kick still connects.
    pub ball_max_speed: f32,
    pub own_min_speed: f32,
    pub own_max_speed: f32,
    /// Cycles from decision until the foot hits the ball.
    pub ball_hit_cycles: usize,
    /// Kick destabilizes the robot; composers treat the exit differently.
    pub unstable: bool,
    /// Family multiplier that puts heterogeneous kick scores on one scale.
    pub priority: f32,
    /// Ball positions (local frame) this kick can reach.
    pub kickable_area: Area2D,
    /// Minimum upright indicator to trigger.
    pub min_up_vector_z: f32,
    /// Minimum lateral offset of the final-step target (stabilization
    /// reachability check).
    pub min_x_offset: f32,
    /// Target pose of the stabilizing foot relative to ball and kick
    /// direction.
    pub relative_stabilizing_foot_pose: Pose2D,
}

impl KickParameters {
    /// A straight forward kick with the given foot, tuned for the default
    /// simulated humanoid.
    pub fn straight_kick(kicking_foot: SupportFoot, max_distance: f32) -> KickParameters {
        let side = kicking_foot.side_sign();
        KickParameters {
            name: format!(
                "straight_kick_{}",
                if kicking_foot == SupportFoot::Left { "left" } else { "right" }
            ),
            kicking_foot,
            relative_run_to_pose: Pose2D::new(-0.15, side * 0.05, Angle::ZERO),
            speed_at_run_to_pose: Vector2::new(0.02, 0.0),
            relative_kick_direction: Angle::ZERO,
            max_kick_distance: max_distance,
            min_kick_distance: max_distance * 0.6,
            opponent_min_distance: 1.5,
            opponent_max_distance: DEFAULT_MAX_OPPONENT_DISTANCE,
            ball_max_speed: 0.007,
            own_min_speed: 0.0,
            own_max_speed: 100.0,
            ball_hit_cycles: 40,
            unstable: false,
            priority: 1.0,
            // local frame: x forward, y lateral (left positive); the ball
            // sits ahead and slightly on the kicking-foot side
            kickable_area: if kicking_foot == SupportFoot::Left {
                Area2D::new(0.1, 0.3, 0.0, 0.22)
            } else {
                Area2D::new(0.1, 0.3, -0.22, 0.0)
            },
            min_up_vector_z: 0.99,
            min_x_offset: 0.08,
            // the stabilizing foot plants behind and beside the ball
            relative_stabilizing_foot_pose: Pose2D::new(-0.18, side * 0.11, Angle::ZERO),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_kick_distance > self.max_kick_distance {
            return Err(ConfigError::InvalidKickDistanceRange {
                name: self.name.clone(),
                min: self.min_kick_distance,
                max: self.max_kick_distance,
            });
        }
        for bound in [
            self.ball_max_speed,
            self.own_min_speed,
            self.own_max_speed,
            self.opponent_min_distance,
        ] {
            if !bound.is_finite() || bound < 0.0 {
                return Err(ConfigError::InvalidSpeedBound { name: self.name.clone(), bound });
            }
        }
        Ok(())
    }
}

/// Posture targets for stabilizing on one leg before a kick. Left/right
/// presets mirror each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilizeParams {
    pub support_foot_stabilization_position: Vector3<f32>,
    pub free_foot_target_position: Vector3<f32>,
    pub free_foot_target_angles: Vector3<f32>,
    /// Intended sideways leaning while stabilized, degrees.
    pub intended_leaning_sidewards: f32,
    /// Intended forward leaning while stabilized, degrees.
    pub intended_leaning_forwards: f32,
    /// Cycles of the balancing movement.
    pub stabilize_cycles: usize,
}

impl StabilizeParams {
    /// Stabilize on the left leg (for a right-footed straight kick).
    pub fn left_support() -> StabilizeParams {
        StabilizeParams {
            support_foot_stabilization_position: Vector3::new(0.015, 0.02, -0.3),
            free_foot_target_position: Vector3::new(-0.075, -0.16, -0.17),
            free_foot_target_angles: Vector3::new(-70.0, 0.0, 0.0),
            intended_leaning_sidewards: 12.0,
            intended_leaning_forwards: 0.0,
            stabilize_cycles: 18,
        }
    }

    /// Stabilize on the right leg (for a left-footed straight kick).
    pub fn right_support() -> StabilizeParams {
        let left = Self::left_support();
        StabilizeParams {
            support_foot_stabilization_position: Vector3::new(
                -left.support_foot_stabilization_position.x,
                left.support_foot_stabilization_position.y,
                left.support_foot_stabilization_position.z,
            ),
            free_foot_target_position: Vector3::new(
                -left.free_foot_target_position.x,
                left.free_foot_target_position.y,
                left.free_foot_target_position.z,
            ),
            intended_leaning_sidewards: -left.intended_leaning_sidewards,
            ..left
        }
    }

    pub fn support_foot_pose(&self) -> Pose6D {
        Pose6D::from_position(self.support_foot_stabilization_position)
    }

    pub fn free_foot_pose(&self) -> Pose6D {
        Pose6D::from_position_angles(self.free_foot_target_position, self.free_foot_target_angles)
    }

    /// The leaning vector encoded by the two leaning angles.
    pub fn intended_leaning(&self) -> Vector3<f32> {
        crate::geometry::rotation_xyz(
            self.intended_leaning_forwards.to_radians(),
            self.intended_leaning_sidewards.to_radians(),
            0.0,
        ) * Vector3::z()
    }
}
