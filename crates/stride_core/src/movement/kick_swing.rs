//! The kick swing.
//!
//! Accelerates the free (kicking) foot from the retracted balancing
//! posture forward through the ball contact point while the support foot
//! holds its stabilization pose. The forward channel is cosine-eased, so
//! peak foot speed occurs mid-swing, right around ball contact.

use super::core::{InitialPoses, MovementCore, MovementHandoff, MovementTargets};
use super::{support_foot_from, Movement};
use crate::error::Result;
use crate::geometry::{rot_y, Pose6D};
use crate::interpolation::{PoseInterpolator, ValueInterpolator};
use crate::snapshot::{SupportFoot, WorldSnapshot};
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Tuning of the swing phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KickSwingParams {
    pub swing_cycles: usize,
    /// Cycles the contact posture is held after the swing.
    pub hold_cycles: usize,
    /// Contact pose of the kicking foot (left-support values, i.e. for a
    /// right-footed kick; x is mirrored otherwise).
    pub contact_pose: Pose6D,
    /// Support-foot pose held during the swing (left-support values).
    pub support_pose: Pose6D,
    /// Sideways lean over the support leg during the swing, degrees.
    pub lean_angle: f32,
    pub adjustment_factors: Vector2<f32>,
}

impl Default for KickSwingParams {
    fn default() -> Self {
        KickSwingParams {
            swing_cycles: 8,
            hold_cycles: 4,
            contact_pose: Pose6D::new(-0.075, 0.18, -0.2, -20.0, 0.0, 0.0),
            support_pose: Pose6D::new(0.015, 0.02, -0.3, 0.0, 0.0, 0.0),
            lean_angle: 12.0,
            adjustment_factors: Vector2::new(0.6, 0.6),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KickSwingMovement {
    core: MovementCore,
    params: KickSwingParams,
}

impl KickSwingMovement {
    pub fn new(params: KickSwingParams) -> Result<Self> {
        let mut core = MovementCore::new("kick_swing", params.swing_cycles, params.hold_cycles)?;
        core.support_foot = SupportFoot::Left;
        Ok(KickSwingMovement { core, params })
    }

    fn mirrored(pose: &Pose6D) -> Pose6D {
        Pose6D { x: -pose.x, ..*pose }
    }

    fn wire_interpolators(&mut self) {
        let support = PoseInterpolator::linear();
        // forward channel cosine: fastest mid-swing; height skims through
        // the contact level on a fast-start sine
        let free = PoseInterpolator {
            x: ValueInterpolator::linear(),
            y: ValueInterpolator::cosine(),
            z: ValueInterpolator::sine_half(),
            x_rot: ValueInterpolator::cosine(),
            y_rot: ValueInterpolator::linear(),
            z_rot: ValueInterpolator::linear(),
        };

        match self.core.support_foot {
            SupportFoot::Right => {
                self.core.left_foot_interpolator = free;
                self.core.right_foot_interpolator = support;
            }
            _ => {
                self.core.left_foot_interpolator = support;
                self.core.right_foot_interpolator = free;
            }
        }
    }
}

impl Movement for KickSwingMovement {
    fn core(&self) -> &MovementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MovementCore {
        &mut self.core
    }

    fn init(&mut self, previous: Option<&MovementHandoff>, _world: &WorldSnapshot) {
        let support_foot = support_foot_from(previous, self.core.support_foot);
        self.core.support_foot = support_foot;
        self.wire_interpolators();

        let (left_target, right_target) = match support_foot {
            SupportFoot::Left => (self.params.support_pose, self.params.contact_pose),
            _ => {
                (Self::mirrored(&self.params.contact_pose), Self::mirrored(&self.params.support_pose))
            }
        };

        self.core.begin(previous, InitialPoses::default());
        let targets = MovementTargets {
            left_foot: left_target,
            right_foot: right_target,
            left_arm: Pose6D::default(),
            right_arm: Pose6D::default(),
            adjustment_factors: self.params.adjustment_factors,
        };
        self.core.interpolate_movement(&targets);
    }

    /// After the kick the robot keeps standing on the support leg.
    fn next_support_foot(&self) -> SupportFoot {
        self.core.support_foot
    }

    fn intended_leaning_vector(&self) -> Vector3<f32> {
        let lean = match self.core.support_foot {
            SupportFoot::Left => -self.params.lean_angle,
            _ => self.params.lean_angle,
        };
        rot_y(lean.to_radians()) * Vector3::z()
    }
}
