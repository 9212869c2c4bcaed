//! Weight transfer onto the support leg.
//!
//! Shifts the body weight over the support foot and lifts the free foot
//! into a retracted posture, preparing to balance on one leg. Unlike a
//! regular stride, this movement keeps its support foot: the next
//! movement continues on the same leg.

use super::core::{InitialPoses, MovementCore, MovementHandoff, MovementTargets};
use super::{support_foot_from, Movement};
use crate::error::Result;
use crate::geometry::{rot_y, Pose6D};
use crate::interpolation::{PoseInterpolator, ValueInterpolator};
use crate::snapshot::{SupportFoot, WorldSnapshot};
use crate::walk::WalkParameters;
use nalgebra::Vector3;

const GET_ON_LEG_CYCLES: usize = 12;

/// Target offset of the support foot (for a left support foot; x is
/// mirrored for the right).
const SUPPORT_FOOT_TARGET: Vector3<f32> = Vector3::new(-0.01, 0.02, -0.015);
/// Target offset of the free foot (for a left free foot; x mirrored).
const FREE_FOOT_TARGET: Vector3<f32> = Vector3::new(-0.075, -0.06, 0.04);
/// Pitch of the retracted free foot, degrees.
const FREE_FOOT_X_ANGLE: f32 = -30.0;
/// Intended sideways leaning over the support leg, degrees.
const LEAN_ANGLE: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GetOnLegMovement {
    core: MovementCore,
    params: WalkParameters,
}

impl GetOnLegMovement {
    pub fn new(params: &WalkParameters) -> Result<Self> {
        params.validate()?;
        let mut core = MovementCore::new("get_on_leg", GET_ON_LEG_CYCLES, 0)?;
        core.support_foot = SupportFoot::Left;
        Ok(GetOnLegMovement { core, params: params.clone() })
    }

    pub fn set_support_foot(&mut self, support_foot: SupportFoot) {
        self.core.support_foot = support_foot;
    }

    fn wire_interpolators(&mut self) {
        // the support foot settles linearly; the free foot eases sideways
        // and forward while its height rises on a fast-start sine
        let support = PoseInterpolator::linear();
        let free = PoseInterpolator {
            x: ValueInterpolator::cosine(),
            y: ValueInterpolator::cosine(),
            z: ValueInterpolator::sine_half(),
            x_rot: ValueInterpolator::linear(),
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

    fn calculate_movement_trajectory(&mut self) {
        let walk_height = self.params.walk_height;
        let mut left_target = Pose6D::default();
        let mut right_target = Pose6D::default();

        match self.core.support_foot {
            SupportFoot::Left => {
                left_target.x = SUPPORT_FOOT_TARGET.x;
                left_target.y = SUPPORT_FOOT_TARGET.y;
                left_target.z = walk_height + SUPPORT_FOOT_TARGET.z;

                right_target.x = -FREE_FOOT_TARGET.x;
                right_target.y = FREE_FOOT_TARGET.y;
                right_target.z = walk_height + FREE_FOOT_TARGET.z;
                right_target.x_angle = FREE_FOOT_X_ANGLE;
            }
            _ => {
                left_target.x = FREE_FOOT_TARGET.x;
                left_target.y = FREE_FOOT_TARGET.y;
                left_target.z = walk_height + FREE_FOOT_TARGET.z;
                left_target.x_angle = FREE_FOOT_X_ANGLE;

                right_target.x = -SUPPORT_FOOT_TARGET.x;
                right_target.y = SUPPORT_FOOT_TARGET.y;
                right_target.z = walk_height + SUPPORT_FOOT_TARGET.z;
            }
        }

        let targets = MovementTargets {
            left_foot: left_target,
            right_foot: right_target,
            left_arm: Pose6D::default(),
            right_arm: Pose6D::default(),
            adjustment_factors: self.params.adjustment_factors(),
        };
        self.core.interpolate_movement(&targets);
    }
}

impl Movement for GetOnLegMovement {
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

        self.core.begin(previous, InitialPoses::default());
        self.calculate_movement_trajectory();
    }

    /// Stays on the same leg: the successor balances on this support foot.
    fn next_support_foot(&self) -> SupportFoot {
        self.core.support_foot
    }

    fn intended_leaning_vector(&self) -> Vector3<f32> {
        let lean = match self.core.support_foot {
            SupportFoot::Left => -LEAN_ANGLE,
            _ => LEAN_ANGLE,
        };
        rot_y(lean.to_radians()) * Vector3::z()
    }

    fn max_abs_adjustments(&self) -> (f32, f32) {
        (self.params.max_abs_sagittal_adjustment, self.params.max_abs_coronal_adjustment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_foot_retracts_and_lifts() {
        let params = WalkParameters::default();
        let world = WorldSnapshot::default();
        let mut movement = GetOnLegMovement::new(&params).unwrap();
        movement.set_support_foot(SupportFoot::Right);

        movement.init(None, &world);
        while movement.update(&world) {}

        // free (left) foot ends retracted, lifted and pitched down
        let left = movement.core().left_foot_pose();
        assert!((left.z - (params.walk_height + FREE_FOOT_TARGET.z)).abs() < 1e-5);
        assert!((left.x_angle - FREE_FOOT_X_ANGLE).abs() < 1e-4);
        // support (right) foot pushes slightly below walk height
        let right = movement.core().right_foot_pose();
        assert!(right.z < params.walk_height + 1e-6);
    }

    #[test]
    fn test_keeps_support_foot_for_successor() {
        let params = WalkParameters::default();
        let mut movement = GetOnLegMovement::new(&params).unwrap();
        movement.set_support_foot(SupportFoot::Right);
        assert_eq!(movement.next_support_foot(), SupportFoot::Right);
    }

    #[test]
    fn test_leans_over_support_leg() {
        let params = WalkParameters::default();
        let mut movement = GetOnLegMovement::new(&params).unwrap();

        movement.set_support_foot(SupportFoot::Left);
        // leaning toward the left support leg tips the up-vector to -x
        assert!(movement.intended_leaning_vector().x < 0.0);

        movement.set_support_foot(SupportFoot::Right);
        assert!(movement.intended_leaning_vector().x > 0.0);
    }
}
