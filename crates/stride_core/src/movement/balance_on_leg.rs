//! Balancing into the one-legged target posture.
//!
//! Cosine-eased movement from wherever the weight transfer left the feet
//! into the configured balancing posture: support foot under the body,
//! free foot retracted behind, torso leaning over the support leg. The
//! hold phase keeps the posture until the composer moves on.

use super::core::{InitialPoses, MovementCore, MovementHandoff, MovementTargets};
use super::{support_foot_from, Movement};
use crate::error::Result;
use crate::geometry::Pose6D;
use crate::interpolation::PoseInterpolator;
use crate::snapshot::{SupportFoot, WorldSnapshot};
use nalgebra::{Vector2, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceOnLegMovement {
    core: MovementCore,
    /// Posture target for the supporting foot (left-support values; x is
    /// mirrored for a right support).
    support_foot_target: Pose6D,
    /// Posture target for the free foot (left-support values).
    free_foot_target: Pose6D,
    /// Intended leaning while balanced (left-support value; x mirrored).
    intended_leaning: Vector3<f32>,
    adjustment_factors: Vector2<f32>,
}

impl BalanceOnLegMovement {
    pub fn new(
        support_foot_target: Pose6D,
        free_foot_target: Pose6D,
        intended_leaning: Vector3<f32>,
        movement_cycles: usize,
        hold_cycles: usize,
        adjustment_factors: Vector2<f32>,
    ) -> Result<Self> {
        let mut core = MovementCore::new("balance_on_leg", movement_cycles, hold_cycles)?;
        core.support_foot = SupportFoot::Left;
        core.left_foot_interpolator = PoseInterpolator::cosine();
        core.right_foot_interpolator = PoseInterpolator::cosine();
        core.left_arm_interpolator = PoseInterpolator::cosine();
        core.right_arm_interpolator = PoseInterpolator::cosine();

        Ok(BalanceOnLegMovement {
            core,
            support_foot_target,
            free_foot_target,
            intended_leaning,
            adjustment_factors,
        })
    }

    pub fn set_targets(
        &mut self,
        support_foot_target: Pose6D,
        free_foot_target: Pose6D,
        intended_leaning: Vector3<f32>,
    ) {
        self.support_foot_target = support_foot_target;
        self.free_foot_target = free_foot_target;
        self.intended_leaning = intended_leaning;
    }

    fn mirrored(pose: &Pose6D) -> Pose6D {
        Pose6D { x: -pose.x, ..*pose }
    }
}

impl Movement for BalanceOnLegMovement {
    fn core(&self) -> &MovementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MovementCore {
        &mut self.core
    }

    fn init(&mut self, previous: Option<&MovementHandoff>, _world: &WorldSnapshot) {
        let support_foot = support_foot_from(previous, self.core.support_foot);
        self.core.support_foot = support_foot;

        let (left_target, right_target) = match support_foot {
            SupportFoot::Left => (self.support_foot_target, self.free_foot_target),
            _ => {
                (Self::mirrored(&self.free_foot_target), Self::mirrored(&self.support_foot_target))
            }
        };

        self.core.begin(previous, InitialPoses::default());
        let targets = MovementTargets {
            left_foot: left_target,
            right_foot: right_target,
            left_arm: Pose6D::default(),
            right_arm: Pose6D::default(),
            adjustment_factors: self.adjustment_factors,
        };
        self.core.interpolate_movement(&targets);
    }

    /// Balancing keeps its leg: the kick swing that follows stands on the
    /// same support foot.
    fn next_support_foot(&self) -> SupportFoot {
        self.core.support_foot
    }

    fn intended_leaning_vector(&self) -> Vector3<f32> {
        match self.core.support_foot {
            SupportFoot::Left => self.intended_leaning,
            _ => Vector3::new(-self.intended_leaning.x, self.intended_leaning.y, self.intended_leaning.z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rot_y;

    fn movement() -> BalanceOnLegMovement {
        BalanceOnLegMovement::new(
            Pose6D::new(0.015, 0.02, -0.3, 0.0, 0.0, 0.0),
            Pose6D::new(-0.075, -0.16, -0.17, -70.0, 0.0, 0.0),
            rot_y((-12.0f32).to_radians()) * Vector3::z(),
            18,
            0,
            Vector2::new(0.6, 0.6),
        )
        .unwrap()
    }

    #[test]
    fn test_targets_assigned_by_support_foot() {
        let world = WorldSnapshot::default();
        let mut testee = movement();
        testee.core_mut().support_foot = SupportFoot::Left;

        testee.init(None, &world);
        while testee.update(&world) {}

        let left = testee.core().left_foot_pose();
        let right = testee.core().right_foot_pose();
        assert!((left.z + 0.3).abs() < 1e-4, "support foot near its posture target");
        assert!((right.x_angle + 70.0).abs() < 1e-3, "free foot pitched for the swing");
    }

    #[test]
    fn test_targets_mirror_for_right_support() {
        let world = WorldSnapshot::default();
        let mut testee = movement();
        testee.core_mut().support_foot = SupportFoot::Right;

        testee.init(None, &world);
        while testee.update(&world) {}

        let left = testee.core().left_foot_pose();
        let right = testee.core().right_foot_pose();
        // mirrored: right foot is the support, left foot swings free
        assert!((right.z + 0.3).abs() < 1e-4);
        assert!((right.x + 0.015).abs() < 1e-4, "support x mirrored");
        assert!((left.x - 0.075).abs() < 1e-4, "free x mirrored");
        assert!((left.x_angle + 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_leaning_mirrors_with_support_foot() {
        let mut testee = movement();
        testee.core_mut().support_foot = SupportFoot::Left;
        let left_lean = testee.intended_leaning_vector();
        testee.core_mut().support_foot = SupportFoot::Right;
        let right_lean = testee.intended_leaning_vector();
        assert!((left_lean.x + right_lean.x).abs() < 1e-6, "lateral lean mirrors");
        assert!((left_lean.z - right_lean.z).abs() < 1e-6);
    }

    #[test]
    fn test_hold_cycles_keep_posture() {
        let world = WorldSnapshot::default();
        let mut testee = BalanceOnLegMovement::new(
            Pose6D::new(0.015, 0.02, -0.3, 0.0, 0.0, 0.0),
            Pose6D::new(-0.075, -0.16, -0.17, -70.0, 0.0, 0.0),
            Vector3::z(),
            18,
            10,
            Vector2::new(0.6, 0.6),
        )
        .unwrap();
        testee.init(None, &world);

        let mut cycles = 0;
        while testee.update(&world) {
            cycles += 1;
        }
        assert_eq!(cycles, 28, "movement plus hold cycles");
    }
}
