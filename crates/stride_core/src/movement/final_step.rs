//! The final placement step before a kick.
//!
//! A [`ComShiftMovement`] whose free-foot target is derived from the ball
//! position and the intended kick direction: the stabilizing foot is
//! placed so that, once weight transfers onto it, the kicking foot stands
//! correctly behind the ball. The target is refined during the first
//! cycles of the step as the ball estimate sharpens; only the remaining
//! trajectory is rewritten.

use super::com_shift::ComShiftMovement;
use super::core::{MovementCore, MovementHandoff};
use super::Movement;
use crate::error::Result;
use crate::geometry::{xyz_angles_deg, Angle, Pose2D};
use crate::snapshot::{SupportFoot, WorldSnapshot};
use crate::walk::WalkParameters;
use nalgebra::{Vector2, Vector3};

/// Cycles at the start of the step during which the target keeps being
/// refined from the latest ball estimate.
const REFINE_CYCLES: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct FinalStepMovement {
    step: ComShiftMovement,
    /// Target pose of the stabilizing foot relative to ball and kick
    /// direction (in the frame spanned by the kick direction).
    relative_stabilizing_foot_pose: Pose2D,
    intended_kick_direction: Angle,
}

impl FinalStepMovement {
    /// `relative_stabilizing_foot_pose` is interpreted relative to the
    /// ball-hit pose; `support_foot` is the kicking foot, which supports
    /// during this step while the stabilizing foot travels.
    pub fn new(
        params: &WalkParameters,
        relative_stabilizing_foot_pose: Pose2D,
        support_foot: SupportFoot,
    ) -> Result<Self> {
        let mut step = ComShiftMovement::new(params)?;
        step.set_support_foot(support_foot);
        Ok(FinalStepMovement {
            step,
            relative_stabilizing_foot_pose,
            intended_kick_direction: Angle::ZERO,
        })
    }

    pub fn set_intended_kick_direction(&mut self, direction: Angle) {
        self.intended_kick_direction = direction;
    }

    pub fn intended_kick_direction(&self) -> Angle {
        self.intended_kick_direction
    }

    pub fn set_support_foot(&mut self, support_foot: SupportFoot) {
        self.step.set_support_foot(support_foot);
    }

    /// Compute (and remember) the target pose of the stabilizing foot in
    /// the support-foot frame, for the given expected ball position.
    ///
    /// The ball-relative pose is rotated into the intended kick direction,
    /// expressed globally, then transformed into the frame of the current
    /// support (kicking) foot.
    pub fn calculate_stabilization_leg_target_pose(
        &mut self,
        ball_position: Vector3<f32>,
        world: &WorldSnapshot,
    ) -> Pose2D {
        let ball_hit_pose =
            Pose2D::from_position(ball_position.xy(), self.intended_kick_direction);
        let global_stabilizing_target = ball_hit_pose.apply_to(&self.relative_stabilizing_foot_pose);

        // current global pose of the support (kicking) foot
        let support_limb = match self.step.support_foot() {
            SupportFoot::Left => &world.agent.left_foot,
            _ => &world.agent.right_foot,
        };
        let yaw = xyz_angles_deg(&support_limb.orientation).map(|a| a.z).unwrap_or(0.0);
        // torso frame (x lateral, y forward) -> field-style local frame
        let local_foot = Pose2D::new(support_limb.position.y, -support_limb.position.x, Angle::deg(yaw));
        let global_foot = world.this_player.pose.apply_to(&local_foot);

        let target = global_foot.apply_inverse_to(&global_stabilizing_target);

        // back into the torso frame used by foot target poses
        let target_pose = Pose2D::from_position(
            Vector2::new(-target.y(), target.x()),
            target.angle,
        );
        self.step.set_free_foot_target_pose(target_pose);
        target_pose
    }

    pub fn free_foot_target_pose(&self) -> Pose2D {
        self.step.free_foot_target_pose()
    }
}

impl Movement for FinalStepMovement {
    fn core(&self) -> &MovementCore {
        self.step.core()
    }

    fn core_mut(&mut self) -> &mut MovementCore {
        self.step.core_mut()
    }

    fn init(&mut self, previous: Option<&MovementHandoff>, world: &WorldSnapshot) {
        self.step.init(previous, world);
    }

    fn update(&mut self, world: &WorldSnapshot) -> bool {
        if self.step.is_finished() {
            return false;
        }

        // refine the remaining trajectory while the step is young; the
        // stabilizing target has been updated from the latest ball estimate
        let progress = self.step.core().cycle_progress();
        if progress > 0 && progress <= REFINE_CYCLES {
            self.step.calculate_movement_trajectory();
        }

        self.step.update(world)
    }

    fn next_support_foot(&self) -> SupportFoot {
        self.step.next_support_foot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stabilization_target_straight_kick() {
        let params = WalkParameters::default();
        let world = WorldSnapshot::default();
        // kick with the right foot: stabilizing (left) foot lands beside
        // the ball, slightly behind
        let mut movement = FinalStepMovement::new(
            &params,
            Pose2D::new(-0.18, 0.11, Angle::ZERO),
            SupportFoot::Right,
        )
        .unwrap();
        movement.set_intended_kick_direction(Angle::ZERO);

        let ball = Vector3::new(0.2, 0.0, 0.0);
        let target = movement.calculate_stabilization_leg_target_pose(ball, &world);

        // ball 0.2 m ahead (global x = robot forward here): the relative
        // pose (-0.18, 0.11) puts the target 0.02 ahead, 0.11 left; in the
        // torso frame that is x = -0.11 - foot offset, y forward
        assert!(target.angle.degrees().abs() < 1e-3);
        assert!(target.y() < 0.2, "stabilizing foot stays short of the ball");
        assert!(target.x() < 0.0, "stabilizing foot lands left of the kicking foot");
    }

    #[test]
    fn test_refines_only_while_young() {
        let params = WalkParameters::default();
        let world = WorldSnapshot::default();
        let mut movement = FinalStepMovement::new(
            &params,
            Pose2D::new(-0.18, 0.11, Angle::ZERO),
            SupportFoot::Right,
        )
        .unwrap();
        movement.set_intended_kick_direction(Angle::ZERO);
        movement.calculate_stabilization_leg_target_pose(Vector3::new(0.2, 0.0, 0.0), &world);

        movement.init(None, &world);

        // advance past the refinement window
        for _ in 0..=REFINE_CYCLES {
            assert!(movement.update(&world));
        }
        let committed = movement.core().trajectories.left_foot.clone();

        // a drastically different ball estimate now has no effect on the
        // remaining committed trajectory of this step
        movement.calculate_stabilization_leg_target_pose(Vector3::new(1.0, 0.5, 0.0), &world);
        assert!(movement.update(&world));
        // everything up to the current index is untouched
        let index = movement.core().current_index();
        assert_eq!(&movement.core().trajectories.left_foot[..index], &committed[..index]);
    }

    #[test]
    fn test_abort_after_finish() {
        let params = WalkParameters::default();
        let world = WorldSnapshot::default();
        let mut movement =
            FinalStepMovement::new(&params, Pose2D::default(), SupportFoot::Left).unwrap();
        movement.init(None, &world);
        while movement.update(&world) {}
        assert!(!movement.update(&world));
    }
}
