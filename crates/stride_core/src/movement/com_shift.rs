//! Targeted step that shifts the center of mass.
//!
//! Moves the free foot to a target pose given relative to the support
//! foot, distributing the step distance across both legs. The support-foot
//! ratio determines how much of the distance the supporting leg performs,
//! which implicitly shifts the center of mass toward (or away from) the
//! free foot's target.

use super::core::{InitialPoses, MovementCore, MovementHandoff, MovementTargets};
use super::{assign_step_interpolators, support_foot_from, top_view_foot_pose, Movement};
use crate::error::Result;
use crate::geometry::{rot_z, top_view_orientation, Pose2D, Pose6D};
use crate::snapshot::{SupportFoot, WorldSnapshot};
use crate::walk::WalkParameters;
use nalgebra::Vector3;

const COM_SHIFT_CYCLES: usize = 10;
const STEP_HEIGHT: f32 = 0.02;

#[derive(Debug, Clone, PartialEq)]
pub struct ComShiftMovement {
    core: MovementCore,
    params: WalkParameters,
    /// Share (0..1) of the step distance performed by the supporting leg.
    support_foot_ratio: f32,
    /// Target pose of the free foot, relative to the support foot.
    target_pose: Pose2D,
}

impl ComShiftMovement {
    pub fn new(params: &WalkParameters) -> Result<Self> {
        Self::with_ratio(params, 2.0 / 3.0)
    }

    pub fn with_ratio(params: &WalkParameters, support_foot_ratio: f32) -> Result<Self> {
        params.validate()?;
        let mut core = MovementCore::new("com_shift_step", COM_SHIFT_CYCLES, 0)?;
        core.support_foot = SupportFoot::Left;

        Ok(ComShiftMovement {
            core,
            params: params.clone(),
            support_foot_ratio,
            target_pose: Pose2D::default(),
        })
    }

    pub fn set_free_foot_target_pose(&mut self, target_pose: Pose2D) {
        self.target_pose = target_pose;
    }

    pub fn free_foot_target_pose(&self) -> Pose2D {
        self.target_pose
    }

    pub fn set_support_foot(&mut self, support_foot: SupportFoot) {
        self.core.support_foot = support_foot;
    }

    pub fn params(&self) -> &WalkParameters {
        &self.params
    }

    pub(crate) fn calculate_movement_trajectory(&mut self) {
        // distribute the step across both legs: the free-foot target is
        // given in the support-foot frame, so the supporting leg moves by
        // the negated, ratio-scaled distance
        let (side_factor, left_factor, right_factor) = match self.core.support_foot {
            SupportFoot::Left => (-1.0, -self.support_foot_ratio, 1.0 - self.support_foot_ratio),
            _ => (1.0, 1.0 - self.support_foot_ratio, -self.support_foot_ratio),
        };

        let left_position = Vector3::new(
            self.target_pose.x() * left_factor,
            self.target_pose.y() * left_factor,
            self.params.walk_height,
        );
        let right_position = Vector3::new(
            self.target_pose.x() * right_factor,
            self.target_pose.y() * right_factor,
            self.params.walk_height,
        );

        // rotate into the half-turned body frame so the step lands where
        // the turned body expects it
        let half_turn = rot_z(-self.target_pose.angle.radians() / 2.0);
        let left_position = half_turn * left_position;
        let right_position = half_turn * right_position;

        let mut left_target = Pose6D::from_position(left_position);
        left_target.z_angle = side_factor * self.target_pose.angle.degrees() / 2.0;
        let mut right_target = Pose6D::from_position(right_position);
        right_target.z_angle = -side_factor * self.target_pose.angle.degrees() / 2.0;

        let targets = MovementTargets {
            left_foot: left_target,
            right_foot: right_target,
            left_arm: Pose6D::default(),
            right_arm: Pose6D::default(),
            adjustment_factors: self.params.adjustment_factors(),
        };
        self.core.interpolate_movement(&targets);
    }

    fn default_initial_poses(&self, world: &WorldSnapshot) -> InitialPoses {
        let top_view = top_view_orientation(&world.this_player.orientation);
        let com = world.agent.center_of_mass;
        InitialPoses {
            left_foot: top_view_foot_pose(
                &world.agent.left_foot,
                &top_view,
                com,
                self.params.walk_height,
            ),
            right_foot: top_view_foot_pose(
                &world.agent.right_foot,
                &top_view,
                com,
                self.params.walk_height,
            ),
            left_arm: Pose6D::default(),
            right_arm: Pose6D::default(),
            adjustment_factors: self.params.adjustment_factors(),
        }
    }
}

impl Movement for ComShiftMovement {
    fn core(&self) -> &MovementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MovementCore {
        &mut self.core
    }

    fn init(&mut self, previous: Option<&MovementHandoff>, world: &WorldSnapshot) {
        let support_foot = support_foot_from(previous, self.core.support_foot);
        self.core.support_foot = support_foot;

        assign_step_interpolators(&mut self.core, support_foot, STEP_HEIGHT, -STEP_HEIGHT);

        let defaults = self.default_initial_poses(world);
        self.core.begin(previous, defaults);
        self.calculate_movement_trajectory();
    }

    fn next_support_foot(&self) -> SupportFoot {
        self.core.support_foot.opposite()
    }
}
