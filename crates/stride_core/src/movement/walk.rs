//! The walk stride movement, static and dynamic.
//!
//! One stride per movement run: the free foot travels to the target pose
//! implied by the current step parameters while the support foot trails.
//! The dynamic mode blends the stride's starting pose with the sensed
//! foot poses at low speed (smooth gait start) and shortens the stride at
//! high speed.

use super::core::{InitialPoses, MovementCore, MovementHandoff, MovementTargets};
use super::{assign_step_interpolators, support_foot_from, top_view_foot_pose, Movement};
use crate::error::Result;
use crate::geometry::{rotation_xyz, top_view_orientation, Pose6D};
use crate::interpolation::PoseInterpolator;
use crate::math::linear_fuzzy_value;
use crate::snapshot::{SupportFoot, WorldSnapshot};
use crate::walk::{calculate_foot_target_pose, Step, WalkParameters};
use nalgebra::{Vector2, Vector3};

/// Speed (0..1) below which the sensed foot poses fully dominate the
/// stride start.
const BLEND_LOW_SPEED: f32 = 0.4;
/// Speed above which the canonical stride start fully dominates and the
/// stride shortens.
const BLEND_HIGH_SPEED: f32 = 0.9;
/// Cycles the stride shortens by at high speed.
const FAST_STRIDE_SHORTENING: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Canonical stride starts, full static balancing adjustment.
    Static,
    /// Sensed-pose blending and speed-dependent stride length.
    Dynamic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalkMovement {
    core: MovementCore,
    pub params: WalkParameters,
    mode: WalkMode,
    current_step: Step,
    previous_step: Step,
    /// Step consumed at the next stride start.
    pending_step: Step,
}

impl WalkMovement {
    pub fn new(params: &WalkParameters, mode: WalkMode) -> Result<Self> {
        params.validate()?;
        let mut core = MovementCore::new(
            match mode {
                WalkMode::Static => "static_walk",
                WalkMode::Dynamic => "dynamic_walk",
            },
            params.cycles_per_step,
            0,
        )?;
        core.support_foot = SupportFoot::Left;
        core.set_static(mode == WalkMode::Static);

        Ok(WalkMovement {
            core,
            params: params.clone(),
            mode,
            current_step: Step::default(),
            previous_step: Step::default(),
            pending_step: Step::default(),
        })
    }

    pub fn mode(&self) -> WalkMode {
        self.mode
    }

    /// Queue the step parameters for the next stride. Consumed when the
    /// stride (re)initializes, so mid-stride updates never bend the
    /// trajectory that is already committed.
    pub fn set_next_step(&mut self, step: Step) {
        self.pending_step = step;
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    pub fn set_support_foot(&mut self, support_foot: SupportFoot) {
        self.core.support_foot = support_foot;
    }

    /// Estimated gait speed in [0, 1]: the dominant ratio of the current
    /// amplitudes to their maxima.
    pub fn speed(&self) -> f32 {
        let forward = (self.current_step.forward / self.params.max_step_length).abs();
        let sideward = (self.current_step.sideward / self.params.max_step_width).abs();
        let turn =
            (self.current_step.turn.degrees() / self.params.max_turn_angle.degrees()).abs();
        forward.max(sideward).max(turn)
    }

    fn calculate_movement_trajectory(&mut self, world: &WorldSnapshot) {
        // stride starts at walk height regardless of where the previous
        // movement left the feet vertically
        self.core.left_foot_initial.z = self.params.walk_height;
        self.core.right_foot_initial.z = self.params.walk_height;

        let mut width_offset = 0.0;

        match self.mode {
            WalkMode::Static => {
                self.core.set_movement_cycles(self.params.cycles_per_step);
            }
            WalkMode::Dynamic => {
                let forward_ratio = self.current_step.forward / self.params.max_step_length;
                let sideward_ratio = self.current_step.sideward / self.params.max_step_width;
                let turn_ratio =
                    self.current_step.turn.degrees() / self.params.max_turn_angle.degrees();
                let speed = turn_ratio
                    .abs()
                    .max((forward_ratio * forward_ratio + sideward_ratio * sideward_ratio).sqrt());

                // widen the stance a bit when hanging sideways
                let orientation = world.this_player.orientation;
                let hanging_side = orientation.matrix()[(2, 0)].abs();
                width_offset = linear_fuzzy_value(0.05, 0.5, true, hanging_side) * 0.03;

                if speed < BLEND_HIGH_SPEED {
                    let t = if speed > BLEND_LOW_SPEED {
                        self.core.set_movement_cycles(
                            self.params.cycles_per_step.saturating_sub(FAST_STRIDE_SHORTENING).max(1),
                        );
                        (speed - BLEND_LOW_SPEED) / (BLEND_HIGH_SPEED - BLEND_LOW_SPEED)
                    } else {
                        self.core.set_movement_cycles(self.params.cycles_per_step);
                        0.0
                    };

                    // blend the stride start between the sensed foot poses
                    // (t = 0, gait start from rest) and the canonical poses
                    // carried over from the previous stride (t = 1)
                    let top_view = top_view_orientation(&orientation);
                    let com = world.agent.center_of_mass;
                    let sensed_left = top_view_foot_pose(
                        &world.agent.left_foot,
                        &top_view,
                        com,
                        self.params.walk_height,
                    );
                    let sensed_right = top_view_foot_pose(
                        &world.agent.right_foot,
                        &top_view,
                        com,
                        self.params.walk_height,
                    );

                    let blend = PoseInterpolator::linear();
                    self.core.left_foot_initial =
                        blend.interpolate(&sensed_left, &self.core.left_foot_initial, t);
                    self.core.right_foot_initial =
                        blend.interpolate(&sensed_right, &self.core.right_foot_initial, t);
                } else {
                    self.core.set_movement_cycles(
                        self.params.cycles_per_step.saturating_sub(FAST_STRIDE_SHORTENING).max(1),
                    );
                }
            }
        }

        let left_target = calculate_foot_target_pose(
            &self.current_step,
            SupportFoot::Left,
            self.core.support_foot,
            width_offset,
            &self.params,
        );
        let right_target = calculate_foot_target_pose(
            &self.current_step,
            SupportFoot::Right,
            self.core.support_foot,
            width_offset,
            &self.params,
        );

        let adjustment_targets = match self.mode {
            WalkMode::Static => Vector2::new(1.0, 1.0),
            WalkMode::Dynamic => self.params.adjustment_factors(),
        };

        let (left_arm, right_arm) = self.arm_swing_targets();

        let targets = MovementTargets {
            left_foot: left_target,
            right_foot: right_target,
            left_arm,
            right_arm,
            adjustment_factors: adjustment_targets,
        };
        self.core.interpolate_movement(&targets);
    }

    /// Arm targets countering the stride: the arm opposite to the free
    /// foot swings forward proportionally to the forward amplitude.
    fn arm_swing_targets(&self) -> (Pose6D, Pose6D) {
        if !self.params.swing_arms {
            return (Pose6D::default(), Pose6D::default());
        }

        let swing = self.params.arm_swing_factor * self.current_step.forward;
        // left support: right foot steps forward, left arm counters it
        let (left_y, right_y) = match self.core.support_foot {
            SupportFoot::Left => (swing, -swing),
            _ => (-swing, swing),
        };
        (
            Pose6D::new(0.0, left_y, 0.0, 0.0, 0.0, 0.0),
            Pose6D::new(0.0, right_y, 0.0, 0.0, 0.0, 0.0),
        )
    }

    fn default_initial_poses(&self, world: &WorldSnapshot) -> InitialPoses {
        let mut defaults = InitialPoses {
            adjustment_factors: match self.mode {
                WalkMode::Static => Vector2::new(1.0, 1.0),
                WalkMode::Dynamic => self.params.adjustment_factors(),
            },
            ..InitialPoses::default()
        };

        match self.mode {
            WalkMode::Static => {
                defaults.left_foot =
                    Pose6D::new(-self.params.walk_width, 0.0, self.params.walk_height, 0.0, 0.0, 0.0);
                defaults.right_foot =
                    Pose6D::new(self.params.walk_width, 0.0, self.params.walk_height, 0.0, 0.0, 0.0);
            }
            WalkMode::Dynamic => {
                let top_view = top_view_orientation(&world.this_player.orientation);
                let com = world.agent.center_of_mass;
                defaults.left_foot = top_view_foot_pose(
                    &world.agent.left_foot,
                    &top_view,
                    com,
                    self.params.walk_height,
                );
                defaults.right_foot = top_view_foot_pose(
                    &world.agent.right_foot,
                    &top_view,
                    com,
                    self.params.walk_height,
                );
            }
        }
        defaults
    }
}

impl Movement for WalkMovement {
    fn core(&self) -> &MovementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MovementCore {
        &mut self.core
    }

    fn init(&mut self, previous: Option<&MovementHandoff>, world: &WorldSnapshot) {
        // a new stride consumes the queued step parameters
        self.previous_step = self.current_step;
        self.current_step = self.pending_step;

        let support_foot = support_foot_from(previous, self.core.support_foot);
        self.core.support_foot = support_foot;

        assign_step_interpolators(
            &mut self.core,
            support_foot,
            self.current_step.upward,
            -self.current_step.upward * self.params.push_down_factor,
        );

        let defaults = self.default_initial_poses(world);
        self.core.begin(previous, defaults);
        self.calculate_movement_trajectory(world);
    }

    fn next_support_foot(&self) -> SupportFoot {
        // strides alternate
        self.core.support_foot.opposite()
    }

    fn intended_leaning_vector(&self) -> Vector3<f32> {
        rotation_xyz(
            (-self.params.max_forward_leaning).to_radians(),
            self.params.max_sidewards_leaning.to_radians(),
            0.0,
        ) * Vector3::z()
    }

    fn max_abs_adjustments(&self) -> (f32, f32) {
        (self.params.max_abs_sagittal_adjustment, self.params.max_abs_coronal_adjustment)
    }
}
