//! Step planning: rate-limited step updates and per-foot target poses.

use super::params::WalkParameters;
use super::step::Step;
use crate::geometry::{Angle, Pose2D, Pose6D};
use crate::math::adjust_toward;
use crate::snapshot::SupportFoot;
use nalgebra::Vector2;

/// Inward lateral excursion limit: a foot may approach the midline by at
/// most this much (metres). Crossing it would tangle the legs.
const INWARD_LIMIT: f32 = -0.02;

/// Advance the current step one cycle toward the intended velocity/turn.
///
/// `intended_velocity` is (forward, sideward) as factors in [-1, 1]; a
/// longer vector is clamped to the unit disk. Every amplitude moves by at
/// most its acceleration (away from zero) or deceleration (toward zero)
/// and lands exactly on its target, which bounds stride-to-stride jerk.
pub fn calculate_step(
    current: &Step,
    intended_velocity: Vector2<f32>,
    intended_turn: Angle,
    params: &WalkParameters,
) -> Step {
    let speed = if intended_velocity.norm() > 1.0 {
        intended_velocity.normalize()
    } else {
        intended_velocity
    };

    let target_step_width = params.max_step_width * -speed.y;
    let target_step_length = params.max_step_length * speed.x;
    let target_turn = crate::math::limit_abs(intended_turn.degrees(), params.max_turn_angle.degrees());

    Step {
        sideward: adjust_toward(
            current.sideward,
            target_step_width,
            params.side_acceleration,
            params.side_deceleration,
        ),
        forward: adjust_toward(
            current.forward,
            target_step_length,
            params.acceleration,
            params.deceleration,
        ),
        upward: params.max_step_height,
        turn: Angle::deg(adjust_toward(
            current.turn.degrees(),
            target_turn,
            params.turn_acceleration,
            params.turn_deceleration,
        )),
    }
}

/// Map step amplitudes to a concrete target pose for one foot.
///
/// The sign conventions: left side is negative x, the free foot mirrors
/// the support foot's amplitudes. Inward excursion is clamped so the feet
/// never cross the midline, and the foot may only yaw away from (never
/// across) the midline.
pub fn calculate_foot_target_pose(
    step: &Step,
    target_foot: SupportFoot,
    support_foot: SupportFoot,
    width_offset: f32,
    params: &WalkParameters,
) -> Pose6D {
    let side = target_foot.side_sign();
    let support = support_foot.side_sign();

    let mut target_x = -side * support * step.sideward;
    if side * target_x < INWARD_LIMIT {
        target_x = INWARD_LIMIT * side;
    }
    target_x += side * (params.walk_width + width_offset);

    let target_y = params.walk_offset - side * support * step.forward;

    let mut target_z_angle = -side * support * step.turn.degrees();
    if side * target_z_angle > 0.0 {
        target_z_angle = 0.0;
    }

    Pose6D::new(
        target_x,
        target_y,
        params.walk_height,
        params.foot_slant_angle,
        0.0,
        target_z_angle,
    )
}

/// The 2D pose of the free foot relative to the support foot implied by a
/// step, in a frame facing the walk direction. Used by path reasoning and
/// the kick evaluator to predict where the next stride lands.
pub fn calculate_relative_free_foot_pose(
    step: &Step,
    support_foot: SupportFoot,
    params: &WalkParameters,
) -> Pose2D {
    let free_foot = support_foot.opposite();
    let support_pose = calculate_foot_target_pose(step, support_foot, support_foot, 0.0, params);
    let free_pose = calculate_foot_target_pose(step, free_foot, support_foot, 0.0, params);

    // torso frame (x lateral, y forward) -> field-style frame (x forward)
    let support_2d = Pose2D::new(support_pose.y, -support_pose.x, Angle::deg(support_pose.z_angle));
    let free_2d = Pose2D::new(free_pose.y, -free_pose.x, Angle::deg(free_pose.z_angle));

    support_2d.apply_inverse_to(&free_2d)
}
