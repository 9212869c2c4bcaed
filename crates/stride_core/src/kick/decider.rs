//! Runtime kick target state.
//!
//! Holds the mutable side of a kick: where the ball is expected, which
//! direction and distance the strategy currently wants, and the
//! stabilization target pose computed by the kick behavior. The immutable
//! configuration lives in [`KickParameters`].

use super::distribution::KickDistribution;
use super::params::KickParameters;
use crate::geometry::{Angle, Pose2D};
use crate::math::linear_fuzzy_value;
use crate::snapshot::{SupportFoot, WorldSnapshot};
use nalgebra::{Vector2, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct KickDecider {
    params: KickParameters,
    pub distribution: Option<KickDistribution>,

    /// Rotated into the kick-direction frame at construction.
    relative_run_to_pose: Pose2D,

    // runtime target state
    intended_kick_direction: Angle,
    kick_direction: Angle,
    intended_kick_distance: f32,
    expected_ball_position: Vector3<f32>,
    /// Stabilizing-foot target in the support-foot frame; refreshed by the
    /// kick behavior before each decision.
    target_pose: Pose2D,
}

impl KickDecider {
    pub fn new(params: KickParameters, distribution: Option<KickDistribution>) -> Self {
        let kick_dir_pose = Pose2D::new(0.0, 0.0, params.relative_kick_direction);
        let relative_run_to_pose = kick_dir_pose.apply_inverse_to(&params.relative_run_to_pose);
        KickDecider {
            params,
            distribution,
            relative_run_to_pose,
            intended_kick_direction: Angle::ZERO,
            kick_direction: Angle::ZERO,
            intended_kick_distance: 0.0,
            expected_ball_position: Vector3::zeros(),
            target_pose: Pose2D::default(),
        }
    }

    pub fn params(&self) -> &KickParameters {
        &self.params
    }

    pub fn kicking_foot(&self) -> SupportFoot {
        self.params.kicking_foot
    }

    pub fn set_intended_kick_direction(&mut self, direction: Angle) {
        self.intended_kick_direction = direction;
        self.kick_direction = direction;
    }

    pub fn intended_kick_direction(&self) -> Angle {
        self.intended_kick_direction
    }

    pub fn kick_direction(&self) -> Angle {
        self.kick_direction
    }

    pub fn set_intended_kick_distance(&mut self, distance: f32) {
        self.intended_kick_distance = distance;
    }

    pub fn intended_kick_distance(&self) -> f32 {
        self.intended_kick_distance
    }

    pub fn set_expected_ball_position(&mut self, position: Vector3<f32>) {
        self.expected_ball_position = position;
    }

    pub fn expected_ball_position(&self) -> Vector3<f32> {
        self.expected_ball_position
    }

    pub fn set_target_pose(&mut self, pose: Pose2D) {
        self.target_pose = pose;
    }

    pub fn target_pose(&self) -> Pose2D {
        self.target_pose
    }

    pub fn relative_run_to_pose(&self) -> Pose2D {
        self.relative_run_to_pose
    }

    /// Where the ball is expected at foot contact.
    pub fn ball_position_at_kick(&self, world: &WorldSnapshot) -> Vector3<f32> {
        let cycles = self.params.ball_hit_cycles.min(150);
        world.ball.future_position(cycles)
    }

    /// Global pose to walk to in order to perform this kick.
    ///
    /// When our approach direction deviates strongly from the kick
    /// direction we keep extra distance, so there is room to walk around
    /// the ball instead of into it.
    pub fn absolute_run_to_pose(&self, world: &WorldSnapshot) -> Pose2D {
        let mut relative_position = Vector2::new(
            self.relative_run_to_pose.x() - world.field.ball_radius_offset,
            self.relative_run_to_pose.y(),
        );

        let direction = self.intended_kick_direction + self.relative_run_to_pose.angle;
        let our_direction = world.this_player.horizontal_angle();
        let delta = (direction - our_direction).degrees().abs();
        if delta > 20.0 {
            let keep_away = 1.0 + linear_fuzzy_value(20.0, 80.0, true, delta) * 0.5;
            relative_position *= keep_away;
        }

        let global_offset = self.intended_kick_direction.apply_to(relative_position);
        let ball = self.expected_ball_position;
        Pose2D::new(ball.x + global_offset.x, ball.y + global_offset.y, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decider() -> KickDecider {
        KickDecider::new(KickParameters::straight_kick(SupportFoot::Right, 8.0), None)
    }

    #[test]
    fn test_intended_direction_sets_kick_direction() {
        let mut testee = decider();
        testee.set_intended_kick_direction(Angle::deg(30.0));
        assert_eq!(testee.kick_direction().degrees(), 30.0);
    }

    #[test]
    fn test_absolute_run_to_pose_behind_ball() {
        let mut testee = decider();
        let world = WorldSnapshot::default();
        testee.set_expected_ball_position(Vector3::new(2.0, 0.0, 0.0));
        testee.set_intended_kick_direction(Angle::ZERO);

        let pose = testee.absolute_run_to_pose(&world);
        // the run-to pose sits behind the ball along the kick direction
        assert!(pose.x() < 2.0);
        assert!((pose.angle.degrees()).abs() < 1e-4);
    }

    #[test]
    fn test_keep_away_factor_scales_offset() {
        let mut testee = decider();
        let mut world = WorldSnapshot::default();
        testee.set_expected_ball_position(Vector3::new(2.0, 0.0, 0.0));

        // kick direction opposite to our heading: keep extra distance
        world.this_player.pose.angle = Angle::deg(170.0);
        testee.set_intended_kick_direction(Angle::ZERO);
        let far = testee.absolute_run_to_pose(&world);

        world.this_player.pose.angle = Angle::ZERO;
        let near = testee.absolute_run_to_pose(&world);

        let ball = Vector2::new(2.0, 0.0);
        assert!((far.position - ball).norm() > (near.position - ball).norm());
    }

    #[test]
    fn test_ball_position_at_kick_uses_prediction() {
        let mut world = WorldSnapshot::default();
        world.ball.speed = Vector3::new(0.01, 0.0, 0.0);
        let testee = decider();
        let predicted = testee.ball_position_at_kick(&world);
        assert!(predicted.x > 0.0);
    }
}
