//! 2D pose (position + heading) with local/global frame transforms.

use super::angle::Angle;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2D {
    pub position: Vector2<f32>,
    pub angle: Angle,
}

impl Pose2D {
    pub fn new(x: f32, y: f32, angle: Angle) -> Self {
        Pose2D { position: Vector2::new(x, y), angle }
    }

    pub fn from_position(position: Vector2<f32>, angle: Angle) -> Self {
        Pose2D { position, angle }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.position.y
    }

    /// Transform `other` (given in this pose's local frame) into the frame
    /// this pose lives in.
    pub fn apply_to(&self, other: &Pose2D) -> Pose2D {
        Pose2D {
            position: self.position + self.angle.apply_to(other.position),
            angle: self.angle + other.angle,
        }
    }

    /// Transform `other` (given in this pose's parent frame) into this
    /// pose's local frame. Inverse of [`Pose2D::apply_to`].
    pub fn apply_inverse_to(&self, other: &Pose2D) -> Pose2D {
        Pose2D {
            position: self.angle.apply_inverse_to(other.position - self.position),
            angle: other.angle - self.angle,
        }
    }

    /// Direction from this pose's position to `target`.
    pub fn direction_to(&self, target: Vector2<f32>) -> Angle {
        let diff = target - self.position;
        Angle::rad(diff.y.atan2(diff.x))
    }

    pub fn distance_to(&self, target: Vector2<f32>) -> f32 {
        (target - self.position).norm()
    }
}

/// A target pose paired with the speed intended at that pose. Used by the
/// walk time estimator for multi-leg paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseSpeed2D {
    pub pose: Pose2D,
    pub speed: Vector2<f32>,
}

impl PoseSpeed2D {
    pub fn stationary(pose: Pose2D) -> Self {
        PoseSpeed2D { pose, speed: Vector2::zeros() }
    }
}
