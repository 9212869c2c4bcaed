//! Six-channel pose interpolator.
//!
//! Each pose channel (three positions, three rotations) owns an
//! independently configurable value interpolator, so a movement can e.g.
//! ease the forward channel with a cosine while the height channel runs a
//! sine lift.

use super::value::ValueInterpolator;
use crate::geometry::Pose6D;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseInterpolator {
    pub x: ValueInterpolator,
    pub y: ValueInterpolator,
    pub z: ValueInterpolator,
    pub x_rot: ValueInterpolator,
    pub y_rot: ValueInterpolator,
    pub z_rot: ValueInterpolator,
}

impl PoseInterpolator {
    /// All channels linear.
    pub fn linear() -> Self {
        PoseInterpolator::default()
    }

    /// All channels cosine-eased; used by posture movements that start and
    /// end at rest.
    pub fn cosine() -> Self {
        PoseInterpolator {
            x: ValueInterpolator::cosine(),
            y: ValueInterpolator::cosine(),
            z: ValueInterpolator::cosine(),
            x_rot: ValueInterpolator::cosine(),
            y_rot: ValueInterpolator::cosine(),
            z_rot: ValueInterpolator::cosine(),
        }
    }

    pub fn interpolate(&self, initial: &Pose6D, target: &Pose6D, t: f32) -> Pose6D {
        Pose6D {
            x: self.x.interpolate(initial.x, target.x, t),
            y: self.y.interpolate(initial.y, target.y, t),
            z: self.z.interpolate(initial.z, target.z, t),
            x_angle: self.x_rot.interpolate(initial.x_angle, target.x_angle, t),
            y_angle: self.y_rot.interpolate(initial.y_angle, target.y_angle, t),
            z_angle: self.z_rot.interpolate(initial.z_angle, target.z_angle, t),
            rotation_order: target.rotation_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::progress::ProgressFunction;

    #[test]
    fn test_linear_pose_interpolation() {
        let interp = PoseInterpolator::linear();
        let a = Pose6D::new(0.0, 0.0, -0.25, 0.0, 0.0, 0.0);
        let b = Pose6D::new(0.06, 0.04, -0.25, 0.0, 0.0, 20.0);

        let mid = interp.interpolate(&a, &b, 0.5);
        assert!((mid.x - 0.03).abs() < 1e-6);
        assert!((mid.y - 0.02).abs() < 1e-6);
        assert!((mid.z + 0.25).abs() < 1e-6);
        assert!((mid.z_angle - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_mixed_channels_are_independent() {
        let interp = PoseInterpolator {
            y: ValueInterpolator::Linear(ProgressFunction::Cosine),
            z: ValueInterpolator::sine_lift(0.02),
            ..PoseInterpolator::linear()
        };
        let a = Pose6D::new(0.0, 0.0, -0.25, 0.0, 0.0, 0.0);
        let b = Pose6D::new(0.1, 0.1, -0.25, 0.0, 0.0, 0.0);

        let quarter = interp.interpolate(&a, &b, 0.25);
        // x runs linear, y lags behind it under the cosine easing
        assert!((quarter.x - 0.025).abs() < 1e-6);
        assert!(quarter.y < quarter.x);
        // z lifted above the straight line
        assert!(quarter.z > -0.25);
    }
}
