//! 6-DOF pose value type: position plus three Cardan angles.
//!
//! Positions are metres in the torso frame, angles are degrees. The
//! rotation-order tag records how the three angles compose; everything in
//! this crate uses intrinsic X-Y-Z, but the tag travels with the value so
//! a consumer never has to guess.

use super::rotation::{rot_x, rot_y, rot_z, rotation_xyz, xyz_angles_deg};
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Composition order of the three Cardan angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationOrder {
    #[default]
    Xyz,
    Zyx,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose6D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// x-rotation in degrees
    pub x_angle: f32,
    /// y-rotation in degrees
    pub y_angle: f32,
    /// z-rotation in degrees
    pub z_angle: f32,
    pub rotation_order: RotationOrder,
}

impl Pose6D {
    pub fn new(x: f32, y: f32, z: f32, x_angle: f32, y_angle: f32, z_angle: f32) -> Self {
        Pose6D { x, y, z, x_angle, y_angle, z_angle, rotation_order: RotationOrder::Xyz }
    }

    pub fn from_position(position: Vector3<f32>) -> Self {
        Pose6D::new(position.x, position.y, position.z, 0.0, 0.0, 0.0)
    }

    pub fn from_position_angles(position: Vector3<f32>, angles: Vector3<f32>) -> Self {
        Pose6D::new(position.x, position.y, position.z, angles.x, angles.y, angles.z)
    }

    /// Build a pose from a position and a rotation, extracting X-Y-Z Cardan
    /// angles. Near the Cardan singularity the angles degrade to zero.
    pub fn from_position_rotation(position: Vector3<f32>, rotation: &Rotation3<f32>) -> Self {
        let angles = xyz_angles_deg(rotation).unwrap_or_default();
        Pose6D::from_position_angles(position, angles)
    }

    #[inline]
    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn angles_deg(&self) -> Vector3<f32> {
        Vector3::new(self.x_angle, self.y_angle, self.z_angle)
    }

    /// The rotation described by the three angles.
    pub fn rotation(&self) -> Rotation3<f32> {
        let xr = self.x_angle.to_radians();
        let yr = self.y_angle.to_radians();
        let zr = self.z_angle.to_radians();
        match self.rotation_order {
            RotationOrder::Xyz => rotation_xyz(xr, yr, zr),
            RotationOrder::Zyx => rot_z(zr) * rot_y(yr) * rot_x(xr),
        }
    }

    /// Component-wise absolute difference, as a coarse distance measure
    /// between poses (used by tests and telemetry).
    pub fn max_abs_difference(&self, other: &Pose6D) -> f32 {
        let mut max = (self.x - other.x).abs();
        max = max.max((self.y - other.y).abs());
        max = max.max((self.z - other.z).abs());
        max = max.max((self.x_angle - other.x_angle).abs());
        max = max.max((self.y_angle - other.y_angle).abs());
        max.max((self.z_angle - other.z_angle).abs())
    }
}
