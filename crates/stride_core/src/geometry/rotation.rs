//! Rotation helpers: axis rotations, intrinsic X-Y-Z composition and
//! extraction, and the top-view projection used by the balancing engine.
//!
//! All rotations act as vector operators: `r * v` rotates `v`, and
//! `a * b` composes so that `(a * b) * v == a * (b * v)`.

use nalgebra::{Rotation3, Vector3};

/// Rotation about the body x-axis (radians).
#[inline]
pub fn rot_x(angle_rad: f32) -> Rotation3<f32> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), angle_rad)
}

/// Rotation about the body y-axis (radians).
#[inline]
pub fn rot_y(angle_rad: f32) -> Rotation3<f32> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), angle_rad)
}

/// Rotation about the body z-axis (radians).
#[inline]
pub fn rot_z(angle_rad: f32) -> Rotation3<f32> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), angle_rad)
}

/// Compose intrinsic X-Y-Z Cardan angles (radians) into a rotation:
/// `Rx(x) * Ry(y) * Rz(z)`.
#[inline]
pub fn rotation_xyz(x_rad: f32, y_rad: f32, z_rad: f32) -> Rotation3<f32> {
    rot_x(x_rad) * rot_y(y_rad) * rot_z(z_rad)
}

/// Threshold on the `sin(y)` matrix entry beyond which the X-Y-Z Cardan
/// extraction is considered singular.
const CARDAN_SINGULARITY_LIMIT: f32 = 1.0 - 1e-6;

/// Extract intrinsic X-Y-Z Cardan angles (degrees) from a rotation.
///
/// Returns `None` at the Cardan singularity (|y-angle| near 90°), where the
/// x/z split is undefined. Callers degrade to a zero correction for the
/// cycle.
pub fn xyz_angles_deg(rotation: &Rotation3<f32>) -> Option<Vector3<f32>> {
    let m = rotation.matrix();
    let sin_y = m[(0, 2)];
    if sin_y.abs() >= CARDAN_SINGULARITY_LIMIT {
        return None;
    }

    let x = (-m[(1, 2)]).atan2(m[(2, 2)]);
    let y = sin_y.asin();
    let z = (-m[(0, 1)]).atan2(m[(0, 0)]);

    Some(Vector3::new(x.to_degrees(), y.to_degrees(), z.to_degrees()))
}

/// The z-rotation (radians) that removes the yaw component of an
/// orientation when applied on top of it.
pub fn top_view_z_angle(orientation: &Rotation3<f32>) -> f32 {
    let m = orientation.matrix();
    m[(0, 1)].atan2(m[(1, 1)])
}

/// Project an orientation to its top view: the same orientation with the
/// rotation about the vertical removed. The projected frame's tilt is what
/// the balancing engine feeds back on.
pub fn top_view_orientation(orientation: &Rotation3<f32>) -> Rotation3<f32> {
    rot_z(top_view_z_angle(orientation)) * orientation
}

/// The leaning vector of an orientation: the image of the vertical unit
/// vector, read from the third column of the rotation matrix.
pub fn leaning_vector(orientation: &Rotation3<f32>) -> Vector3<f32> {
    let m = orientation.matrix();
    Vector3::new(m[(0, 2)], m[(1, 2)], m[(2, 2)])
}
