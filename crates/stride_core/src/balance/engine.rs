//! Core balancing computation.

use super::params::BalancingParams;
use crate::geometry::{
    leaning_vector, rot_x, rot_y, rotation_xyz, top_view_orientation, xyz_angles_deg, Pose6D,
};
use crate::math::limit_abs;
use nalgebra::{Rotation3, Vector3};

/// Adjust limb target poses toward the intended leaning.
///
/// Steps: project the orientation estimate to its top view (yaw removed),
/// derive the current leaning vector, compute sagittal/coronal deviation
/// angles against the intended leaning, scale and clamp them (the damping
/// that keeps the feedback loop stable), build the corrective torso
/// rotation and re-derive every pose's pitch/roll and pivot-relative
/// position against it. Yaw of each pose is left untouched.
pub fn adjust_target_poses(
    orientation_estimation: &Rotation3<f32>,
    params: &BalancingParams,
    poses: &[Pose6D],
) -> Vec<Pose6D> {
    let top_view = top_view_orientation(orientation_estimation);

    let intended = params.intended_leaning;
    let current = leaning_vector(&top_view);

    // sagittal deviation about x, coronal about y, both in degrees
    let x_difference = ((-intended.y).atan2(intended.z) - (-current.y).atan2(current.z)).to_degrees();
    let y_difference =
        (intended.x.clamp(-1.0, 1.0).asin() - current.x.clamp(-1.0, 1.0).asin()).to_degrees();

    let foot_x_adjustment = limit_abs(
        x_difference * params.sagittal_adjustment_factor,
        params.max_abs_sagittal_adjustment,
    );
    let foot_y_adjustment = limit_abs(
        y_difference * params.coronal_adjustment_factor,
        params.max_abs_coronal_adjustment,
    );

    // partially corrected torso target rotation; the x-correction is
    // applied inside the full y-rotation frame so both axes stay decoupled
    let rot_x_adjustment = rot_x(foot_x_adjustment.to_radians());
    let rot_y_adjustment = rot_y(foot_y_adjustment.to_radians());
    let rot_y_full = rot_y(y_difference.to_radians());
    let torso_target =
        top_view * (rot_y_full * rot_x_adjustment * (rot_y_full.inverse() * rot_y_adjustment));

    poses.iter().map(|pose| adjust_single_pose(pose, &torso_target, params)).collect()
}

fn adjust_single_pose(
    pose: &Pose6D,
    torso_target: &Rotation3<f32>,
    params: &BalancingParams,
) -> Pose6D {
    // re-derive pitch/roll of the limb against the corrected torso frame
    let limb_rotation = (rotation_xyz(
        -pose.x_angle.to_radians(),
        -pose.y_angle.to_radians(),
        0.0,
    ) * torso_target)
        .inverse();

    // Cardan singularity: fail soft with a zero correction for this limb,
    // next cycle recomputes from fresh input
    let angles = xyz_angles_deg(&limb_rotation).unwrap_or_default();

    let position = params.pivot_point + torso_target.inverse() * pose.position();

    Pose6D {
        x: position.x,
        y: position.y,
        z: position.z,
        x_angle: angles.x,
        y_angle: angles.y,
        z_angle: pose.z_angle,
        rotation_order: pose.rotation_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rot_z;

    fn test_poses() -> (Pose6D, Pose6D) {
        (
            Pose6D::new(-0.12, 0.01, -0.67, 0.0, 0.0, 15.0),
            Pose6D::new(0.12, 0.01, -0.61, 0.0, 0.0, -15.0),
        )
    }

    fn compare_poses(expected: &Pose6D, actual: &Pose6D) {
        assert!((expected.x - actual.x).abs() < 1e-4, "x: {} vs {}", expected.x, actual.x);
        assert!((expected.y - actual.y).abs() < 1e-4, "y: {} vs {}", expected.y, actual.y);
        assert!((expected.z - actual.z).abs() < 1e-4, "z: {} vs {}", expected.z, actual.z);
        assert!(
            (expected.x_angle - actual.x_angle).abs() < 1e-2,
            "x_angle: {} vs {}",
            expected.x_angle,
            actual.x_angle
        );
        assert!(
            (expected.y_angle - actual.y_angle).abs() < 1e-2,
            "y_angle: {} vs {}",
            expected.y_angle,
            actual.y_angle
        );
        assert!(
            (expected.z_angle - actual.z_angle).abs() < 1e-2,
            "z_angle: {} vs {}",
            expected.z_angle,
            actual.z_angle
        );
    }

    #[test]
    fn test_identity_orientation_upright_leaning_passes_through() {
        // intended leaning straight up, robot perfectly upright: zero
        // deviation, poses unchanged (pivot at origin)
        let (left, right) = test_poses();
        let params = BalancingParams::default();

        let adjusted = adjust_target_poses(&Rotation3::identity(), &params, &[left, right]);
        compare_poses(&left, &adjusted[0]);
        compare_poses(&right, &adjusted[1]);
    }

    #[test]
    fn test_pivot_point_translates_positions() {
        let (left, _) = test_poses();
        let params = BalancingParams {
            pivot_point: Vector3::new(0.0, 0.0, -0.075),
            ..BalancingParams::default()
        };

        let adjusted = adjust_target_poses(&Rotation3::identity(), &params, &[left]);
        assert!((adjusted[0].z - (left.z - 0.075)).abs() < 1e-5);
        assert!((adjusted[0].x - left.x).abs() < 1e-5);
    }

    #[test]
    fn test_yaw_invariance() {
        // with full static adjustment, the result must not depend on the
        // yaw component of the orientation estimate
        let (left, right) = test_poses();
        let params = BalancingParams::default();

        let reference = adjust_target_poses(&Rotation3::identity(), &params, &[left, right]);

        let mut z_deg = -175.0f32;
        while z_deg <= 175.0 {
            let orientation = rot_z(z_deg.to_radians());
            let adjusted = adjust_target_poses(&orientation, &params, &[left, right]);
            compare_poses(&reference[0], &adjusted[0]);
            compare_poses(&reference[1], &adjusted[1]);
            z_deg += 35.0;
        }
    }

    #[test]
    fn test_full_static_adjustment_cancels_tilt() {
        // factor 1.0 with unlimited clamps: any x/y tilt of the orientation
        // estimate is fully compensated, so the output equals the upright
        // case regardless of tilt
        let (left, right) = test_poses();
        let params = BalancingParams::default();
        let reference = adjust_target_poses(&Rotation3::identity(), &params, &[left, right]);

        for x_deg in [-66.0f32, -33.0, 0.0, 33.0, 66.0] {
            for y_deg in [-66.0f32, -33.0, 0.0, 33.0, 66.0] {
                let orientation = rotation_xyz(x_deg.to_radians(), y_deg.to_radians(), 0.0);
                let adjusted = adjust_target_poses(&orientation, &params, &[left, right]);
                compare_poses(&reference[0], &adjusted[0]);
                compare_poses(&reference[1], &adjusted[1]);
            }
        }
    }

    #[test]
    fn test_correction_clamped_to_max_abs() {
        // a strong backward tilt with a tight clamp: the applied correction
        // must not exceed the configured maximum
        let (left, _) = test_poses();
        let max_abs = 2.0f32;
        let params = BalancingParams {
            sagittal_adjustment_factor: 1.0,
            max_abs_sagittal_adjustment: max_abs,
            coronal_adjustment_factor: 1.0,
            max_abs_coronal_adjustment: max_abs,
            ..BalancingParams::default()
        };

        let tilted = rotation_xyz(30.0f32.to_radians(), 0.0, 0.0);
        let clamped = adjust_target_poses(&tilted, &params, &[left]);

        // compare against the unclamped correction: with the clamp active
        // the resulting x_angle must stay within max_abs of the
        // zero-correction output
        let zero_correction = BalancingParams {
            sagittal_adjustment_factor: 0.0,
            coronal_adjustment_factor: 0.0,
            ..params.clone()
        };
        let uncorrected = adjust_target_poses(&tilted, &zero_correction, &[left]);

        let applied = (clamped[0].x_angle - uncorrected[0].x_angle).abs();
        assert!(applied <= max_abs + 1e-3, "applied correction {applied} exceeds clamp {max_abs}");
        assert!(applied > 0.0, "clamped correction should still correct something");
    }

    #[test]
    fn test_partial_factor_corrects_partially() {
        let (left, _) = test_poses();
        let tilted = rotation_xyz(20.0f32.to_radians(), 0.0, 0.0);

        let full = adjust_target_poses(&tilted, &BalancingParams::default(), &[left]);
        let half = adjust_target_poses(
            &tilted,
            &BalancingParams {
                sagittal_adjustment_factor: 0.5,
                coronal_adjustment_factor: 0.5,
                ..BalancingParams::default()
            },
            &[left],
        );
        let none = adjust_target_poses(
            &tilted,
            &BalancingParams {
                sagittal_adjustment_factor: 0.0,
                coronal_adjustment_factor: 0.0,
                ..BalancingParams::default()
            },
            &[left],
        );

        // the half-corrected pitch lies strictly between none and full
        let lo = full[0].x_angle.min(none[0].x_angle);
        let hi = full[0].x_angle.max(none[0].x_angle);
        assert!(half[0].x_angle > lo && half[0].x_angle < hi);
    }

    #[test]
    fn test_yaw_channel_untouched() {
        let (left, right) = test_poses();
        let tilted = rotation_xyz(0.2, -0.15, 0.4);
        let adjusted = adjust_target_poses(&tilted, &BalancingParams::default(), &[left, right]);
        assert_eq!(adjusted[0].z_angle, left.z_angle);
        assert_eq!(adjusted[1].z_angle, right.z_angle);
    }
}
