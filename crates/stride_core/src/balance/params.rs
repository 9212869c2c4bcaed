//! Parameter set consumed by the balancing engine.

use nalgebra::Vector3;

/// One cycle's balancing inputs.
///
/// The pivot point is torso-relative and describes around which local point
/// the target poses are rotated. Supplying the current center-of-mass
/// estimate makes the motion system track CoM shifts; a static pelvis
/// point yields a static adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct BalancingParams {
    /// Unit vector the engine steers the body-up direction toward.
    pub intended_leaning: Vector3<f32>,
    pub pivot_point: Vector3<f32>,
    /// 0..1 share of the sagittal (forward/backward) deviation corrected.
    pub sagittal_adjustment_factor: f32,
    /// Clamp on the sagittal correction, degrees.
    pub max_abs_sagittal_adjustment: f32,
    /// 0..1 share of the coronal (sideways) deviation corrected.
    pub coronal_adjustment_factor: f32,
    /// Clamp on the coronal correction, degrees.
    pub max_abs_coronal_adjustment: f32,
}

impl Default for BalancingParams {
    /// Full static adjustment around the torso origin: the engine re-expresses
    /// poses in the intended-leaning frame without damping.
    fn default() -> Self {
        BalancingParams {
            intended_leaning: Vector3::z(),
            pivot_point: Vector3::zeros(),
            sagittal_adjustment_factor: 1.0,
            max_abs_sagittal_adjustment: 360.0,
            coronal_adjustment_factor: 1.0,
            max_abs_coronal_adjustment: 360.0,
        }
    }
}
