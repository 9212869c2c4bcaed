//! Per-channel value interpolators.
//!
//! A value interpolator maps `(initial, target, t)` to an interpolated
//! value. The sine-lift variant superimposes a sine arc that is zero at
//! both endpoints: positive amplitude lifts the free foot mid-stride,
//! negative amplitude is the support foot's ground-contact push-down.

use super::progress::ProgressFunction;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ValueInterpolator {
    /// Straight interpolation, optionally reshaped by a progress function.
    Linear(ProgressFunction),
    /// Linear interpolation plus `amplitude * sin(t * PI)`.
    SineLift { amplitude: f32 },
}

impl Default for ValueInterpolator {
    fn default() -> Self {
        ValueInterpolator::Linear(ProgressFunction::Linear)
    }
}

impl ValueInterpolator {
    pub fn linear() -> Self {
        ValueInterpolator::Linear(ProgressFunction::Linear)
    }

    pub fn cosine() -> Self {
        ValueInterpolator::Linear(ProgressFunction::Cosine)
    }

    pub fn sine_half() -> Self {
        ValueInterpolator::Linear(ProgressFunction::SineHalf)
    }

    pub fn sine_lift(amplitude: f32) -> Self {
        ValueInterpolator::SineLift { amplitude }
    }

    /// Replace the sine amplitude, keeping other variants untouched. Step
    /// movements retune the lift channels to the current step height on
    /// every init.
    pub fn set_amplitude(&mut self, new_amplitude: f32) {
        if let ValueInterpolator::SineLift { amplitude } = self {
            *amplitude = new_amplitude;
        }
    }

    #[inline]
    pub fn interpolate(&self, initial: f32, target: f32, t: f32) -> f32 {
        match self {
            ValueInterpolator::Linear(progress) => {
                initial + (target - initial) * progress.eval(t)
            }
            ValueInterpolator::SineLift { amplitude } => {
                let t = t.clamp(0.0, 1.0);
                initial + (target - initial) * t + amplitude * (t * PI).sin()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_endpoints() {
        let interp = ValueInterpolator::linear();
        assert_eq!(interp.interpolate(1.0, 3.0, 0.0), 1.0);
        assert_eq!(interp.interpolate(1.0, 3.0, 1.0), 3.0);
        assert_eq!(interp.interpolate(1.0, 3.0, 0.5), 2.0);
    }

    #[test]
    fn test_sine_lift_peaks_mid_stride() {
        let interp = ValueInterpolator::sine_lift(0.02);
        // endpoints unaffected by the lift
        assert!((interp.interpolate(-0.25, -0.25, 0.0) + 0.25).abs() < 1e-6);
        assert!((interp.interpolate(-0.25, -0.25, 1.0) + 0.25).abs() < 1e-6);
        // peak of the arc at t = 0.5
        let mid = interp.interpolate(-0.25, -0.25, 0.5);
        assert!((mid - (-0.25 + 0.02)).abs() < 1e-6);
    }

    #[test]
    fn test_push_down_is_negative_amplitude() {
        let interp = ValueInterpolator::sine_lift(-0.005);
        let mid = interp.interpolate(-0.25, -0.25, 0.5);
        assert!(mid < -0.25);
    }

    #[test]
    fn test_set_amplitude_only_affects_sine() {
        let mut lift = ValueInterpolator::sine_lift(0.0);
        lift.set_amplitude(0.03);
        assert_eq!(lift, ValueInterpolator::SineLift { amplitude: 0.03 });

        let mut linear = ValueInterpolator::linear();
        linear.set_amplitude(0.03);
        assert_eq!(linear, ValueInterpolator::linear());
    }
}
