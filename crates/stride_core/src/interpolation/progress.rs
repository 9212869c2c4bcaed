//! Progress functions: reshape a linear progress `t ∈ [0, 1]` before it is
//! fed to a value interpolator. All functions map 0 → 0 and 1 → 1.

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProgressFunction {
    /// Identity: constant-velocity interpolation.
    #[default]
    Linear,
    /// Cosine easing: slow start, slow end, fastest mid-way.
    Cosine,
    /// First quarter of the sine wave: fast start, eased end.
    SineHalf,
}

impl ProgressFunction {
    #[inline]
    pub fn eval(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            ProgressFunction::Linear => t,
            ProgressFunction::Cosine => (1.0 - (t * PI).cos()) / 2.0,
            ProgressFunction::SineHalf => (t * FRAC_PI_2).sin(),
        }
    }
}
