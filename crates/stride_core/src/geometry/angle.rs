//! Wraparound-safe angle value type.
//!
//! Stored in degrees, normalized to `(-180, 180]`. All arithmetic
//! re-normalizes, so `deg(170) + deg(20)` lands at `-170` instead of `190`.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Angle {
    degrees: f32,
}

impl Angle {
    pub const ZERO: Angle = Angle { degrees: 0.0 };

    /// Create an angle from degrees, normalizing into `(-180, 180]`.
    pub fn deg(degrees: f32) -> Self {
        Angle { degrees: normalize_degrees(degrees) }
    }

    /// Create an angle from radians.
    pub fn rad(radians: f32) -> Self {
        Self::deg(radians.to_degrees())
    }

    #[inline]
    pub fn degrees(&self) -> f32 {
        self.degrees
    }

    #[inline]
    pub fn radians(&self) -> f32 {
        self.degrees.to_radians()
    }

    /// Rotate a 2D vector by this angle.
    pub fn apply_to(&self, v: Vector2<f32>) -> Vector2<f32> {
        let (sin, cos) = self.radians().sin_cos();
        Vector2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
    }

    /// Rotate a 2D vector by the inverse of this angle.
    pub fn apply_inverse_to(&self, v: Vector2<f32>) -> Vector2<f32> {
        (-*self).apply_to(v)
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, other: Angle) -> Angle {
        Angle::deg(self.degrees + other.degrees)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, other: Angle) -> Angle {
        Angle::deg(self.degrees - other.degrees)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle::deg(-self.degrees)
    }
}

fn normalize_degrees(degrees: f32) -> f32 {
    let mut d = degrees % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}
