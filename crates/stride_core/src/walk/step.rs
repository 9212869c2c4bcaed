//! Step parameters: the amplitudes of one stride.

use crate::geometry::Angle;
use serde::{Deserialize, Serialize};

/// Amplitudes of a single stride. Only the step planner's rate-limited
/// update mutates these between cycles, so consecutive steps never jump.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Step {
    /// Lateral amplitude, metres (positive = to the right).
    pub sideward: f32,
    /// Forward amplitude, metres.
    pub forward: f32,
    /// Free-foot lift height, metres.
    pub upward: f32,
    /// Turn per stride.
    pub turn: Angle,
}

impl Step {
    pub fn new(sideward: f32, forward: f32, upward: f32, turn: Angle) -> Self {
        Step { sideward, forward, upward, turn }
    }
}
