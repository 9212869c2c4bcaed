//! Per-movement trajectory buffers.
//!
//! One buffer per limb plus the adjustment-factor pair, allocated once at
//! movement construction and owned exclusively by that movement. Committed
//! entries (indices below the current cycle) are immutable history;
//! recomputation only ever rewrites the remainder.

use crate::geometry::Pose6D;
use nalgebra::Vector2;

#[derive(Debug, Clone, PartialEq)]
pub struct MovementTrajectories {
    pub left_foot: Vec<Pose6D>,
    pub right_foot: Vec<Pose6D>,
    pub left_arm: Vec<Pose6D>,
    pub right_arm: Vec<Pose6D>,
    /// (sagittal, coronal) balancing adjustment factors per cycle.
    pub adjustment_factors: Vec<Vector2<f32>>,
}

impl MovementTrajectories {
    pub fn new(movement_cycles: usize) -> Self {
        MovementTrajectories {
            left_foot: vec![Pose6D::default(); movement_cycles],
            right_foot: vec![Pose6D::default(); movement_cycles],
            left_arm: vec![Pose6D::default(); movement_cycles],
            right_arm: vec![Pose6D::default(); movement_cycles],
            adjustment_factors: vec![Vector2::new(1.0, 1.0); movement_cycles],
        }
    }

    pub fn len(&self) -> usize {
        self.left_foot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left_foot.is_empty()
    }

    /// Grow the buffers to hold at least `movement_cycles` entries. Never
    /// shrinks, so a movement that alternates between long and short
    /// parameterizations allocates only once.
    pub fn ensure_capacity(&mut self, movement_cycles: usize) {
        if self.len() < movement_cycles {
            self.left_foot.resize(movement_cycles, Pose6D::default());
            self.right_foot.resize(movement_cycles, Pose6D::default());
            self.left_arm.resize(movement_cycles, Pose6D::default());
            self.right_arm.resize(movement_cycles, Pose6D::default());
            self.adjustment_factors.resize(movement_cycles, Vector2::new(1.0, 1.0));
        }
    }
}
