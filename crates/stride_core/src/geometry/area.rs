//! Axis-aligned 2D area, used for kickable footprints.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Area2D {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Area2D {
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Area2D { min_x, max_x, min_y, max_y }
    }

    pub fn contains(&self, point: Vector2<f32>) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let area = Area2D::new(-0.1, 0.1, 0.0, 0.2);
        assert!(area.contains(Vector2::new(0.0, 0.1)));
        assert!(area.contains(Vector2::new(-0.1, 0.0)));
        assert!(!area.contains(Vector2::new(0.11, 0.1)));
        assert!(!area.contains(Vector2::new(0.0, -0.01)));
    }
}
