//! Walk parameter set.
//!
//! Plain data, serde-derivable, validated fail-fast at engine
//! construction. The original tuning values stem from learning runs on the
//! simulated Nao; the presets trade stride acceleration for stability.

use crate::error::{ConfigError, Result};
use crate::geometry::Angle;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Named tuning presets selectable per `set_movement` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WalkParamSet {
    #[default]
    Normal,
    /// More conservative stride acceleration for contested situations.
    Stable,
    /// Lowest acceleration, e.g. while dribbling at the ball.
    LowAcceleration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkParameters {
    /// Number of control cycles per step.
    pub cycles_per_step: usize,
    /// Walking height of the feet below the torso (negative).
    pub walk_height: f32,
    /// Static lateral offset of each foot from the body centerline.
    pub walk_width: f32,
    /// Static forward/backward shift of the movement center.
    pub walk_offset: f32,
    /// Maximum forward step size, metres.
    pub max_step_length: f32,
    /// Maximum sideward step size, metres.
    pub max_step_width: f32,
    /// Maximum free-foot lift, metres.
    pub max_step_height: f32,
    /// Maximum turn per step.
    pub max_turn_angle: Angle,
    /// Fraction of the step height the support foot pushes down.
    pub push_down_factor: f32,
    /// Permanent slant (x) angle of the feet, degrees.
    pub foot_slant_angle: f32,
    /// Intended forward leaning at full speed, degrees.
    pub max_forward_leaning: f32,
    /// Intended sideways leaning at full speed, degrees.
    pub max_sidewards_leaning: f32,
    /// Forward amplitude change per cycle while speeding up.
    pub acceleration: f32,
    /// Forward amplitude change per cycle while braking.
    pub deceleration: f32,
    pub side_acceleration: f32,
    pub side_deceleration: f32,
    /// Turn change per cycle while speeding up, degrees.
    pub turn_acceleration: f32,
    /// Turn change per cycle while braking, degrees.
    pub turn_deceleration: f32,
    /// Swing the arms counter to the stride.
    pub swing_arms: bool,
    /// Forward arm swing distance per unit of forward step amplitude.
    pub arm_swing_factor: f32,
    /// Balancing adjustment factor, sagittal axis.
    pub sagittal_adjustment_factor: f32,
    /// Clamp on the sagittal balancing correction, degrees.
    pub max_abs_sagittal_adjustment: f32,
    /// Balancing adjustment factor, coronal axis.
    pub coronal_adjustment_factor: f32,
    /// Clamp on the coronal balancing correction, degrees.
    pub max_abs_coronal_adjustment: f32,
}

impl Default for WalkParameters {
    fn default() -> Self {
        WalkParameters {
            cycles_per_step: 14,
            walk_height: -0.25,
            walk_width: 0.06,
            walk_offset: 0.0,
            max_step_length: 0.07,
            max_step_width: 0.07,
            max_step_height: 0.025,
            max_turn_angle: Angle::deg(50.0),
            push_down_factor: 0.2,
            foot_slant_angle: 0.0,
            max_forward_leaning: 0.0,
            max_sidewards_leaning: 0.0,
            acceleration: 0.0035,
            deceleration: 0.0035,
            side_acceleration: 0.0035,
            side_deceleration: 0.0035,
            turn_acceleration: 2.0,
            turn_deceleration: 3.0,
            swing_arms: true,
            arm_swing_factor: 1.5,
            sagittal_adjustment_factor: 0.6,
            max_abs_sagittal_adjustment: 100.0,
            coronal_adjustment_factor: 0.6,
            max_abs_coronal_adjustment: 100.0,
        }
    }
}

impl WalkParameters {
    /// Derive a preset-adjusted copy, keeping all other tuning intact.
    pub fn with_preset(&self, preset: WalkParamSet) -> WalkParameters {
        let mut params = self.clone();
        match preset {
            WalkParamSet::Normal => {}
            WalkParamSet::Stable => {
                params.acceleration = 0.0025;
                params.side_acceleration = 0.0025;
                params.turn_acceleration = 1.5;
            }
            WalkParamSet::LowAcceleration => {
                params.acceleration = 0.0015;
                params.side_acceleration = 0.0015;
                params.turn_acceleration = 1.0;
            }
        }
        params
    }

    /// Balancing adjustment factor pair (sagittal, coronal).
    pub fn adjustment_factors(&self) -> Vector2<f32> {
        Vector2::new(self.sagittal_adjustment_factor, self.coronal_adjustment_factor)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cycles_per_step == 0 {
            return Err(ConfigError::NonPositiveWalkParameter {
                name: "cycles_per_step",
                value: 0.0,
            });
        }
        let positive = [
            ("max_step_length", self.max_step_length),
            ("max_step_width", self.max_step_width),
            ("max_step_height", self.max_step_height),
            ("max_turn_angle", self.max_turn_angle.degrees()),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("side_acceleration", self.side_acceleration),
            ("side_deceleration", self.side_deceleration),
            ("turn_acceleration", self.turn_acceleration),
            ("turn_deceleration", self.turn_deceleration),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositiveWalkParameter { name, value });
            }
        }
        if !(self.walk_height < 0.0) {
            return Err(ConfigError::NonPositiveWalkParameter {
                name: "walk_height (must be below the torso)",
                value: self.walk_height,
            });
        }
        Ok(())
    }
}
