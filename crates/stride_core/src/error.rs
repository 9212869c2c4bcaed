use thiserror::Error;

/// Construction-time configuration failures.
///
/// Every variant is raised while building engine objects from parameter
/// structs and is not recoverable at runtime: a running cycle never sees
/// these errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("movement '{name}' needs at least one cycle, got {cycles}")]
    ZeroLengthMovement { name: &'static str, cycles: usize },

    #[error("walk parameter {name} must be positive, got {value}")]
    NonPositiveWalkParameter { name: &'static str, value: f32 },

    #[error("walk estimator speed for {mode} must be positive, got {value}")]
    NonPositiveSpeed { mode: &'static str, value: f32 },

    #[error("kick '{name}': min distance {min} exceeds max distance {max}")]
    InvalidKickDistanceRange { name: String, min: f32, max: f32 },

    #[error("kick '{name}': speed bound {bound} must be finite and non-negative")]
    InvalidSpeedBound { name: String, bound: f32 },

    #[error("distribution needs at least one bin with positive weight")]
    EmptyDistribution,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = ConfigError::ZeroLengthMovement { name: "walk_stride", cycles: 0 };
        assert!(err.to_string().contains("walk_stride"));

        let err = ConfigError::InvalidKickDistanceRange {
            name: "long_kick".to_string(),
            min: 9.0,
            max: 4.0,
        };
        assert!(err.to_string().contains("long_kick"));
    }
}
