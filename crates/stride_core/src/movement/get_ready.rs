//! Movement into the canonical standing posture.
//!
//! Drives both feet from wherever they are to the walk-ready stance on
//! cosine-eased channels. Serves as the entry movement of the engine and
//! as a neutral recovery posture.

use super::core::{InitialPoses, MovementCore, MovementHandoff, MovementTargets};
use super::Movement;
use crate::error::Result;
use crate::geometry::Pose6D;
use crate::interpolation::{PoseInterpolator, ValueInterpolator};
use crate::snapshot::{SupportFoot, WorldSnapshot};
use crate::walk::WalkParameters;
use nalgebra::Vector2;

const GET_READY_CYCLES: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct GetReadyMovement {
    core: MovementCore,
    params: WalkParameters,
}

impl GetReadyMovement {
    pub fn new(params: &WalkParameters) -> Result<Self> {
        params.validate()?;
        let mut core = MovementCore::new("get_ready", GET_READY_CYCLES, 0)?;
        core.support_foot = SupportFoot::Both;
        core.set_static(true);

        core.left_foot_interpolator = PoseInterpolator::cosine();
        core.right_foot_interpolator = PoseInterpolator::cosine();
        core.left_arm_interpolator = PoseInterpolator::cosine();
        core.right_arm_interpolator = PoseInterpolator::cosine();
        core.sagittal_interpolator = ValueInterpolator::linear();
        core.coronal_interpolator = ValueInterpolator::linear();

        Ok(GetReadyMovement { core, params: params.clone() })
    }

    fn ready_targets(&self) -> MovementTargets {
        MovementTargets {
            left_foot: Pose6D::new(
                -self.params.walk_width,
                self.params.walk_offset,
                self.params.walk_height,
                self.params.foot_slant_angle,
                0.0,
                0.0,
            ),
            right_foot: Pose6D::new(
                self.params.walk_width,
                self.params.walk_offset,
                self.params.walk_height,
                self.params.foot_slant_angle,
                0.0,
                0.0,
            ),
            left_arm: Pose6D::default(),
            right_arm: Pose6D::default(),
            // fully static: the balancing engine holds the posture upright
            adjustment_factors: Vector2::new(1.0, 1.0),
        }
    }
}

impl Movement for GetReadyMovement {
    fn core(&self) -> &MovementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MovementCore {
        &mut self.core
    }

    fn init(&mut self, previous: Option<&MovementHandoff>, world: &WorldSnapshot) {
        // without a predecessor, start from the feet as they are sensed
        let defaults = InitialPoses {
            left_foot: Pose6D::from_position(world.agent.left_foot.position),
            right_foot: Pose6D::from_position(world.agent.right_foot.position),
            left_arm: Pose6D::default(),
            right_arm: Pose6D::default(),
            adjustment_factors: Vector2::new(1.0, 1.0),
        };
        self.core.begin(previous, defaults);

        let targets = self.ready_targets();
        self.core.interpolate_movement(&targets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaches_ready_stance() {
        let params = WalkParameters::default();
        let world = WorldSnapshot::default();
        let mut movement = GetReadyMovement::new(&params).unwrap();

        movement.init(None, &world);
        while movement.update(&world) {}

        let left = movement.core().left_foot_pose();
        let right = movement.core().right_foot_pose();
        assert!((left.x + params.walk_width).abs() < 1e-5);
        assert!((right.x - params.walk_width).abs() < 1e-5);
        assert!((left.z - params.walk_height).abs() < 1e-5);
        assert_eq!(movement.support_foot(), SupportFoot::Both);
    }

    #[test]
    fn test_starts_from_sensed_feet() {
        let params = WalkParameters::default();
        let world = WorldSnapshot::default();
        let mut movement = GetReadyMovement::new(&params).unwrap();

        movement.init(None, &world);
        movement.update(&world);

        // the first interpolated pose is still close to the sensed stance
        let left = movement.core().left_foot_pose();
        assert!((left.x - world.agent.left_foot.position.x).abs() < 0.01);
    }
}
