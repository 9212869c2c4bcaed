//! Discrete motion units ("movements") and their shared lifecycle.
//!
//! Every movement follows the same contract: `init(previous)` seeds
//! continuity from the predecessor's current pose, `update()` advances one
//! cycle and reports `false` once finished (the abort signal), and the
//! composer reads the per-cycle poses plus balancing parameters. The
//! concrete kinds form a closed set, composed by the behaviors in
//! [`crate::behavior`].

pub mod balance_on_leg;
pub mod com_shift;
pub mod core;
pub mod final_step;
pub mod get_on_leg;
pub mod get_ready;
pub mod kick_swing;
pub mod trajectories;
pub mod walk;

pub use self::core::{InitialPoses, MovementCore, MovementHandoff, MovementTargets};
pub use balance_on_leg::BalanceOnLegMovement;
pub use com_shift::ComShiftMovement;
pub use final_step::FinalStepMovement;
pub use get_on_leg::GetOnLegMovement;
pub use get_ready::GetReadyMovement;
pub use kick_swing::{KickSwingMovement, KickSwingParams};
pub use trajectories::MovementTrajectories;
pub use walk::{WalkMode, WalkMovement};

use crate::balance::BalancingParams;
use crate::geometry::Pose6D;
use crate::interpolation::{PoseInterpolator, ValueInterpolator};
use crate::snapshot::{LimbPose, SupportFoot, WorldSnapshot};
use nalgebra::{Rotation3, Vector3};

/// Lifecycle shared by every movement kind.
pub trait Movement {
    fn core(&self) -> &MovementCore;
    fn core_mut(&mut self) -> &mut MovementCore;

    /// Restart the movement, seeding continuity from `previous` when there
    /// is one, and (re)compute the trajectory for the current situation.
    fn init(&mut self, previous: Option<&MovementHandoff>, world: &WorldSnapshot);

    /// Advance one cycle; `false` signals abort/finish to the composer.
    fn update(&mut self, world: &WorldSnapshot) -> bool {
        self.core_mut()
            .update(world.agent.center_of_mass, world.agent.static_pivot_point)
    }

    /// The leaning the balancing engine should steer toward while this
    /// movement runs.
    fn intended_leaning_vector(&self) -> Vector3<f32> {
        Vector3::z()
    }

    /// Clamp limits for the balancing correction, degrees
    /// (sagittal, coronal).
    fn max_abs_adjustments(&self) -> (f32, f32) {
        (360.0, 360.0)
    }

    fn name(&self) -> &'static str {
        self.core().name()
    }

    fn is_finished(&self) -> bool {
        self.core().is_finished()
    }

    fn support_foot(&self) -> SupportFoot {
        self.core().support_foot
    }

    /// Which foot the *next* movement should anchor on. Step movements
    /// alternate; posture movements stay on their support foot.
    fn next_support_foot(&self) -> SupportFoot {
        self.support_foot()
    }

    fn handoff(&self) -> MovementHandoff {
        self.core().handoff(self.next_support_foot())
    }

    /// This cycle's balancing inputs, assembled from the trajectory's
    /// adjustment factors and the kind-specific leaning/limits.
    fn balancing_params(&self) -> BalancingParams {
        let core = self.core();
        let (max_sagittal, max_coronal) = self.max_abs_adjustments();
        BalancingParams {
            intended_leaning: self.intended_leaning_vector(),
            pivot_point: core.pivot_point(),
            sagittal_adjustment_factor: core.sagittal_adjustment_factor(),
            max_abs_sagittal_adjustment: max_sagittal,
            coronal_adjustment_factor: core.coronal_adjustment_factor(),
            max_abs_coronal_adjustment: max_coronal,
        }
    }
}

/// Wire the foot interpolators of a step movement for the given support
/// side. The free foot eases forward on a cosine and lifts on a sine arc;
/// the support foot runs linear with a downward push arc on its height
/// channel (ground-contact assurance).
pub(crate) fn assign_step_interpolators(
    core: &mut MovementCore,
    support_foot: SupportFoot,
    free_lift: f32,
    support_push: f32,
) {
    let free = PoseInterpolator {
        x: ValueInterpolator::linear(),
        y: ValueInterpolator::cosine(),
        z: ValueInterpolator::sine_lift(free_lift),
        x_rot: ValueInterpolator::linear(),
        y_rot: ValueInterpolator::linear(),
        z_rot: ValueInterpolator::linear(),
    };
    let support = PoseInterpolator {
        z: ValueInterpolator::sine_lift(support_push),
        ..PoseInterpolator::linear()
    };

    match support_foot {
        SupportFoot::Right => {
            core.left_foot_interpolator = free;
            core.right_foot_interpolator = support;
        }
        _ => {
            core.left_foot_interpolator = support;
            core.right_foot_interpolator = free;
        }
    }
}

/// Resolve the support foot for a movement that continues a sequence:
/// anchor on whatever the predecessor reports, defaulting to the current
/// assignment when there is no predecessor (it may have been set from
/// outside).
pub(crate) fn support_foot_from(
    previous: Option<&MovementHandoff>,
    current: SupportFoot,
) -> SupportFoot {
    match previous {
        Some(handoff) => match handoff.next_support_foot {
            SupportFoot::Left => SupportFoot::Left,
            _ => SupportFoot::Right,
        },
        None => current,
    }
}

/// Sensed foot pose expressed in the top-view frame around the center of
/// mass, with the height pinned to the walk height. This is the "where is
/// my foot really" input for dynamic stride blending.
pub(crate) fn top_view_foot_pose(
    limb: &LimbPose,
    top_view: &Rotation3<f32>,
    center_of_mass: Vector3<f32>,
    walk_height: f32,
) -> Pose6D {
    let position = top_view * (limb.position - center_of_mass);
    let rotation = top_view * limb.orientation;
    let mut pose =
        Pose6D::from_position_rotation(Vector3::new(position.x, position.y, walk_height), &rotation);
    pose.z = walk_height;
    pose
}
