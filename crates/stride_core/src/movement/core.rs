//! Shared movement state machine: cycle bookkeeping, continuity seeding,
//! hold-cycle indexing and remaining-trajectory interpolation.

use super::trajectories::MovementTrajectories;
use crate::error::{ConfigError, Result};
use crate::geometry::Pose6D;
use crate::interpolation::{PoseInterpolator, ValueInterpolator};
use crate::snapshot::SupportFoot;
use nalgebra::{Vector2, Vector3};

/// The values one movement carries over into the next: the *current
/// interpolated* poses (not the targets), the adjustment factors in effect
/// and the support foot the successor should anchor on. Passing this by
/// value is what guarantees C0 continuity across movement boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementHandoff {
    pub left_foot: Pose6D,
    pub right_foot: Pose6D,
    pub left_arm: Pose6D,
    pub right_arm: Pose6D,
    pub adjustment_factors: Vector2<f32>,
    pub next_support_foot: SupportFoot,
}

/// Initial poses chosen by a movement kind when there is no predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InitialPoses {
    pub left_foot: Pose6D,
    pub right_foot: Pose6D,
    pub left_arm: Pose6D,
    pub right_arm: Pose6D,
    pub adjustment_factors: Vector2<f32>,
}

/// Interpolation targets for one trajectory computation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementTargets {
    pub left_foot: Pose6D,
    pub right_foot: Pose6D,
    pub left_arm: Pose6D,
    pub right_arm: Pose6D,
    pub adjustment_factors: Vector2<f32>,
}

/// Cycle bookkeeping and trajectory state shared by every movement kind.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementCore {
    name: &'static str,
    movement_cycles: usize,
    hold_cycles: usize,
    cycle_progress: usize,
    is_static: bool,
    finished: bool,
    pub support_foot: SupportFoot,

    pub trajectories: MovementTrajectories,

    pub left_foot_initial: Pose6D,
    pub right_foot_initial: Pose6D,
    pub left_arm_initial: Pose6D,
    pub right_arm_initial: Pose6D,
    pub initial_adjustment_factors: Vector2<f32>,

    left_foot_pose: Pose6D,
    right_foot_pose: Pose6D,
    left_arm_pose: Pose6D,
    right_arm_pose: Pose6D,
    current_index: usize,

    pub left_foot_interpolator: PoseInterpolator,
    pub right_foot_interpolator: PoseInterpolator,
    pub left_arm_interpolator: PoseInterpolator,
    pub right_arm_interpolator: PoseInterpolator,
    pub sagittal_interpolator: ValueInterpolator,
    pub coronal_interpolator: ValueInterpolator,

    // balancing inputs produced while updating
    sagittal_adjustment_factor: f32,
    coronal_adjustment_factor: f32,
    pivot_point: Vector3<f32>,
}

impl MovementCore {
    /// A movement that would never produce a pose is a configuration bug;
    /// reject it before it can stall a control cycle.
    pub fn new(name: &'static str, movement_cycles: usize, hold_cycles: usize) -> Result<Self> {
        if movement_cycles == 0 {
            return Err(ConfigError::ZeroLengthMovement { name, cycles: movement_cycles });
        }

        Ok(MovementCore {
            name,
            movement_cycles,
            hold_cycles,
            cycle_progress: 0,
            is_static: false,
            finished: true,
            support_foot: SupportFoot::Both,
            trajectories: MovementTrajectories::new(movement_cycles),
            left_foot_initial: Pose6D::default(),
            right_foot_initial: Pose6D::default(),
            left_arm_initial: Pose6D::default(),
            right_arm_initial: Pose6D::default(),
            initial_adjustment_factors: Vector2::zeros(),
            left_foot_pose: Pose6D::default(),
            right_foot_pose: Pose6D::default(),
            left_arm_pose: Pose6D::default(),
            right_arm_pose: Pose6D::default(),
            current_index: 0,
            left_foot_interpolator: PoseInterpolator::linear(),
            right_foot_interpolator: PoseInterpolator::linear(),
            left_arm_interpolator: PoseInterpolator::linear(),
            right_arm_interpolator: PoseInterpolator::linear(),
            sagittal_interpolator: ValueInterpolator::linear(),
            coronal_interpolator: ValueInterpolator::linear(),
            sagittal_adjustment_factor: 1.0,
            coronal_adjustment_factor: 1.0,
            pivot_point: Vector3::zeros(),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn movement_cycles(&self) -> usize {
        self.movement_cycles
    }

    pub fn hold_cycles(&self) -> usize {
        self.hold_cycles
    }

    pub fn set_hold_cycles(&mut self, hold_cycles: usize) {
        self.hold_cycles = hold_cycles;
    }

    pub fn cycle_progress(&self) -> usize {
        self.cycle_progress
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn left_foot_pose(&self) -> Pose6D {
        self.left_foot_pose
    }

    pub fn right_foot_pose(&self) -> Pose6D {
        self.right_foot_pose
    }

    pub fn left_arm_pose(&self) -> Pose6D {
        self.left_arm_pose
    }

    pub fn right_arm_pose(&self) -> Pose6D {
        self.right_arm_pose
    }

    pub fn sagittal_adjustment_factor(&self) -> f32 {
        self.sagittal_adjustment_factor
    }

    pub fn coronal_adjustment_factor(&self) -> f32 {
        self.coronal_adjustment_factor
    }

    pub fn pivot_point(&self) -> Vector3<f32> {
        self.pivot_point
    }

    /// Change the cycle count, growing the trajectory buffers if needed.
    /// The dynamic walk shortens or restores the stride length with this.
    pub fn set_movement_cycles(&mut self, movement_cycles: usize) {
        debug_assert!(movement_cycles > 0, "movement cycles must stay positive");
        self.movement_cycles = movement_cycles.max(1);
        self.trajectories.ensure_capacity(self.movement_cycles);
    }

    /// Restart the movement. With a predecessor its current interpolated
    /// poses become our initial poses (C0 continuity); without one the
    /// kind-specific defaults apply.
    pub fn begin(&mut self, previous: Option<&MovementHandoff>, defaults: InitialPoses) {
        self.cycle_progress = 0;
        self.finished = false;

        match previous {
            Some(other) => {
                self.left_foot_initial = other.left_foot;
                self.right_foot_initial = other.right_foot;
                self.left_arm_initial = other.left_arm;
                self.right_arm_initial = other.right_arm;
                self.initial_adjustment_factors = other.adjustment_factors;
            }
            None => {
                self.left_foot_initial = defaults.left_foot;
                self.right_foot_initial = defaults.right_foot;
                self.left_arm_initial = defaults.left_arm;
                self.right_arm_initial = defaults.right_arm;
                self.initial_adjustment_factors = defaults.adjustment_factors;
            }
        }
    }

    /// Advance one cycle. Returns `false` without touching any state once
    /// the movement has finished; callers use that as the abort signal.
    pub fn update(&mut self, center_of_mass: Vector3<f32>, static_pivot: Vector3<f32>) -> bool {
        if self.finished {
            return false;
        }

        self.current_index = self.index_to_cycle();

        self.left_foot_pose = self.trajectories.left_foot[self.current_index];
        self.right_foot_pose = self.trajectories.right_foot[self.current_index];
        self.left_arm_pose = self.trajectories.left_arm[self.current_index];
        self.right_arm_pose = self.trajectories.right_arm[self.current_index];

        let factors = self.trajectories.adjustment_factors[self.current_index];
        self.sagittal_adjustment_factor = factors.x;
        self.coronal_adjustment_factor = factors.y;

        // pivot blends from CoM (factor 0) toward the static pivot
        // (factor 1), z takes the mean of both factors
        let diff = static_pivot - center_of_mass;
        let z_factor = (factors.x + factors.y) / 2.0;
        self.pivot_point = Vector3::new(
            center_of_mass.x + diff.x * factors.x,
            center_of_mass.y + diff.y * factors.y,
            center_of_mass.z + diff.z * z_factor,
        );

        self.cycle_progress += 1;
        if self.cycle_progress >= self.movement_cycles + self.hold_cycles {
            self.finished = true;
        }

        true
    }

    /// Trajectory index for the current cycle; pinned to the last entry
    /// during the hold phase.
    pub fn index_to_cycle(&self) -> usize {
        self.cycle_progress.min(self.movement_cycles - 1)
    }

    /// Interpolate the remaining trajectory from the initial poses to the
    /// given targets.
    ///
    /// Only indices from the current cycle onward are written, so a
    /// movement refining its target mid-flight replaces the remainder
    /// while committed history stays untouched.
    pub fn interpolate_movement(&mut self, targets: &MovementTargets) {
        for i in self.index_to_cycle()..self.movement_cycles {
            let t = (i + 1) as f32 / self.movement_cycles as f32;

            self.trajectories.left_foot[i] =
                self.left_foot_interpolator.interpolate(&self.left_foot_initial, &targets.left_foot, t);
            self.trajectories.right_foot[i] = self
                .right_foot_interpolator
                .interpolate(&self.right_foot_initial, &targets.right_foot, t);
            self.trajectories.left_arm[i] =
                self.left_arm_interpolator.interpolate(&self.left_arm_initial, &targets.left_arm, t);
            self.trajectories.right_arm[i] =
                self.right_arm_interpolator.interpolate(&self.right_arm_initial, &targets.right_arm, t);

            self.trajectories.adjustment_factors[i] = Vector2::new(
                self.sagittal_interpolator.interpolate(
                    self.initial_adjustment_factors.x,
                    targets.adjustment_factors.x,
                    t,
                ),
                self.coronal_interpolator.interpolate(
                    self.initial_adjustment_factors.y,
                    targets.adjustment_factors.y,
                    t,
                ),
            );
        }
    }

    /// The continuity values a successor movement would seed from, with
    /// the given next support foot.
    pub fn handoff(&self, next_support_foot: SupportFoot) -> MovementHandoff {
        MovementHandoff {
            left_foot: self.left_foot_pose,
            right_foot: self.right_foot_pose,
            left_arm: self.left_arm_pose,
            right_arm: self.right_arm_pose,
            adjustment_factors: Vector2::new(
                self.sagittal_adjustment_factor,
                self.coronal_adjustment_factor,
            ),
            next_support_foot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_core(cycles: usize, hold: usize) -> MovementCore {
        let mut core = MovementCore::new("test", cycles, hold).unwrap();
        core.begin(None, InitialPoses::default());
        let targets = MovementTargets {
            left_foot: Pose6D::new(0.0, 0.1, -0.25, 0.0, 0.0, 0.0),
            right_foot: Pose6D::new(0.0, -0.1, -0.25, 0.0, 0.0, 0.0),
            adjustment_factors: Vector2::new(1.0, 1.0),
            ..MovementTargets::default()
        };
        core.interpolate_movement(&targets);
        core
    }

    #[test]
    fn test_zero_length_movement_rejected() {
        assert!(matches!(
            MovementCore::new("broken", 0, 3),
            Err(ConfigError::ZeroLengthMovement { name: "broken", cycles: 0 })
        ));
    }

    #[test]
    fn test_hold_cycles_pin_last_index() {
        // cycles = 10, hold = 5: finished exactly at 15
        let mut core = simple_core(10, 5);
        let com = Vector3::zeros();
        let pivot = Vector3::zeros();

        for expected_progress in 0..15 {
            assert!(!core.is_finished(), "not finished at progress {expected_progress}");
            assert!(core.update(com, pivot));
            if expected_progress >= 10 {
                assert_eq!(core.current_index(), 9, "index pinned during hold");
            } else {
                assert_eq!(core.current_index(), expected_progress);
            }
        }

        assert!(core.is_finished());
        assert!(!core.update(com, pivot), "update after finish is a no-op signal");
    }

    #[test]
    fn test_update_after_finish_preserves_pose() {
        let mut core = simple_core(4, 0);
        let com = Vector3::zeros();
        let pivot = Vector3::zeros();
        while core.update(com, pivot) {}

        let last = core.left_foot_pose();
        core.update(com, pivot);
        assert_eq!(core.left_foot_pose(), last);
    }

    #[test]
    fn test_interpolation_reaches_target_at_final_cycle() {
        let mut core = simple_core(8, 0);
        let com = Vector3::zeros();
        let pivot = Vector3::zeros();
        while core.update(com, pivot) {}

        assert!((core.left_foot_pose().y - 0.1).abs() < 1e-6);
        assert!((core.right_foot_pose().y + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_recompute_only_rewrites_remaining() {
        let mut core = simple_core(10, 0);
        let com = Vector3::zeros();
        let pivot = Vector3::zeros();

        for _ in 0..4 {
            core.update(com, pivot);
        }
        let committed = core.trajectories.left_foot[..4].to_vec();

        // refine the target mid-flight
        let new_targets = MovementTargets {
            left_foot: Pose6D::new(0.02, 0.15, -0.25, 0.0, 0.0, 5.0),
            adjustment_factors: Vector2::new(1.0, 1.0),
            ..MovementTargets::default()
        };
        core.interpolate_movement(&new_targets);

        assert_eq!(&core.trajectories.left_foot[..4], &committed[..]);
        // final entry now heads for the refined target
        assert!((core.trajectories.left_foot[9].y - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_trajectory_idempotence() {
        let mut core = simple_core(12, 0);
        let targets = MovementTargets {
            left_foot: Pose6D::new(0.01, 0.08, -0.25, 0.0, 0.0, 10.0),
            adjustment_factors: Vector2::new(0.2, 0.18),
            ..MovementTargets::default()
        };

        core.interpolate_movement(&targets);
        let first = core.trajectories.clone();
        core.interpolate_movement(&targets);
        assert_eq!(core.trajectories, first);
    }

    #[test]
    fn test_continuity_from_handoff() {
        let mut first = simple_core(6, 0);
        let com = Vector3::zeros();
        let pivot = Vector3::zeros();
        while first.update(com, pivot) {}

        let handoff = first.handoff(SupportFoot::Right);

        let mut second = MovementCore::new("successor", 6, 0).unwrap();
        second.begin(Some(&handoff), InitialPoses::default());
        // successor's initial pose is exactly the predecessor's current pose
        assert_eq!(second.left_foot_initial, first.left_foot_pose());
        assert_eq!(second.right_foot_initial, first.right_foot_pose());
    }

    #[test]
    fn test_pivot_blend() {
        let mut core = MovementCore::new("pivot", 2, 0).unwrap();
        // constant full factors from the start: pivot sits at the static pivot
        core.begin(
            None,
            InitialPoses { adjustment_factors: Vector2::new(1.0, 1.0), ..InitialPoses::default() },
        );
        let targets = MovementTargets {
            adjustment_factors: Vector2::new(1.0, 1.0),
            ..MovementTargets::default()
        };
        core.interpolate_movement(&targets);

        let com = Vector3::new(0.0, 0.01, -0.08);
        let static_pivot = Vector3::new(0.0, 0.0, -0.15);
        core.update(com, static_pivot);
        assert!((core.pivot_point() - static_pivot).norm() < 1e-6);

        // zero factors: pivot rides the center of mass
        let mut core = MovementCore::new("pivot", 2, 0).unwrap();
        core.begin(None, InitialPoses::default());
        core.interpolate_movement(&MovementTargets::default());
        core.update(com, static_pivot);
        assert!((core.pivot_point() - com).norm() < 1e-6);
    }
}
