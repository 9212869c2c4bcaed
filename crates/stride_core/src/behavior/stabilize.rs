//! Single-leg stabilization: ComShift → GetOnLeg → BalanceOnLeg.
//!
//! Brings the robot onto one leg and holds the balanced posture, e.g. to
//! prepare a kick that is decided later or to stand stably in place.

use super::composer::{compose_targets, run_cycle, ComposerState, LimbTargets, SequencePolicy};
use crate::error::Result;
use crate::geometry::{Angle, Pose2D};
use crate::kick::StabilizeParams;
use crate::movement::{
    BalanceOnLegMovement, ComShiftMovement, GetOnLegMovement, Movement, MovementHandoff,
};
use crate::snapshot::{SupportFoot, WorldSnapshot};
use crate::walk::WalkParameters;

const BALANCE_SLOT: usize = 2;
/// The balanced posture is held for a long time; the strategic layer
/// switches away when it has other plans.
const BALANCE_HOLD_CYCLES: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct StabilizeBehavior {
    com_shift: ComShiftMovement,
    get_on_leg: GetOnLegMovement,
    balance_on_leg: BalanceOnLegMovement,
    state: ComposerState,

    /// The foot that ends up free (lifted); the other carries the weight.
    free_foot: SupportFoot,
    /// Free-foot target of the initial shift step, relative to the
    /// support foot.
    target_pose: Pose2D,
}

impl StabilizeBehavior {
    pub fn new(
        free_foot: SupportFoot,
        stabilize: StabilizeParams,
        walk_params: &WalkParameters,
    ) -> Result<Self> {
        let com_shift = ComShiftMovement::new(walk_params)?;
        let get_on_leg = GetOnLegMovement::new(walk_params)?;
        let balance_on_leg = BalanceOnLegMovement::new(
            stabilize.support_foot_pose(),
            stabilize.free_foot_pose(),
            stabilize.intended_leaning(),
            stabilize.stabilize_cycles,
            BALANCE_HOLD_CYCLES,
            walk_params.adjustment_factors(),
        )?;

        Ok(StabilizeBehavior {
            com_shift,
            get_on_leg,
            balance_on_leg,
            state: ComposerState::new(),
            free_foot,
            target_pose: Pose2D::new(0.13, 0.08, Angle::ZERO),
        })
    }

    pub fn free_foot(&self) -> SupportFoot {
        self.free_foot
    }

    pub fn set_free_foot_target_pose(&mut self, target_pose: Pose2D) {
        self.target_pose = target_pose;
    }

    pub fn perform(&mut self, world: &WorldSnapshot) -> LimbTargets {
        // during the shift step the free foot still supports; weight
        // leaves it when GetOnLeg takes over
        self.com_shift.set_support_foot(self.free_foot);
        self.com_shift.set_free_foot_target_pose(self.target_pose);

        {
            let mut slots: [&mut dyn Movement; 3] =
                [&mut self.com_shift, &mut self.get_on_leg, &mut self.balance_on_leg];
            run_cycle(&mut slots, SequencePolicy::LinearSaturate, &mut self.state, world);
        }

        compose_targets(self.active_movement(), world)
    }

    fn active_movement(&self) -> &dyn Movement {
        match self.state.active() {
            Some(1) => &self.get_on_leg,
            Some(BALANCE_SLOT) => &self.balance_on_leg,
            _ => &self.com_shift,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state.active() == Some(BALANCE_SLOT) && self.balance_on_leg.is_finished()
    }

    /// The balanced posture has been reached (hold phase may still run).
    pub fn is_balanced(&self) -> bool {
        self.state.active() == Some(BALANCE_SLOT)
            && self.balance_on_leg.core().cycle_progress()
                >= self.balance_on_leg.core().movement_cycles()
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn seed(&mut self, handoff: MovementHandoff) {
        self.state.seed(handoff);
    }

    pub fn set_abort_retry_limit(&mut self, limit: usize) {
        self.state.abort_retry_limit = limit;
    }

    pub fn handoff(&self) -> Option<MovementHandoff> {
        self.state.active().map(|_| self.active_movement().handoff())
    }

    pub fn next_support_foot(&self) -> SupportFoot {
        self.active_movement().next_support_foot()
    }
}
