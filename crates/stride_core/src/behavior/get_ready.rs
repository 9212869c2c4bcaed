//! Get-ready behavior: drive into the canonical standing posture.

use super::composer::{compose_targets, run_cycle, ComposerState, LimbTargets, SequencePolicy};
use crate::error::Result;
use crate::movement::{GetReadyMovement, Movement, MovementHandoff};
use crate::snapshot::{SupportFoot, WorldSnapshot};
use crate::walk::WalkParameters;

#[derive(Debug, Clone, PartialEq)]
pub struct GetReadyBehavior {
    movement: GetReadyMovement,
    state: ComposerState,
}

impl GetReadyBehavior {
    pub fn new(params: &WalkParameters) -> Result<Self> {
        Ok(GetReadyBehavior {
            movement: GetReadyMovement::new(params)?,
            state: ComposerState::new(),
        })
    }

    pub fn perform(&mut self, world: &WorldSnapshot) -> LimbTargets {
        {
            let mut slots: [&mut dyn Movement; 1] = [&mut self.movement];
            run_cycle(&mut slots, SequencePolicy::Single, &mut self.state, world);
        }
        compose_targets(&self.movement, world)
    }

    pub fn is_finished(&self) -> bool {
        self.state.active().is_some() && self.movement.is_finished()
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
        self.state.active().map(|_| self.movement.handoff())
    }

    pub fn next_support_foot(&self) -> SupportFoot {
        self.movement.next_support_foot()
    }
}
