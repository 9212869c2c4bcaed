//! The shared movement-composition cycle.
//!
//! Every compound behavior drives its movements through the same loop:
//! select a movement when none is active or the active one finished,
//! init it from the predecessor's handoff, update it, and re-select (with
//! a bounded retry) when the update self-reports abort, so a degenerate
//! zero-duration movement can never stall a whole control cycle.

use crate::balance::adjust_target_poses;
use crate::geometry::Pose6D;
use crate::movement::{Movement, MovementHandoff};
use crate::snapshot::WorldSnapshot;
use tracing::warn;

/// One cycle's output: target poses for all four limbs, handed to the
/// external IK layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LimbTargets {
    pub left_foot: Pose6D,
    pub right_foot: Pose6D,
    pub left_arm: Pose6D,
    pub right_arm: Pose6D,
}

/// How a behavior steps through its movement slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencePolicy {
    /// One movement, re-initialized every time it finishes (walk loop).
    Single,
    /// Fixed order, advancing one slot per selection and sticking at the
    /// last (kick and stabilize sequences).
    LinearSaturate,
}

impl SequencePolicy {
    fn next_index(&self, current: Option<usize>, slot_count: usize) -> usize {
        match self {
            SequencePolicy::Single => 0,
            SequencePolicy::LinearSaturate => {
                current.map_or(0, |index| (index + 1).min(slot_count - 1))
            }
        }
    }
}

/// Composition bookkeeping owned by each behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerState {
    active: Option<usize>,
    new_movement_started: bool,
    /// Continuity seed for the first selection after a behavior switch.
    pending_handoff: Option<MovementHandoff>,
    /// How many times one cycle may re-select after an aborting update.
    pub abort_retry_limit: usize,
}

impl Default for ComposerState {
    fn default() -> Self {
        ComposerState {
            active: None,
            new_movement_started: false,
            pending_handoff: None,
            abort_retry_limit: 1,
        }
    }
}

impl ComposerState {
    pub fn new() -> Self {
        ComposerState::default()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn new_movement_started(&self) -> bool {
        self.new_movement_started
    }

    /// Forget the active movement; the next cycle selects afresh.
    pub fn reset(&mut self) {
        self.active = None;
        self.pending_handoff = None;
    }

    /// Seed continuity for the next selection from an outgoing behavior's
    /// last interpolated pose.
    pub fn seed(&mut self, handoff: MovementHandoff) {
        self.active = None;
        self.pending_handoff = Some(handoff);
    }
}

/// Drive one control cycle over the behavior's movement slots.
pub fn run_cycle(
    slots: &mut [&mut dyn Movement],
    policy: SequencePolicy,
    state: &mut ComposerState,
    world: &WorldSnapshot,
) {
    debug_assert!(!slots.is_empty());
    state.new_movement_started = false;

    let needs_selection = match state.active {
        None => true,
        Some(index) => slots[index].is_finished(),
    };
    if needs_selection {
        let handoff = state
            .active
            .map(|index| slots[index].handoff())
            .or_else(|| state.pending_handoff.take());
        let next = policy.next_index(state.active, slots.len());
        slots[next].init(handoff.as_ref(), world);
        state.active = Some(next);
        state.new_movement_started = true;
    }

    let mut retries = 0;
    loop {
        let active = state.active.expect("a movement was selected above");
        if slots[active].update(world) {
            break;
        }
        if retries >= state.abort_retry_limit {
            warn!(
                movement = slots[active].name(),
                retries, "movement kept aborting, holding its last pose this cycle"
            );
            break;
        }
        retries += 1;

        let handoff = slots[active].handoff();
        let next = policy.next_index(Some(active), slots.len());
        slots[next].init(Some(&handoff), world);
        state.active = Some(next);
        state.new_movement_started = true;
    }
}

/// Assemble the cycle's limb targets: foot poses adjusted by the
/// balancing engine against the current orientation estimate, arm poses
/// passed through.
pub fn compose_targets(movement: &dyn Movement, world: &WorldSnapshot) -> LimbTargets {
    let params = movement.balancing_params();
    let adjusted = adjust_target_poses(
        &world.this_player.orientation,
        &params,
        &[movement.core().left_foot_pose(), movement.core().right_foot_pose()],
    );

    LimbTargets {
        left_foot: adjusted[0],
        right_foot: adjusted[1],
        left_arm: movement.core().left_arm_pose(),
        right_arm: movement.core().right_arm_pose(),
    }
}
