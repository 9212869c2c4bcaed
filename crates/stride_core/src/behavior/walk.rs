//! Closed-loop walking behavior.
//!
//! Each cycle recomputes the step from the latest intended velocity and
//! turn (rate-limited by the planner), applies the stability override and
//! drives the walk movement. Finishing a stride immediately starts the
//! next one.

use super::composer::{compose_targets, run_cycle, ComposerState, LimbTargets, SequencePolicy};
use crate::error::Result;
use crate::geometry::{leaning_vector, Angle};
use crate::movement::{Movement, MovementHandoff, WalkMode, WalkMovement};
use crate::snapshot::{SupportFoot, WorldSnapshot};
use crate::walk::{calculate_step, Step, WalkParamSet, WalkParameters};
use nalgebra::Vector2;

/// Leaning (up-vector z) below which all step amplitudes are cleared.
const SEVERE_LEANING_Z: f32 = 0.7;
/// Leaning below which the forward amplitude may only brake.
const MILD_LEANING_Z: f32 = 0.9;

/// Empirical ratio of achieved sideward to forward stride speed.
const SIDEWARD_SPEED_RATIO: f32 = 0.569_274_5;

#[derive(Debug, Clone, PartialEq)]
pub struct WalkBehavior {
    movement: WalkMovement,
    state: ComposerState,
    base_params: WalkParameters,

    /// Intended walk as factors in [-1, 1] (forward, sideward).
    intended_walk: Vector2<f32>,
    intended_turn: Angle,
    intended_step: Step,

    current_turn: Angle,
    real_speed: Vector2<f32>,
}

impl WalkBehavior {
    pub fn new(params: &WalkParameters) -> Result<Self> {
        Ok(WalkBehavior {
            movement: WalkMovement::new(params, WalkMode::Dynamic)?,
            state: ComposerState::new(),
            base_params: params.clone(),
            intended_walk: Vector2::zeros(),
            intended_turn: Angle::ZERO,
            intended_step: Step::default(),
            current_turn: Angle::ZERO,
            real_speed: Vector2::zeros(),
        })
    }

    /// Set the desired walk. `forward`/`sideward` are percentages in
    /// [-100, 100]; the optional parameter preset tunes acceleration.
    pub fn set_movement(&mut self, forward: f32, sideward: f32, turn: Angle) {
        self.set_movement_with(forward, sideward, turn, WalkParamSet::Stable);
    }

    pub fn set_movement_with(
        &mut self,
        forward: f32,
        sideward: f32,
        turn: Angle,
        param_set: WalkParamSet,
    ) {
        self.intended_walk = Vector2::new(forward / 100.0, sideward / 100.0);
        self.intended_turn = turn;
        self.movement.params = self.base_params.with_preset(param_set);
    }

    pub fn perform(&mut self, world: &WorldSnapshot) -> LimbTargets {
        self.intended_step = calculate_step(
            &self.intended_step,
            self.intended_walk,
            self.intended_turn,
            &self.movement.params,
        );
        self.adjust_intended_step(world);
        self.movement.set_next_step(self.intended_step);

        {
            let mut slots: [&mut dyn Movement; 1] = [&mut self.movement];
            run_cycle(&mut slots, SequencePolicy::Single, &mut self.state, world);
        }

        // short strides never reach the planned step length
        let cycles = self.movement.core().movement_cycles().max(6) as f32;
        self.real_speed = Vector2::new(
            2.0 * self.intended_step.forward / cycles,
            2.0 * SIDEWARD_SPEED_RATIO * -self.intended_step.sideward / cycles,
        );
        self.current_turn = self.intended_step.turn;

        compose_targets(&self.movement, world)
    }

    /// Stability override: once the sensed leaning passes the severe
    /// threshold the stride is cleared entirely; past the mild threshold
    /// the forward amplitude may not push further in the falling
    /// direction. Graceful degradation instead of striding while falling.
    fn adjust_intended_step(&mut self, world: &WorldSnapshot) {
        let current_leaning = leaning_vector(&world.this_player.orientation);

        if current_leaning.z < SEVERE_LEANING_Z {
            self.intended_step.sideward = 0.0;
            self.intended_step.forward = 0.0;
            self.intended_step.turn = Angle::ZERO;
        } else if current_leaning.z < MILD_LEANING_Z {
            if current_leaning.y > 0.1 {
                // no backward stride while leaning forward
                self.intended_step.forward = self.intended_step.forward.max(0.0);
            } else if current_leaning.y < -0.1 {
                // no forward stride while leaning backward
                self.intended_step.forward = self.intended_step.forward.min(0.0);
            }
        }
    }

    /// Forget the running stride; the next perform starts fresh.
    pub fn reset(&mut self) {
        self.state.reset();
        self.intended_step = Step::default();
    }

    /// Continuity seed when taking over from another behavior.
    pub fn seed(&mut self, handoff: MovementHandoff) {
        self.movement.set_support_foot(match handoff.next_support_foot {
            SupportFoot::Left => SupportFoot::Left,
            _ => SupportFoot::Right,
        });
        self.state.seed(handoff);
        self.intended_step = Step::default();
    }

    /// Fresh start from a non-movement behavior: anchor on the left foot
    /// and use full steps right away instead of accelerating.
    pub fn start_fresh(&mut self) {
        self.state.reset();
        self.movement.set_support_foot(SupportFoot::Left);
        self.intended_step = Step::new(
            0.0,
            self.movement.params.max_step_length,
            self.movement.params.max_step_height,
            Angle::ZERO,
        );
    }

    pub fn is_finished(&self) -> bool {
        match self.state.active() {
            None => true,
            Some(_) => self.movement.is_finished(),
        }
    }

    pub fn handoff(&self) -> Option<MovementHandoff> {
        self.state.active().map(|_| self.movement.handoff())
    }

    // telemetry / query surface

    pub fn support_foot(&self) -> SupportFoot {
        self.movement.support_foot()
    }

    pub fn next_support_foot(&self) -> SupportFoot {
        self.movement.next_support_foot()
    }

    pub fn is_new_step(&self) -> bool {
        self.state.new_movement_started()
    }

    pub fn intended_walk(&self) -> Vector2<f32> {
        self.intended_walk
    }

    pub fn intended_turn(&self) -> Angle {
        self.intended_turn
    }

    pub fn current_turn(&self) -> Angle {
        self.current_turn
    }

    pub fn current_speed(&self) -> Vector2<f32> {
        self.real_speed
    }

    pub fn current_step(&self) -> Step {
        self.intended_step
    }

    pub fn max_turn_angle(&self) -> Angle {
        self.movement.params.max_turn_angle
    }

    pub fn params(&self) -> &WalkParameters {
        &self.movement.params
    }

    pub fn set_abort_retry_limit(&mut self, limit: usize) {
        self.state.abort_retry_limit = limit;
    }
}
