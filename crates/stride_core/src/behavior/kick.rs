//! Kick behavior: FinalStep → GetOnLeg → BalanceOnLeg → KickSwing.
//!
//! One behavior instance per configured kick type. The final step places
//! the stabilizing foot relative to the predicted ball position, the next
//! two movements transfer weight onto it, and the swing drives the
//! kicking foot through the ball.

use super::composer::{compose_targets, run_cycle, ComposerState, LimbTargets, SequencePolicy};
use crate::error::Result;
use crate::geometry::Pose2D;
use crate::kick::{
    CheckTrace, EvalInput, KickDecider, KickDistribution, KickEstimator, KickParameters,
    StabilizeParams,
};
use crate::movement::{
    BalanceOnLegMovement, FinalStepMovement, GetOnLegMovement, KickSwingMovement, KickSwingParams,
    Movement, MovementHandoff,
};
use crate::snapshot::{SupportFoot, WorldSnapshot};
use crate::walk::{WalkParameters, WalkTimeEstimator};

const KICK_SWING_SLOT: usize = 3;

#[derive(Debug, Clone)]
pub struct KickBehavior {
    final_step: FinalStepMovement,
    get_on_leg: GetOnLegMovement,
    balance_on_leg: BalanceOnLegMovement,
    kick_swing: KickSwingMovement,
    state: ComposerState,

    pub decider: KickDecider,
    pub estimator: KickEstimator,
}

impl KickBehavior {
    pub fn new(
        params: KickParameters,
        stabilize: StabilizeParams,
        swing: KickSwingParams,
        walk_params: &WalkParameters,
        distribution: Option<KickDistribution>,
    ) -> Result<Self> {
        params.validate()?;
        walk_params.validate()?;

        // the stabilizing-foot pose is configured in the kick-direction
        // frame; rotate it out once
        let kick_dir_pose = Pose2D::new(0.0, 0.0, params.relative_kick_direction);
        let relative_stabilizing_pose =
            kick_dir_pose.apply_inverse_to(&params.relative_stabilizing_foot_pose);

        let final_step =
            FinalStepMovement::new(walk_params, relative_stabilizing_pose, params.kicking_foot)?;
        let get_on_leg = GetOnLegMovement::new(walk_params)?;
        let balance_on_leg = BalanceOnLegMovement::new(
            stabilize.support_foot_pose(),
            stabilize.free_foot_pose(),
            stabilize.intended_leaning(),
            stabilize.stabilize_cycles,
            0,
            walk_params.adjustment_factors(),
        )?;
        let kick_swing = KickSwingMovement::new(swing)?;

        Ok(KickBehavior {
            final_step,
            get_on_leg,
            balance_on_leg,
            kick_swing,
            state: ComposerState::new(),
            decider: KickDecider::new(params, distribution),
            estimator: KickEstimator::standard(),
        })
    }

    pub fn name(&self) -> &str {
        &self.decider.params().name
    }

    pub fn kicking_foot(&self) -> SupportFoot {
        self.decider.kicking_foot()
    }

    /// Refresh the stabilization target from the latest ball estimate.
    /// Runs before evaluation and before every perform so the decider's
    /// target pose stays current.
    pub fn pre_decision_update(&mut self, world: &WorldSnapshot) {
        self.final_step.set_support_foot(self.decider.kicking_foot());
        self.final_step.set_intended_kick_direction(self.decider.kick_direction());

        let ball_at_kick = self.decider.ball_position_at_kick(world);
        let target_pose =
            self.final_step.calculate_stabilization_leg_target_pose(ball_at_kick, world);
        self.decider.set_target_pose(target_pose);
    }

    pub fn perform(&mut self, world: &WorldSnapshot) -> LimbTargets {
        self.pre_decision_update(world);

        {
            let mut slots: [&mut dyn Movement; 4] = [
                &mut self.final_step,
                &mut self.get_on_leg,
                &mut self.balance_on_leg,
                &mut self.kick_swing,
            ];
            run_cycle(&mut slots, SequencePolicy::LinearSaturate, &mut self.state, world);
        }

        compose_targets(self.active_movement(), world)
    }

    fn active_movement(&self) -> &dyn Movement {
        match self.state.active() {
            Some(1) => &self.get_on_leg,
            Some(2) => &self.balance_on_leg,
            Some(KICK_SWING_SLOT) => &self.kick_swing,
            _ => &self.final_step,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state.active() == Some(KICK_SWING_SLOT) && self.kick_swing.is_finished()
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

    /// Cycles spent stabilizing before the swing starts.
    pub fn stabilize_cycles(&self) -> usize {
        self.final_step.core().movement_cycles()
            + self.get_on_leg.core().movement_cycles()
            + self.balance_on_leg.core().movement_cycles()
    }

    pub fn applicability(&mut self, world: &WorldSnapshot, walk_estimator: &WalkTimeEstimator) -> f32 {
        let input = EvalInput { world, decider: &self.decider, walk_estimator };
        self.estimator.applicability(&input)
    }

    pub fn executability(
        &mut self,
        world: &WorldSnapshot,
        walk_estimator: &WalkTimeEstimator,
        trace: Option<&mut CheckTrace>,
    ) -> f32 {
        let input = EvalInput { world, decider: &self.decider, walk_estimator };
        let score = self.estimator.executability(&input);
        if let Some(trace) = trace {
            trace.record(&self.decider.params().name, &self.estimator, score);
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Angle;
    use crate::snapshot::WorldSnapshot;
    use nalgebra::{Vector2, Vector3};

    fn kick_behavior(foot: SupportFoot) -> KickBehavior {
        let stabilize = match foot {
            SupportFoot::Left => StabilizeParams::right_support(),
            _ => StabilizeParams::left_support(),
        };
        KickBehavior::new(
            KickParameters::straight_kick(foot, 8.0),
            stabilize,
            KickSwingParams::default(),
            &WalkParameters::default(),
            None,
        )
        .unwrap()
    }

    fn walk_handoff(next_support_foot: SupportFoot) -> MovementHandoff {
        MovementHandoff {
            left_foot: crate::geometry::Pose6D::new(-0.06, 0.0, -0.25, 0.0, 0.0, 0.0),
            right_foot: crate::geometry::Pose6D::new(0.06, 0.0, -0.25, 0.0, 0.0, 0.0),
            left_arm: crate::geometry::Pose6D::default(),
            right_arm: crate::geometry::Pose6D::default(),
            adjustment_factors: Vector2::new(0.6, 0.6),
            next_support_foot,
        }
    }

    #[test]
    fn test_sequence_runs_in_order() {
        let mut world = WorldSnapshot::default();
        world.ball.position = Vector3::new(0.2, -0.1, 0.0);
        let mut behavior = kick_behavior(SupportFoot::Right);
        behavior.decider.set_intended_kick_direction(Angle::ZERO);
        behavior.seed(walk_handoff(SupportFoot::Right));

        let mut order = Vec::new();
        let mut guard = 0;
        while !behavior.is_finished() {
            behavior.perform(&world);
            if order.last() != behavior.state.active().as_ref() {
                order.push(behavior.state.active().unwrap());
            }
            guard += 1;
            assert!(guard < 500, "kick sequence must terminate");
        }
        assert_eq!(order, vec![0, 1, 2, 3], "FinalStep, GetOnLeg, BalanceOnLeg, KickSwing");
    }

    #[test]
    fn test_continuity_between_sequence_movements() {
        let mut world = WorldSnapshot::default();
        world.ball.position = Vector3::new(0.2, -0.1, 0.0);
        let mut behavior = kick_behavior(SupportFoot::Right);
        behavior.decider.set_intended_kick_direction(Angle::ZERO);
        behavior.seed(walk_handoff(SupportFoot::Right));

        let mut last_pose = None;
        let mut guard = 0;
        while !behavior.is_finished() {
            let was_active = behavior.state.active();
            behavior.perform(&world);
            let pose = behavior.active_movement().core().right_foot_pose();
            if behavior.state.new_movement_started() && was_active.is_some() {
                if let Some(last) = last_pose {
                    let current_initial = behavior.active_movement().core().right_foot_initial;
                    let diff = current_initial.max_abs_difference(&last);
                    assert!(diff < 1e-4, "handoff pose drifted by {diff}");
                }
            }
            last_pose = Some(pose);
            guard += 1;
            assert!(guard < 500);
        }
    }

    #[test]
    fn test_next_support_foot_after_kick() {
        let mut world = WorldSnapshot::default();
        world.ball.position = Vector3::new(0.2, -0.1, 0.0);
        let mut behavior = kick_behavior(SupportFoot::Right);
        behavior.decider.set_intended_kick_direction(Angle::ZERO);
        behavior.seed(walk_handoff(SupportFoot::Right));

        let mut guard = 0;
        while !behavior.is_finished() {
            behavior.perform(&world);
            guard += 1;
            assert!(guard < 500);
        }
        // kicked with the right foot while standing on the left: the walk
        // that follows anchors on the left
        assert_eq!(behavior.next_support_foot(), SupportFoot::Left);
    }

    #[test]
    fn test_stabilize_cycles_sum() {
        let behavior = kick_behavior(SupportFoot::Left);
        assert_eq!(
            behavior.stabilize_cycles(),
            behavior.final_step.core().movement_cycles()
                + behavior.get_on_leg.core().movement_cycles()
                + behavior.balance_on_leg.core().movement_cycles()
        );
    }
}
