//! Per-agent movement engine: behavior arbitration and the once-per-cycle
//! entry point.
//!
//! The engine owns one instance of every behavior, runs exactly one of
//! them per control cycle and governs hand-offs between them. A switch is
//! granted only when the outgoing behavior finished its current movement,
//! the support feet line up and the robot is upright; otherwise the
//! request stays pending and the current behavior keeps running.

use super::composer::LimbTargets;
use super::get_ready::GetReadyBehavior;
use super::kick::KickBehavior;
use super::stabilize::StabilizeBehavior;
use super::walk::WalkBehavior;
use crate::error::Result;
use crate::geometry::Angle;
use crate::kick::{CheckTrace, KickDistribution, KickParameters, StabilizeParams, INFEASIBLE};
use crate::movement::KickSwingParams;
use crate::snapshot::{SupportFoot, WorldSnapshot};
use crate::walk::{WalkParamSet, WalkParameters, WalkSpeeds, WalkTimeEstimator};
use tracing::debug;

/// Upright indicator required before any behavior switch; switching
/// mid-fall would hand over inconsistent state.
pub const UPRIGHT_SWITCH_THRESHOLD: f32 = 0.99;

/// Which top-level behavior runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorId {
    GetReady,
    Walk,
    /// Index into the configured kick list.
    Kick(usize),
    /// Stabilize with the given foot ending up free.
    Stabilize(SupportFoot),
}

/// Configuration of one kick slot.
#[derive(Debug, Clone)]
pub struct KickConfig {
    pub params: KickParameters,
    pub stabilize: StabilizeParams,
    pub swing: KickSwingParams,
    pub distribution: Option<KickDistribution>,
}

impl KickConfig {
    pub fn straight(kicking_foot: SupportFoot, max_distance: f32) -> Self {
        let stabilize = match kicking_foot {
            // the non-kicking leg carries the weight
            SupportFoot::Left => StabilizeParams::right_support(),
            _ => StabilizeParams::left_support(),
        };
        KickConfig {
            params: KickParameters::straight_kick(kicking_foot, max_distance),
            stabilize,
            swing: KickSwingParams::default(),
            distribution: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub walk_params: WalkParameters,
    pub walk_speeds: WalkSpeeds,
    pub kicks: Vec<KickConfig>,
    /// Composer retries per cycle after an aborting movement update.
    pub abort_retry_limit: usize,
    pub upright_switch_threshold: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            walk_params: WalkParameters::default(),
            walk_speeds: WalkSpeeds::default(),
            kicks: vec![
                KickConfig::straight(SupportFoot::Left, 8.0),
                KickConfig::straight(SupportFoot::Right, 8.0),
            ],
            abort_retry_limit: 1,
            upright_switch_threshold: UPRIGHT_SWITCH_THRESHOLD,
        }
    }
}

/// Scores of one configured kick, for telemetry and external selection.
#[derive(Debug, Clone, PartialEq)]
pub struct KickScore {
    pub name: String,
    pub applicability: f32,
    pub executability: f32,
}

#[derive(Debug, Clone)]
pub struct MovementEngine {
    walk: WalkBehavior,
    get_ready: GetReadyBehavior,
    kicks: Vec<KickBehavior>,
    /// Indexed by the free foot: [free left, free right].
    stabilize: [StabilizeBehavior; 2],

    current: BehaviorId,
    desired: BehaviorId,

    walk_estimator: WalkTimeEstimator,
    trace: CheckTrace,
    upright_switch_threshold: f32,
}

impl MovementEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.walk_params.validate()?;
        let walk_estimator = WalkTimeEstimator::new(config.walk_speeds)?;

        let mut walk = WalkBehavior::new(&config.walk_params)?;
        walk.set_abort_retry_limit(config.abort_retry_limit);
        let mut get_ready = GetReadyBehavior::new(&config.walk_params)?;
        get_ready.set_abort_retry_limit(config.abort_retry_limit);

        let mut kicks = Vec::with_capacity(config.kicks.len());
        for kick in config.kicks {
            let mut behavior = KickBehavior::new(
                kick.params,
                kick.stabilize,
                kick.swing,
                &config.walk_params,
                kick.distribution,
            )?;
            behavior.set_abort_retry_limit(config.abort_retry_limit);
            kicks.push(behavior);
        }

        let mut stabilize_left = StabilizeBehavior::new(
            SupportFoot::Left,
            StabilizeParams::right_support(),
            &config.walk_params,
        )?;
        stabilize_left.set_abort_retry_limit(config.abort_retry_limit);
        let mut stabilize_right = StabilizeBehavior::new(
            SupportFoot::Right,
            StabilizeParams::left_support(),
            &config.walk_params,
        )?;
        stabilize_right.set_abort_retry_limit(config.abort_retry_limit);

        Ok(MovementEngine {
            walk,
            get_ready,
            kicks,
            stabilize: [stabilize_left, stabilize_right],
            current: BehaviorId::GetReady,
            desired: BehaviorId::GetReady,
            walk_estimator,
            trace: CheckTrace::new(),
            upright_switch_threshold: config.upright_switch_threshold,
        })
    }

    /// Desired walk set by the strategic layer; percentages in
    /// [-100, 100] plus turn per step.
    pub fn set_movement(&mut self, forward: f32, sideward: f32, turn: Angle) {
        self.walk.set_movement(forward, sideward, turn);
    }

    pub fn set_movement_with(
        &mut self,
        forward: f32,
        sideward: f32,
        turn: Angle,
        param_set: WalkParamSet,
    ) {
        self.walk.set_movement_with(forward, sideward, turn, param_set);
    }

    /// Request a behavior switch; granted at the next legal hand-off
    /// point.
    pub fn request_behavior(&mut self, desired: BehaviorId) {
        self.desired = desired;
    }

    pub fn current_behavior(&self) -> BehaviorId {
        self.current
    }

    pub fn desired_behavior(&self) -> BehaviorId {
        self.desired
    }

    pub fn kick(&self, index: usize) -> Option<&KickBehavior> {
        self.kicks.get(index)
    }

    pub fn kick_mut(&mut self, index: usize) -> Option<&mut KickBehavior> {
        self.kicks.get_mut(index)
    }

    pub fn stabilize_mut(&mut self, free_foot: SupportFoot) -> &mut StabilizeBehavior {
        match free_foot {
            SupportFoot::Left => &mut self.stabilize[0],
            _ => &mut self.stabilize[1],
        }
    }

    pub fn walk_behavior(&self) -> &WalkBehavior {
        &self.walk
    }

    /// Run one control cycle: resolve a pending behavior switch, then
    /// produce this cycle's limb targets. Never fails; every cycle yields
    /// a pose.
    pub fn perform_cycle(&mut self, world: &WorldSnapshot) -> LimbTargets {
        if self.desired != self.current {
            self.try_switch(world);
        }

        match self.current {
            BehaviorId::GetReady => self.get_ready.perform(world),
            BehaviorId::Walk => self.walk.perform(world),
            BehaviorId::Kick(index) => self.kicks[index].perform(world),
            BehaviorId::Stabilize(SupportFoot::Left) => self.stabilize[0].perform(world),
            BehaviorId::Stabilize(_) => self.stabilize[1].perform(world),
        }
    }

    /// Abrupt cancel: forget all running movements. The next cycle starts
    /// the desired behavior from the sensed posture.
    pub fn abort(&mut self) {
        self.walk.reset();
        self.get_ready.reset();
        for kick in &mut self.kicks {
            kick.reset();
        }
        for stabilize in &mut self.stabilize {
            stabilize.reset();
        }
        self.current = self.desired;
    }

    fn outgoing_finished(&self) -> bool {
        match self.current {
            BehaviorId::GetReady => self.get_ready.is_finished(),
            BehaviorId::Walk => self.walk.is_finished(),
            BehaviorId::Kick(index) => self.kicks[index].is_finished(),
            BehaviorId::Stabilize(SupportFoot::Left) => self.stabilize[0].is_finished(),
            BehaviorId::Stabilize(_) => self.stabilize[1].is_finished(),
        }
    }

    fn outgoing_handoff(&self) -> Option<crate::movement::MovementHandoff> {
        match self.current {
            BehaviorId::GetReady => self.get_ready.handoff(),
            BehaviorId::Walk => self.walk.handoff(),
            BehaviorId::Kick(index) => self.kicks[index].handoff(),
            BehaviorId::Stabilize(SupportFoot::Left) => self.stabilize[0].handoff(),
            BehaviorId::Stabilize(_) => self.stabilize[1].handoff(),
        }
    }

    fn outgoing_next_support_foot(&self) -> SupportFoot {
        match self.current {
            BehaviorId::GetReady => self.get_ready.next_support_foot(),
            BehaviorId::Walk => self.walk.next_support_foot(),
            BehaviorId::Kick(index) => self.kicks[index].next_support_foot(),
            BehaviorId::Stabilize(SupportFoot::Left) => self.stabilize[0].next_support_foot(),
            BehaviorId::Stabilize(_) => self.stabilize[1].next_support_foot(),
        }
    }

    fn try_switch(&mut self, world: &WorldSnapshot) {
        if !self.outgoing_finished() {
            return;
        }
        let upright = world.this_player.up_vector_z;
        let handoff = self.outgoing_handoff();
        let next_support = self.outgoing_next_support_foot();

        match self.desired {
            BehaviorId::Walk => {
                self.walk.reset();
                match handoff {
                    Some(handoff) => self.walk.seed(handoff),
                    // coming from a posture behavior that never ran: full
                    // steps right away
                    None => self.walk.start_fresh(),
                }
            }
            BehaviorId::GetReady => {
                self.get_ready.reset();
                if let Some(handoff) = handoff {
                    self.get_ready.seed(handoff);
                }
            }
            BehaviorId::Kick(index) => {
                let Some(kick) = self.kicks.get_mut(index) else {
                    return;
                };
                // the kicking foot must be free next, and the robot stable
                if next_support != kick.kicking_foot() || upright <= self.upright_switch_threshold {
                    return;
                }
                kick.reset();
                if let Some(handoff) = handoff {
                    kick.seed(handoff);
                }
            }
            BehaviorId::Stabilize(free_foot) => {
                if next_support != free_foot || upright <= self.upright_switch_threshold {
                    return;
                }
                let behavior = self.stabilize_mut(free_foot);
                behavior.reset();
                if let Some(handoff) = handoff {
                    behavior.seed(handoff);
                }
            }
        }

        debug!(from = ?self.current, to = ?self.desired, "behavior switch granted");
        self.current = self.desired;
    }

    /// Score every configured kick for the given intent. Exhaustive
    /// diagnostics go through the engine's trace collector when the
    /// estimators run in exhaustive mode.
    pub fn evaluate_kicks(
        &mut self,
        world: &WorldSnapshot,
        intended_direction: Angle,
        intended_distance: f32,
    ) -> Vec<KickScore> {
        let mut scores = Vec::with_capacity(self.kicks.len());
        for kick in &mut self.kicks {
            kick.decider.set_intended_kick_direction(intended_direction);
            kick.decider.set_intended_kick_distance(intended_distance);
            let expected_ball = kick.decider.ball_position_at_kick(world);
            kick.decider.set_expected_ball_position(expected_ball);
            kick.pre_decision_update(world);

            let applicability = kick.applicability(world, &self.walk_estimator);
            let executability =
                kick.executability(world, &self.walk_estimator, Some(&mut self.trace));
            scores.push(KickScore {
                name: kick.name().to_string(),
                applicability,
                executability,
            });
        }
        scores
    }

    /// The highest-scoring feasible kick, if any. Ties resolve to the
    /// first kick in declaration order.
    pub fn best_kick(
        &mut self,
        world: &WorldSnapshot,
        intended_direction: Angle,
        intended_distance: f32,
    ) -> Option<(usize, f32)> {
        let scores = self.evaluate_kicks(world, intended_direction, intended_distance);
        let mut best: Option<(usize, f32)> = None;
        for (index, score) in scores.iter().enumerate() {
            if score.executability <= INFEASIBLE {
                continue;
            }
            match best {
                // strictly greater: declaration order wins ties
                Some((_, best_score)) if score.executability <= best_score => {}
                _ => best = Some((index, score.executability)),
            }
        }
        best
    }

    pub fn walk_estimator(&self) -> &WalkTimeEstimator {
        &self.walk_estimator
    }

    // telemetry passthrough

    pub fn support_foot(&self) -> SupportFoot {
        match self.current {
            BehaviorId::Walk => self.walk.support_foot(),
            _ => self.outgoing_next_support_foot(),
        }
    }

    pub fn is_new_step(&self) -> bool {
        self.walk.is_new_step()
    }
}
