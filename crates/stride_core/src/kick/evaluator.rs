//! Kick feasibility scoring.
//!
//! Two ordered check lists per kick: *applicability* (should this kick be
//! considered at all) and *executability* (can it run right now). Each
//! check returns a signed score where any negative value means failure.
//! The check vectors are built once at configuration time; evaluation is a
//! pure pass over the current world snapshot.

use super::decider::KickDecider;
use crate::math::linear_fuzzy_value;
use crate::snapshot::{GameState, InformationSource, WorldSnapshot, PASS_MODE_DURATION};
use crate::walk::WalkTimeEstimator;
use nalgebra::Vector2;

/// Sentinel score: the kick is not feasible.
pub const INFEASIBLE: f32 = -1.0;

/// Shortcut stops at the first failing check; exhaustive runs every check
/// and retains the pass/fail vector for diagnostics. Both modes agree on
/// the feasible/infeasible verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    #[default]
    Shortcut,
    Exhaustive,
}

/// Everything a check may look at.
pub struct EvalInput<'a> {
    pub world: &'a WorldSnapshot,
    pub decider: &'a KickDecider,
    pub walk_estimator: &'a WalkTimeEstimator,
}

type CheckFn = fn(&EvalInput) -> f32;

/// A named feasibility criterion.
#[derive(Clone, Copy)]
pub struct Check {
    pub name: &'static str,
    run: CheckFn,
}

impl Check {
    pub const fn new(name: &'static str, run: CheckFn) -> Self {
        Check { name, run }
    }
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check").field("name", &self.name).finish()
    }
}

/// Scores one kick's applicability and executability.
#[derive(Debug, Clone)]
pub struct KickEstimator {
    applicability_checks: Vec<Check>,
    executability_checks: Vec<Check>,
    mode: EvaluationMode,
    applicability_results: Vec<bool>,
    executability_results: Vec<bool>,
}

impl KickEstimator {
    /// The standard check set shared by every kick family.
    pub fn standard() -> Self {
        let applicability_checks = vec![
            Check::new("opponent_distance", check_opponent_distance),
            Check::new("kick_distance_fit", check_kick_distance_fit),
            Check::new("kick_outside_field", check_kick_outside_field),
            Check::new("walkability", check_walkability),
            Check::new("own_speed", check_own_speed),
            Check::new("block_own_goal", check_block_own_goal),
        ];
        let executability_checks = vec![
            Check::new("ball_plausibility", check_ball_plausibility),
            Check::new("own_speed", check_own_speed),
            Check::new("ball_speed", check_ball_speed),
            Check::new("step_foot", check_step_foot),
            Check::new("upright", check_upright),
            Check::new("ball_in_footprint", check_ball_in_footprint),
            Check::new("angle_deviation", check_angle_deviation),
            Check::new("stabilization_reachable", check_stabilization_reachable),
        ];
        let applicability_results = vec![false; applicability_checks.len()];
        let executability_results = vec![false; executability_checks.len()];
        KickEstimator {
            applicability_checks,
            executability_checks,
            mode: EvaluationMode::Shortcut,
            applicability_results,
            executability_results,
        }
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_mode(&mut self, mode: EvaluationMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    pub fn add_applicability_check(&mut self, check: Check) {
        self.applicability_checks.push(check);
        self.applicability_results.push(false);
    }

    pub fn add_executability_check(&mut self, check: Check) {
        self.executability_checks.push(check);
        self.executability_results.push(false);
    }

    /// Applicability sum alone; cheap pre-filter for candidate kicks.
    pub fn applicability(&mut self, input: &EvalInput) -> f32 {
        run_checks(&self.applicability_checks, &mut self.applicability_results, self.mode, input)
    }

    /// Overall feasibility score.
    ///
    /// Infeasible if either list fails; otherwise the sum of both lists
    /// scaled by the kick's priority so heterogeneous kick families
    /// compare on one scale.
    pub fn executability(&mut self, input: &EvalInput) -> f32 {
        let applicability =
            run_checks(&self.applicability_checks, &mut self.applicability_results, self.mode, input);
        if applicability < 0.0 && self.mode == EvaluationMode::Shortcut {
            return INFEASIBLE;
        }

        let executability =
            run_checks(&self.executability_checks, &mut self.executability_results, self.mode, input);

        if applicability < 0.0 || executability < 0.0 {
            return INFEASIBLE;
        }
        (applicability + executability) * input.decider.params().priority
    }

    /// Check names in evaluation order (applicability, then
    /// executability).
    pub fn check_names(&self) -> Vec<&'static str> {
        self.applicability_checks
            .iter()
            .chain(self.executability_checks.iter())
            .map(|c| c.name)
            .collect()
    }

    /// Pass/fail per check from the last exhaustive evaluation, in
    /// [`KickEstimator::check_names`] order.
    pub fn last_results(&self) -> Vec<bool> {
        self.applicability_results
            .iter()
            .chain(self.executability_results.iter())
            .copied()
            .collect()
    }
}

fn run_checks(
    checks: &[Check],
    results: &mut [bool],
    mode: EvaluationMode,
    input: &EvalInput,
) -> f32 {
    let mut sum = 0.0;
    let mut failed = false;
    for (i, check) in checks.iter().enumerate() {
        let value = (check.run)(input);
        if value < 0.0 {
            if mode == EvaluationMode::Shortcut {
                return INFEASIBLE;
            }
            failed = true;
            results[i] = false;
        } else {
            results[i] = true;
            sum += value;
        }
    }
    if failed {
        return INFEASIBLE;
    }
    sum
}

// ---------------------------------------------------------------------------
// executability checks
// ---------------------------------------------------------------------------

/// The ball estimate must be fresh, visually confirmed and close enough
/// to act on.
fn check_ball_plausibility(input: &EvalInput) -> f32 {
    let ball = &input.world.ball;
    if ball.source == InformationSource::Audio || ball.age > 5.0 {
        return -1.0;
    }
    if input.world.this_player.distance_to_xy(ball.position_2d()) > 1.0 {
        return -1.0;
    }
    0.0
}

fn check_own_speed(input: &EvalInput) -> f32 {
    let speed = input.world.this_player.speed.norm();
    let params = input.decider.params();
    if speed < params.own_min_speed || speed > params.own_max_speed {
        return -1.0;
    }
    0.0
}

fn check_ball_speed(input: &EvalInput) -> f32 {
    if input.world.ball.speed_norm() > input.decider.params().ball_max_speed {
        return -1.0;
    }
    0.0
}

/// With foot force sensors, the foot currently in its stepping phase must
/// be the non-kicking foot, otherwise the kick would start off the wrong
/// leg.
fn check_step_foot(input: &EvalInput) -> f32 {
    let agent = &input.world.agent;
    if !agent.has_foot_force_sensors {
        return 0.0;
    }
    match agent.step_foot {
        None => 0.0,
        Some(foot) if foot == input.decider.kicking_foot().opposite() => 0.0,
        Some(_) => -1.0,
    }
}

fn check_upright(input: &EvalInput) -> f32 {
    if input.world.this_player.up_vector_z < input.decider.params().min_up_vector_z {
        return -1.0;
    }
    0.0
}

fn check_ball_in_footprint(input: &EvalInput) -> f32 {
    let ball = input.world.ball.position_2d();
    if !input.world.this_player.is_inside_area(ball, &input.decider.params().kickable_area) {
        return -1.0;
    }
    0.0
}

/// Deviation between the desired kick direction and the direction the
/// kick would actually go given our body direction. The tolerance widens
/// for kicks far from the opponent goal.
fn check_angle_deviation(input: &EvalInput) -> f32 {
    let decider = input.decider;
    let achievable = input.world.this_player.horizontal_angle() + decider.params().relative_kick_direction;
    let deviation = (decider.kick_direction() - achievable).degrees().abs();

    let ball_goal_distance = (input.world.field.other_goal_position()
        - input.world.ball.position_2d())
    .norm();
    let max_deviation = linear_fuzzy_value(8.0, 15.0, true, ball_goal_distance) * 40.0 + 10.0;

    if deviation > max_deviation {
        return -1.0;
    }
    (max_deviation - deviation) / 10.0
}

/// The stabilizing foot's target must be reachable with the final step:
/// its yaw within the foot's valid range and its position inside the
/// last-step footprint.
fn check_stabilization_reachable(input: &EvalInput) -> f32 {
    const MIN_ANGLE: f32 = 5.0;
    const MAX_ANGLE: f32 = 45.0;
    const MAX_HALF_STEP_WIDTH: f32 = 0.03;
    const MAX_STEP_LENGTH: f32 = 0.06;

    let decider = input.decider;
    let target = decider.target_pose();
    let kicking_left = decider.kicking_foot() == crate::snapshot::SupportFoot::Left;

    let (min_angle, max_angle) =
        if kicking_left { (-MAX_ANGLE, MIN_ANGLE) } else { (-MIN_ANGLE, MAX_ANGLE) };
    let angle = target.angle.degrees();
    if angle > max_angle || angle < min_angle {
        return -1.0;
    }

    let side = if kicking_left { 1.0 } else { -1.0 };
    let angle_factor = angle.abs() / MAX_ANGLE;
    let min_x = side * decider.params().min_x_offset - MAX_HALF_STEP_WIDTH;
    let max_x = side * decider.params().min_x_offset + MAX_HALF_STEP_WIDTH;
    let min_y = -MAX_STEP_LENGTH;
    let max_y = min_y + MAX_STEP_LENGTH * (2.0 - angle_factor);

    let area = crate::geometry::Area2D::new(min_x.min(max_x), min_x.max(max_x), min_y, max_y);
    if !area.contains(target.position) {
        return -1.0;
    }
    0.0
}

// ---------------------------------------------------------------------------
// applicability checks
// ---------------------------------------------------------------------------

/// Opponent pressure: too close means no time to kick, too far makes a
/// dribble-style kick pointless. During our own pass mode the opponent's
/// effective distance is extended by the protection still remaining.
fn check_opponent_distance(input: &EvalInput) -> f32 {
    let world = input.world;
    let Some(opponent) = world.opponent_at_ball() else {
        // no opponents known, always applicable (mainly for testing)
        return 0.0;
    };

    let ball = world.ball.position_2d();
    let my_distance = world.this_player.distance_to_xy(ball);
    let mut opponent_distance = (opponent - ball).norm();

    if world.game_state == GameState::OwnPassMode {
        const OPPONENT_MAX_SPEED: f32 = 0.8;
        let elapsed = world.game_time - world.entered_pass_mode_time;
        opponent_distance += OPPONENT_MAX_SPEED * (PASS_MODE_DURATION - elapsed);
    }

    let params = input.decider.params();
    if opponent_distance >= my_distance + params.opponent_max_distance {
        return -1.0;
    }

    // minimum distance only matters when the opponent may attack us
    if world.game_state.is_own_kick() {
        return 0.0;
    }
    if opponent_distance < my_distance + params.opponent_min_distance {
        return -1.0;
    }
    0.0
}

/// How well the kick's distance range fits the intended distance.
fn check_kick_distance_fit(input: &EvalInput) -> f32 {
    let params = input.decider.params();
    let intended = input.decider.intended_kick_distance();

    // never use long kicks when a short kick is wanted
    if params.max_kick_distance > 12.0 && intended < 8.0 {
        return -1.0;
    }

    let mut distance_malus = 0.0;
    if params.min_kick_distance > intended {
        distance_malus = params.min_kick_distance - intended;
    } else if intended > params.max_kick_distance {
        distance_malus = intended - params.max_kick_distance;
    }
    34.0 - distance_malus
}

/// Do not kick the ball out of the field, except into the opponent goal.
fn check_kick_outside_field(input: &EvalInput) -> f32 {
    let world = input.world;
    let decider = input.decider;
    let ball = world.ball.position_2d();
    let direction = decider.kick_direction();
    let resulting =
        ball + direction.apply_to(Vector2::new(decider.params().min_kick_distance, 0.0));

    if resulting.x.abs() > world.field.half_length || resulting.y.abs() > world.field.half_width {
        if direction.degrees().abs() > 95.0 {
            // certainly away from the opponent goal
            return -1.0;
        }
        let y_at_goal_line =
            ball.y + direction.radians().tan() * (world.field.half_length - ball.x);
        if y_at_goal_line.abs() > world.field.goal_half_width {
            return -1.0;
        }
    }
    0.0
}

/// How hard it is to reach the kick's run-to pose; nearer is better.
fn check_walkability(input: &EvalInput) -> f32 {
    let target = input.decider.absolute_run_to_pose(input.world);
    let walk_time = input.walk_estimator.fastest_walk_time(
        &input.world.this_player.pose,
        &[crate::geometry::PoseSpeed2D::stationary(target)],
    );
    33.0 - walk_time
}

/// In the own half with an opponent at the ball, prefer kick positions
/// that keep us between ball and own goal.
fn check_block_own_goal(input: &EvalInput) -> f32 {
    let world = input.world;
    let mut position_malus = 0.0;

    if let Some(opponent) = world.opponent_at_ball() {
        let ball = world.ball.position_2d();
        if world.ball.position.x < 0.0 && (opponent - ball).norm() < 2.0 {
            let goal = world.field.own_goal_position();
            let target = input.decider.absolute_run_to_pose(world);
            let expected_ball = input.decider.expected_ball_position().xy();
            position_malus = distance_to_line(goal, expected_ball, target.position) * 10.0;
        }
    }
    33.0 - position_malus
}

/// Distance of `point` from the line through `a` and `b`.
fn distance_to_line(a: Vector2<f32>, b: Vector2<f32>, point: Vector2<f32>) -> f32 {
    let line = b - a;
    let length = line.norm();
    if length < 1e-6 {
        return (point - a).norm();
    }
    (line.x * (a.y - point.y) - line.y * (a.x - point.x)).abs() / length
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Angle, Pose2D};
    use crate::kick::params::KickParameters;
    use crate::snapshot::SupportFoot;
    use crate::walk::WalkSpeeds;
    use nalgebra::Vector3;

    fn setup() -> (WorldSnapshot, KickDecider, WalkTimeEstimator) {
        let mut world = WorldSnapshot::default();
        // stand just behind the ball, which sits in the kickable footprint
        world.ball.position = Vector3::new(0.2, -0.1, 0.0);
        let mut decider = KickDecider::new(
            KickParameters::straight_kick(SupportFoot::Right, 8.0),
            None,
        );
        decider.set_intended_kick_distance(7.0);
        decider.set_expected_ball_position(world.ball.position);
        decider.set_target_pose(Pose2D::new(-0.08, -0.02, Angle::ZERO));
        let estimator = WalkTimeEstimator::new(WalkSpeeds::default()).unwrap();
        (world, decider, estimator)
    }

    fn eval(estimator: &mut KickEstimator, world: &WorldSnapshot, decider: &KickDecider) -> f32 {
        let walk = WalkTimeEstimator::new(WalkSpeeds::default()).unwrap();
        let input = EvalInput { world, decider, walk_estimator: &walk };
        estimator.executability(&input)
    }

    #[test]
    fn test_feasible_straight_kick() {
        let (world, decider, walk) = setup();
        let mut estimator = KickEstimator::standard();
        let input = EvalInput { world: &world, decider: &decider, walk_estimator: &walk };
        let score = estimator.executability(&input);
        assert!(score >= 0.0, "expected feasible, got {score}");
    }

    #[test]
    fn test_applicability_is_cheap_prefilter() {
        let (world, mut decider, walk) = setup();
        // intended distance far beyond the kick's range: big malus but
        // still applicable; the long-kick veto needs max > 12
        decider.set_intended_kick_distance(9.0);
        let mut estimator = KickEstimator::standard();
        let input = EvalInput { world: &world, decider: &decider, walk_estimator: &walk };
        let score = estimator.applicability(&input);
        assert!(score >= 0.0);
    }

    #[test]
    fn test_not_upright_is_infeasible() {
        let (mut world, decider, _) = setup();
        world.this_player.up_vector_z = 0.9;
        let mut estimator = KickEstimator::standard();
        assert_eq!(eval(&mut estimator, &world, &decider), INFEASIBLE);
    }

    #[test]
    fn test_rolling_ball_is_infeasible() {
        let (mut world, decider, _) = setup();
        world.ball.speed = Vector3::new(0.05, 0.0, 0.0);
        let mut estimator = KickEstimator::standard();
        assert_eq!(eval(&mut estimator, &world, &decider), INFEASIBLE);
    }

    #[test]
    fn test_stale_ball_estimate_is_infeasible() {
        let (mut world, decider, _) = setup();
        world.ball.age = 10.0;
        let mut estimator = KickEstimator::standard();
        assert_eq!(eval(&mut estimator, &world, &decider), INFEASIBLE);
    }

    #[test]
    fn test_ball_outside_footprint_is_infeasible() {
        let (mut world, decider, _) = setup();
        world.ball.position = Vector3::new(0.2, 0.5, 0.0);
        let mut estimator = KickEstimator::standard();
        assert_eq!(eval(&mut estimator, &world, &decider), INFEASIBLE);
    }

    #[test]
    fn test_close_opponent_blocks_applicability() {
        let (mut world, decider, _) = setup();
        // opponent right at the ball while we are a step away
        world.opponents = vec![Vector2::new(0.2, -0.1)];
        world.this_player.pose = Pose2D::new(-1.0, 0.0, Angle::ZERO);
        let mut estimator = KickEstimator::standard();
        assert_eq!(eval(&mut estimator, &world, &decider), INFEASIBLE);
    }

    #[test]
    fn test_pass_mode_extends_opponent_distance() {
        let (mut world, decider, walk) = setup();
        world.opponents = vec![Vector2::new(1.3, 0.0)];
        world.game_state = GameState::OwnPassMode;
        world.game_time = 10.0;
        world.entered_pass_mode_time = 10.0;

        let mut estimator = KickEstimator::standard();
        let input = EvalInput { world: &world, decider: &decider, walk_estimator: &walk };
        let score = estimator.applicability(&input);
        // the full pass-mode slack pushes the opponent out of range
        assert!(score >= 0.0, "pass mode should keep the kick applicable: {score}");
    }

    #[test]
    fn test_kick_toward_goal_allowed_from_field_edge() {
        let (mut world, mut decider, walk) = setup();
        // ball near the opponent goal line, kick aimed straight at goal
        world.ball.position = Vector3::new(13.0, 0.0, 0.0);
        world.this_player.pose = Pose2D::new(12.8, -0.1, Angle::ZERO);
        decider.set_expected_ball_position(world.ball.position);
        decider.set_intended_kick_direction(Angle::ZERO);

        let input = EvalInput { world: &world, decider: &decider, walk_estimator: &walk };
        assert!(check_kick_outside_field(&input) >= 0.0);

        // aiming backwards out of the field fails
        decider.set_intended_kick_direction(Angle::deg(170.0));
        world.ball.position = Vector3::new(-14.5, 0.0, 0.0);
        let input = EvalInput { world: &world, decider: &decider, walk_estimator: &walk };
        assert!(check_kick_outside_field(&input) < 0.0);
    }

    #[test]
    fn test_shortcut_and_exhaustive_agree() {
        // property: both modes produce the same verdict on identical input
        let scenarios: Vec<Box<dyn Fn(&mut WorldSnapshot, &mut KickDecider)>> = vec![
            Box::new(|_, _| {}),
            Box::new(|w, _| w.this_player.up_vector_z = 0.5),
            Box::new(|w, _| w.ball.speed = Vector3::new(0.1, 0.0, 0.0)),
            Box::new(|w, _| w.ball.age = 20.0),
            Box::new(|w, _| w.opponents = vec![Vector2::new(0.2, -0.1)]),
            Box::new(|_, d| d.set_intended_kick_distance(100.0)),
        ];

        for scenario in scenarios {
            let (mut world, mut decider, walk) = setup();
            scenario(&mut world, &mut decider);

            let mut shortcut = KickEstimator::standard().with_mode(EvaluationMode::Shortcut);
            let mut exhaustive = KickEstimator::standard().with_mode(EvaluationMode::Exhaustive);

            let input = EvalInput { world: &world, decider: &decider, walk_estimator: &walk };
            let s = shortcut.executability(&input);
            let e = exhaustive.executability(&input);
            assert_eq!(
                s < 0.0,
                e < 0.0,
                "verdicts disagree: shortcut {s}, exhaustive {e}"
            );
            if s >= 0.0 {
                assert!((s - e).abs() < 1e-4, "feasible scores match: {s} vs {e}");
            }
        }
    }

    #[test]
    fn test_exhaustive_mode_retains_results() {
        let (mut world, decider, walk) = setup();
        world.this_player.up_vector_z = 0.5;

        let mut estimator = KickEstimator::standard().with_mode(EvaluationMode::Exhaustive);
        let input = EvalInput { world: &world, decider: &decider, walk_estimator: &walk };
        assert_eq!(estimator.executability(&input), INFEASIBLE);

        let names = estimator.check_names();
        let results = estimator.last_results();
        let upright_index = names.iter().position(|n| *n == "upright").unwrap();
        assert!(!results[upright_index], "upright check recorded as failed");
        // an unrelated check still passed
        let ball_speed_index = names.iter().position(|n| *n == "ball_speed").unwrap();
        assert!(results[ball_speed_index]);
    }

    #[test]
    fn test_shortcut_skips_executability_on_applicability_failure() {
        // failing applicability in shortcut mode never
        // reaches the executability list
        fn poisoned(_input: &EvalInput) -> f32 {
            panic!("executability check must not run");
        }

        let (mut world, decider, walk) = setup();
        // make applicability fail via a close opponent
        world.opponents = vec![Vector2::new(0.2, -0.1)];
        world.this_player.pose = Pose2D::new(-1.0, 0.0, Angle::ZERO);

        let mut estimator = KickEstimator::standard();
        estimator.add_executability_check(Check::new("poisoned", poisoned));

        let input = EvalInput { world: &world, decider: &decider, walk_estimator: &walk };
        assert_eq!(estimator.executability(&input), INFEASIBLE);
    }

    #[test]
    fn test_priority_scales_feasible_scores() {
        let (world, decider, walk) = setup();
        let mut params = decider.params().clone();
        params.priority = 2.0;
        let mut boosted = KickDecider::new(params, None);
        boosted.set_intended_kick_distance(decider.intended_kick_distance());
        boosted.set_expected_ball_position(decider.expected_ball_position());
        boosted.set_target_pose(decider.target_pose());

        let mut estimator = KickEstimator::standard();
        let input = EvalInput { world: &world, decider: &decider, walk_estimator: &walk };
        let base = estimator.executability(&input);

        let mut estimator = KickEstimator::standard();
        let input = EvalInput { world: &world, decider: &boosted, walk_estimator: &walk };
        let double = estimator.executability(&input);

        assert!(base >= 0.0);
        assert!((double - 2.0 * base).abs() < 1e-3);
    }

    #[test]
    fn test_distance_to_line() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(1.0, 0.0);
        assert!((distance_to_line(a, b, Vector2::new(0.5, 2.0)) - 2.0).abs() < 1e-6);
        assert!(distance_to_line(a, b, Vector2::new(0.5, 0.0)).abs() < 1e-6);
    }
}
