//! Read-only per-cycle inputs from the world and agent models.
//!
//! The movement core never writes into these; a fresh snapshot arrives
//! each control cycle from the (out-of-scope) state estimation layer.

use crate::geometry::{Angle, Area2D, Pose2D};
use nalgebra::{Rotation3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// The foot currently treated as the kinematic anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportFoot {
    Left,
    Right,
    Both,
}

impl SupportFoot {
    pub fn opposite(&self) -> SupportFoot {
        match self {
            SupportFoot::Left => SupportFoot::Right,
            SupportFoot::Right => SupportFoot::Left,
            SupportFoot::Both => SupportFoot::Both,
        }
    }

    /// Sign convention used throughout the step planner: left = -1,
    /// right = +1 on the lateral axis.
    pub fn side_sign(&self) -> f32 {
        match self {
            SupportFoot::Left => -1.0,
            _ => 1.0,
        }
    }
}

/// Where a world-model estimate came from. Audio-only ball estimates are
/// not precise enough to kick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InformationSource {
    Vision,
    Audio,
}

/// Game-state gate consumed by the kick evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    PlayOn,
    OwnKickOff,
    OwnFreeKick,
    OwnPassMode,
    OpponentKickOff,
    OpponentFreeKick,
    OpponentPassMode,
}

impl GameState {
    /// True while we have the ball by rule and opponents must keep their
    /// distance.
    pub fn is_own_kick(&self) -> bool {
        matches!(self, GameState::OwnKickOff | GameState::OwnFreeKick | GameState::OwnPassMode)
    }
}

/// How long the pass-mode protection lasts once entered (seconds).
pub const PASS_MODE_DURATION: f32 = 4.0;

/// Torso-relative pose of one limb as sensed this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbPose {
    pub position: Vector3<f32>,
    pub orientation: Rotation3<f32>,
}

impl Default for LimbPose {
    fn default() -> Self {
        LimbPose { position: Vector3::zeros(), orientation: Rotation3::identity() }
    }
}

/// Agent-model snapshot: proprioception in the torso frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshot {
    pub center_of_mass: Vector3<f32>,
    /// Static pivot point (pelvis) used to blend a stable adjustment pivot.
    pub static_pivot_point: Vector3<f32>,
    pub left_foot: LimbPose,
    pub right_foot: LimbPose,
    pub has_foot_force_sensors: bool,
    /// The foot currently in its off-ground stepping phase, if the force
    /// sensors can tell.
    pub step_foot: Option<SupportFoot>,
}

impl Default for AgentSnapshot {
    fn default() -> Self {
        AgentSnapshot {
            center_of_mass: Vector3::new(0.0, 0.0, -0.075),
            static_pivot_point: Vector3::new(0.0, 0.0, -0.15),
            left_foot: LimbPose {
                position: Vector3::new(-0.055, 0.0, -0.25),
                orientation: Rotation3::identity(),
            },
            right_foot: LimbPose {
                position: Vector3::new(0.055, 0.0, -0.25),
                orientation: Rotation3::identity(),
            },
            has_foot_force_sensors: true,
            step_foot: None,
        }
    }
}

/// Per-cycle geometric ball speed decay used for short-horizon prediction.
const BALL_SPEED_DECAY: f32 = 0.94;

#[derive(Debug, Clone, PartialEq)]
pub struct BallSnapshot {
    pub position: Vector3<f32>,
    /// Velocity in metres per cycle.
    pub speed: Vector3<f32>,
    /// Seconds since the estimate was last confirmed.
    pub age: f32,
    pub source: InformationSource,
}

impl Default for BallSnapshot {
    fn default() -> Self {
        BallSnapshot {
            position: Vector3::zeros(),
            speed: Vector3::zeros(),
            age: 0.0,
            source: InformationSource::Vision,
        }
    }
}

impl BallSnapshot {
    pub fn position_2d(&self) -> Vector2<f32> {
        self.position.xy()
    }

    pub fn speed_norm(&self) -> f32 {
        self.speed.norm()
    }

    /// Rolling-ball prediction `cycles` ahead under geometric speed decay.
    pub fn future_position(&self, cycles: usize) -> Vector3<f32> {
        let decay_sum = if cycles == 0 {
            0.0
        } else {
            (1.0 - BALL_SPEED_DECAY.powi(cycles as i32)) / (1.0 - BALL_SPEED_DECAY)
        };
        self.position + self.speed * decay_sum
    }
}

/// This agent's global state as estimated by localization.
#[derive(Debug, Clone, PartialEq)]
pub struct ThisPlayer {
    /// Global 2D pose on the field.
    pub pose: Pose2D,
    /// Body orientation estimate in the global frame.
    pub orientation: Rotation3<f32>,
    /// Own velocity in metres per cycle.
    pub speed: Vector3<f32>,
    /// z-component of the body-up vector; 1.0 = perfectly upright.
    pub up_vector_z: f32,
}

impl Default for ThisPlayer {
    fn default() -> Self {
        ThisPlayer {
            pose: Pose2D::default(),
            orientation: Rotation3::identity(),
            speed: Vector3::zeros(),
            up_vector_z: 1.0,
        }
    }
}

impl ThisPlayer {
    pub fn horizontal_angle(&self) -> Angle {
        self.pose.angle
    }

    pub fn distance_to_xy(&self, point: Vector2<f32>) -> f32 {
        self.pose.distance_to(point)
    }

    /// Transform a global point into this player's local 2D frame.
    pub fn local_position(&self, global: Vector2<f32>) -> Vector2<f32> {
        self.pose.apply_inverse_to(&Pose2D::from_position(global, Angle::ZERO)).position
    }

    /// Is the (global) point inside the given local-frame area?
    pub fn is_inside_area(&self, global: Vector2<f32>, area: &Area2D) -> bool {
        area.contains(self.local_position(global))
    }
}

/// Static field geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldModel {
    pub half_length: f32,
    pub half_width: f32,
    pub goal_half_width: f32,
    /// Offset between ball center and kick contact reference.
    pub ball_radius_offset: f32,
}

impl Default for FieldModel {
    fn default() -> Self {
        FieldModel {
            half_length: 15.0,
            half_width: 10.0,
            goal_half_width: 1.05,
            ball_radius_offset: 0.042,
        }
    }
}

impl FieldModel {
    pub fn other_goal_position(&self) -> Vector2<f32> {
        Vector2::new(self.half_length, 0.0)
    }

    pub fn own_goal_position(&self) -> Vector2<f32> {
        Vector2::new(-self.half_length, 0.0)
    }
}

/// Everything the movement core reads in one control cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldSnapshot {
    pub this_player: ThisPlayer,
    pub agent: AgentSnapshot,
    pub ball: BallSnapshot,
    /// Global 2D positions of known opponents.
    pub opponents: Vec<Vector2<f32>>,
    pub teammates: Vec<Vector2<f32>>,
    pub game_state: GameState,
    /// Seconds of game time.
    pub game_time: f32,
    /// Game time at which pass mode was entered (if it ever was).
    pub entered_pass_mode_time: f32,
    pub field: FieldModel,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::PlayOn
    }
}

impl WorldSnapshot {
    /// The opponent closest to the ball, if any opponent is known.
    pub fn opponent_at_ball(&self) -> Option<Vector2<f32>> {
        let ball = self.ball.position_2d();
        self.opponents
            .iter()
            .copied()
            .min_by(|a, b| {
                let da = (a - ball).norm_squared();
                let db = (b - ball).norm_squared();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}
