//! Heuristic walk-time estimation.
//!
//! Estimates how long it takes to reach a target pose (or a two-leg path)
//! in any of eight walk directions, including the turn-in and turn-out
//! time. Used by the kick evaluator's walkability check and by path
//! reasoning.

use crate::error::{ConfigError, Result};
use crate::geometry::{Angle, Pose2D, PoseSpeed2D};
use serde::{Deserialize, Serialize};

/// Relative body direction a walk can be performed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkMode {
    Forward,
    Backward,
    LeftSide,
    RightSide,
    DiagonalLeft,
    DiagonalRight,
    DiagonalBackLeft,
    DiagonalBackRight,
}

impl WalkMode {
    pub const ALL: [WalkMode; 8] = [
        WalkMode::Forward,
        WalkMode::Backward,
        WalkMode::LeftSide,
        WalkMode::RightSide,
        WalkMode::DiagonalLeft,
        WalkMode::DiagonalRight,
        WalkMode::DiagonalBackLeft,
        WalkMode::DiagonalBackRight,
    ];

    /// Relative body direction of this mode, degrees.
    fn direction_deg(&self) -> f32 {
        match self {
            WalkMode::Forward => 0.0,
            WalkMode::Backward => 180.0,
            WalkMode::LeftSide => 90.0,
            WalkMode::RightSide => -90.0,
            WalkMode::DiagonalLeft => 45.0,
            WalkMode::DiagonalRight => -45.0,
            WalkMode::DiagonalBackLeft => 135.0,
            WalkMode::DiagonalBackRight => -135.0,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Straight-line speeds per walk mode (m/s) plus the turn speed (deg/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkSpeeds {
    /// Indexed like [`WalkMode::ALL`].
    pub modes: [f32; 8],
    pub turn: f32,
}

impl Default for WalkSpeeds {
    fn default() -> Self {
        WalkSpeeds { modes: [0.8, 0.6, 0.5, 0.5, 0.6, 0.6, 0.5, 0.5], turn: 90.0 }
    }
}

/// Estimates walking durations; construction validates all speeds.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkTimeEstimator {
    speeds: WalkSpeeds,
}

impl WalkTimeEstimator {
    pub fn new(speeds: WalkSpeeds) -> Result<Self> {
        for (mode, speed) in WalkMode::ALL.iter().zip(speeds.modes) {
            if !(speed > 0.0) || !speed.is_finite() {
                return Err(ConfigError::NonPositiveSpeed { mode: mode_name(*mode), value: speed });
            }
        }
        if !(speeds.turn > 0.0) || !speeds.turn.is_finite() {
            return Err(ConfigError::NonPositiveSpeed { mode: "turn", value: speeds.turn });
        }
        Ok(WalkTimeEstimator { speeds })
    }

    pub fn walk_speed(&self, mode: WalkMode) -> f32 {
        self.speeds.modes[mode.index()]
    }

    pub fn turn_speed(&self) -> f32 {
        self.speeds.turn
    }

    /// The fastest mode to traverse the path, and its time.
    pub fn fastest_walk(&self, current: &Pose2D, path: &[PoseSpeed2D]) -> (WalkMode, f32) {
        let mut best_mode = WalkMode::Forward;
        let mut best_time = f32::INFINITY;
        for mode in WalkMode::ALL {
            let time = self.estimate_walk_time(current, path, mode);
            if time < best_time {
                best_time = time;
                best_mode = mode;
            }
        }
        (best_mode, best_time)
    }

    pub fn fastest_walk_time(&self, current: &Pose2D, path: &[PoseSpeed2D]) -> f32 {
        self.fastest_walk(current, path).1
    }

    pub fn fastest_walk_mode(&self, current: &Pose2D, path: &[PoseSpeed2D]) -> WalkMode {
        self.fastest_walk(current, path).0
    }

    /// Time (seconds) to traverse `path` using `mode` for the first leg.
    ///
    /// Per leg: turn into the mode's walk direction, travel the straight
    /// line, then turn into the target direction. For the second leg every
    /// mode is tried and the fastest taken. Paths longer than two legs are
    /// estimated greedily leg by leg and get slow to evaluate; callers
    /// pass at most two.
    pub fn estimate_walk_time(&self, current: &Pose2D, path: &[PoseSpeed2D], mode: WalkMode) -> f32 {
        let Some((first, rest)) = path.split_first() else {
            return 0.0;
        };
        let first_pose = first.pose;

        // time for turning into the desired walk-mode direction
        let direction_to = current.direction_to(first_pose.position);
        let dir_to_go = direction_to - current.angle;
        let dir_to_turn = dir_to_go - Angle::deg(mode.direction_deg());
        let mut walk_time = dir_to_turn.degrees().abs() / self.speeds.turn;

        // time for getting there
        let distance = current.distance_to(first_pose.position);
        walk_time += distance / self.speeds.modes[mode.index()];

        if !rest.is_empty() {
            // try each walk mode for the next leg, take the fastest
            let heading = direction_to - Angle::deg(mode.direction_deg());
            let next_pose = Pose2D::from_position(first_pose.position, heading);

            let mut min_time = f32::INFINITY;
            for next_mode in WalkMode::ALL {
                let time = self.estimate_walk_time(&next_pose, rest, next_mode);
                if time < min_time {
                    min_time = time;
                }
            }
            walk_time += min_time;
        } else {
            // time for turning into the final direction
            let dir_to_go = direction_to - first_pose.angle;
            let dir_to_turn = dir_to_go - Angle::deg(mode.direction_deg());
            walk_time += dir_to_turn.degrees().abs() / self.speeds.turn;
        }

        walk_time
    }
}

fn mode_name(mode: WalkMode) -> &'static str {
    match mode {
        WalkMode::Forward => "forward",
        WalkMode::Backward => "backward",
        WalkMode::LeftSide => "left_side",
        WalkMode::RightSide => "right_side",
        WalkMode::DiagonalLeft => "diagonal_left",
        WalkMode::DiagonalRight => "diagonal_right",
        WalkMode::DiagonalBackLeft => "diagonal_back_left",
        WalkMode::DiagonalBackRight => "diagonal_back_right",
    }
}
