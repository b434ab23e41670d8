//! Lane Dash - A three-lane endless runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor, spawning, collisions, power-ups)
//! - `session`: Menu/running/paused/game-over orchestration
//! - `input`: Discrete input mapping and lane-intent debounce
//! - `events`: Gameplay events and listener callbacks
//! - `snapshot`: Read-only views for the presentation layer
//! - `tuning`: Data-driven game balance

pub mod events;
pub mod input;
pub mod session;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use events::{GameEvent, GameOverReason, SessionListener};
pub use input::{InputKind, LaneIntentDebouncer};
pub use session::{Session, SessionPhase, TransitionError};
pub use snapshot::{EntityInstance, Snapshot};
pub use tuning::{Tuning, TuningError};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Longest simulation step; larger ticks are split into substeps
    pub const MAX_STEP_DT: f32 = 1.0 / 60.0;
    /// Longest frame delta accepted before clamping (stall protection)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Number of lanes on the track
    pub const LANE_COUNT: u8 = 3;
    /// Lateral distance between lane centers
    pub const LANE_WIDTH: f32 = 4.0;
    /// Exponential smoothing rate for lane changes (1/s)
    pub const LANE_EASE: f32 = 10.0;

    /// Track speed
    pub const GAME_START_SPEED: f32 = 12.0;
    pub const GAME_MAX_SPEED: f32 = 40.0;
    /// Distance per difficulty level
    pub const DIFFICULTY_INTERVAL: f32 = 1000.0;

    /// Actor kinematics
    pub const JUMP_STRENGTH: f32 = 25.0;
    pub const GRAVITY: f32 = -70.0;
    pub const ROLL_DURATION: f32 = 0.7;

    /// Actor silhouette
    pub const ACTOR_WIDTH: f32 = 1.0;
    pub const ACTOR_HEIGHT: f32 = 2.5;
    pub const ACTOR_DEPTH: f32 = 1.0;
    /// Crouched height while rolling
    pub const ACTOR_ROLL_HEIGHT: f32 = 1.2;
    /// Extra margin while airborne
    pub const JUMP_BOX_PADDING: f32 = 0.2;
    /// Margin applied to every actor box
    pub const ACTOR_BOX_PADDING: f32 = 0.1;

    /// World depth where entities appear (far from the actor)
    pub const SPAWN_Z: f32 = -150.0;
    /// World depth past which entities are recycled
    pub const DESPAWN_Z: f32 = 20.0;

    /// Spawn cadence
    pub const INITIAL_SPAWN_TIMER: f32 = 2.0;
    pub const BASE_SPAWN_RATE: f32 = 2.0;
    pub const MIN_BASE_SPAWN_RATE: f32 = 0.5;
    pub const SPAWN_RATE_INCREASE: f32 = 0.3;
    pub const SPAWN_JITTER: f32 = 0.8;
    pub const POWERUP_SPAWN_CHANCE: f32 = 0.08;
    /// Difficulty at which a second obstacle may join a spawn event
    pub const DOUBLE_OBSTACLE_LEVEL: u32 = 3;

    /// Coin runs
    pub const COIN_RUN_LENGTH: usize = 5;
    pub const COIN_SPACING: f32 = 3.0;
    pub const COIN_VALUE: u64 = 10;
    pub const COIN_HEIGHT: f32 = 1.5;

    /// Power-ups
    pub const POWERUP_HEIGHT: f32 = 1.6;
    pub const POWERUP_DURATION: f32 = 15.0;
    pub const MAGNET_RADIUS: f32 = 10.0;
    pub const MAGNET_PULL: f32 = 15.0;

    /// Lane-intent (gaze) debounce
    pub const GAZE_DURATION: f32 = 0.5;
}

/// One of the three discrete tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Lane(u8);

impl Lane {
    pub const LEFT: Lane = Lane(0);
    pub const CENTER: Lane = Lane(1);
    pub const RIGHT: Lane = Lane(2);

    /// Returns `None` for anything outside 0..=2
    pub fn new(index: u8) -> Option<Self> {
        (index < consts::LANE_COUNT).then_some(Self(index))
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// Neighbouring lane in `direction`, clamped to the track
    pub fn offset(self, direction: i8) -> Self {
        let target = (self.0 as i16 + direction as i16).clamp(0, consts::LANE_COUNT as i16 - 1);
        Self(target as u8)
    }

    /// One of the two other lanes, picked by `pick` (0 or 1)
    pub fn other(self, pick: u8) -> Self {
        Self((self.0 + 1 + pick.min(1)) % consts::LANE_COUNT)
    }

    /// World X of the lane center
    #[inline]
    pub fn x(self, lane_width: f32) -> f32 {
        lane_x(self.0, lane_width)
    }
}

impl Default for Lane {
    fn default() -> Self {
        Self::CENTER
    }
}

/// World X for a lane index
#[inline]
pub fn lane_x(index: u8, lane_width: f32) -> f32 {
    (index as f32 - 1.0) * lane_width
}

/// Frame-rate independent exponential approach of `current` toward `target`
#[inline]
pub fn ease_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (rate * dt).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_bounds() {
        assert_eq!(Lane::new(2), Some(Lane::RIGHT));
        assert_eq!(Lane::new(3), None);
        assert_eq!(Lane::LEFT.offset(-1), Lane::LEFT);
        assert_eq!(Lane::RIGHT.offset(1), Lane::RIGHT);
        assert_eq!(Lane::CENTER.offset(1), Lane::RIGHT);
    }

    #[test]
    fn test_other_lane_never_matches() {
        for index in 0..3 {
            let lane = Lane::new(index).unwrap();
            assert_ne!(lane.other(0), lane);
            assert_ne!(lane.other(1), lane);
            assert_ne!(lane.other(0), lane.other(1));
        }
    }

    #[test]
    fn test_lane_x() {
        assert_eq!(Lane::LEFT.x(4.0), -4.0);
        assert_eq!(Lane::CENTER.x(4.0), 0.0);
        assert_eq!(Lane::RIGHT.x(4.0), 4.0);
    }

    #[test]
    fn test_ease_toward_never_overshoots() {
        assert_eq!(ease_toward(0.0, 4.0, 10.0, 1.0), 4.0);
        let x = ease_toward(0.0, 4.0, 10.0, 0.016);
        assert!(x > 0.0 && x < 4.0);
    }
}
