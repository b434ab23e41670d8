//! Gameplay events
//!
//! Each simulation step records what happened as [`GameEvent`]s. The session
//! forwards them to any registered [`SessionListener`] after the step
//! completes, so listeners never observe a half-updated world.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::{ObstacleKind, PowerUpKind};

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    ObstacleCollision { kind: ObstacleKind },
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOverReason::ObstacleCollision { .. } => f.write_str("obstacle collision"),
        }
    }
}

/// Something observable that happened during a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CoinCollected { points: u64 },
    ScoreChanged { score: u64 },
    PowerUpActivated { kind: PowerUpKind },
    PowerUpDeactivated { kind: PowerUpKind },
    DifficultyChanged { level: u32, speed: f32 },
    GameOver { reason: GameOverReason },
    /// Die clip finished; the game-over screen can be shown
    DeathSequenceFinished,
}

/// Callbacks for the presentation layer. Every method defaults to a no-op.
pub trait SessionListener {
    fn on_score_changed(&mut self, _score: u64) {}
    fn on_coin_collected(&mut self, _points: u64) {}
    fn on_power_up_activated(&mut self, _kind: PowerUpKind) {}
    fn on_power_up_deactivated(&mut self, _kind: PowerUpKind) {}
    fn on_difficulty_changed(&mut self, _level: u32, _speed: f32) {}
    fn on_game_over(&mut self, _reason: GameOverReason) {}
    fn on_death_sequence_finished(&mut self) {}
}

/// Route one event to the matching callback
pub fn dispatch(listener: &mut dyn SessionListener, event: &GameEvent) {
    match *event {
        GameEvent::CoinCollected { points } => listener.on_coin_collected(points),
        GameEvent::ScoreChanged { score } => listener.on_score_changed(score),
        GameEvent::PowerUpActivated { kind } => listener.on_power_up_activated(kind),
        GameEvent::PowerUpDeactivated { kind } => listener.on_power_up_deactivated(kind),
        GameEvent::DifficultyChanged { level, speed } => {
            listener.on_difficulty_changed(level, speed)
        }
        GameEvent::GameOver { reason } => listener.on_game_over(reason),
        GameEvent::DeathSequenceFinished => listener.on_death_sequence_finished(),
    }
}
