//! Distance-driven difficulty
//!
//! Level only ever goes up. Each new level steps the track speed (capped) and
//! tightens the spawn base rate (floored).

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Difficulty level from distance traveled (1-based)
#[inline]
pub fn level_for_distance(distance: f32, interval: f32) -> u32 {
    (distance.max(0.0) / interval).floor() as u32 + 1
}

/// Track speed at `level`, capped at `max_speed`
pub fn speed_for_level(level: u32, tuning: &Tuning) -> f32 {
    (tuning.start_speed + tuning.speed_per_level * level as f32).min(tuning.max_speed)
}

/// Spawn base rate at `level`, floored at `min_base_spawn_rate`
pub fn base_spawn_rate_for_level(level: u32, tuning: &Tuning) -> f32 {
    (tuning.base_spawn_rate - level as f32 * tuning.spawn_rate_increase)
        .max(tuning.min_base_spawn_rate)
}

/// Current difficulty and the values it drives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub level: u32,
    pub game_speed: f32,
    pub base_spawn_rate: f32,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            level: 1,
            game_speed: tuning.start_speed,
            base_spawn_rate: tuning.base_spawn_rate,
        }
    }

    /// Re-evaluate from distance; returns the new level if it went up
    pub fn update(&mut self, distance: f32, tuning: &Tuning) -> Option<u32> {
        let level = level_for_distance(distance, tuning.difficulty_interval);
        if level <= self.level {
            return None;
        }
        self.level = level;
        self.game_speed = speed_for_level(level, tuning);
        self.base_spawn_rate = base_spawn_rate_for_level(level, tuning);
        log::info!(
            "Difficulty level {}! Speed: {:.1}, spawn base rate: {:.2}",
            level,
            self.game_speed,
            self.base_spawn_rate
        );
        Some(level)
    }

    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }
}
