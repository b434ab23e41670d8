//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads at runtime lives here so a
//! host can ship balance tweaks as JSON without recompiling. Missing fields
//! fall back to the defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Invalid or unreadable tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be {expected} (got {value})")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f32,
    },
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Track ===
    pub lane_width: f32,
    pub lane_ease: f32,
    pub start_speed: f32,
    pub max_speed: f32,
    /// Speed gained per difficulty level
    pub speed_per_level: f32,
    pub difficulty_interval: f32,

    // === Actor ===
    pub jump_strength: f32,
    pub gravity: f32,
    pub roll_duration: f32,

    // === World ===
    pub spawn_z: f32,
    pub despawn_z: f32,
    pub initial_spawn_timer: f32,
    pub base_spawn_rate: f32,
    pub min_base_spawn_rate: f32,
    pub spawn_rate_increase: f32,
    pub spawn_jitter: f32,
    /// Probability (0-1) that a spawn event carries a power-up
    pub powerup_spawn_chance: f32,

    // === Pickups ===
    pub coin_value: u64,
    pub powerup_duration: f32,
    pub magnet_radius: f32,
    pub magnet_pull: f32,

    // === Input ===
    /// Seconds a lane intent must be held before it commits
    pub gaze_duration: f32,

    // === Timing ===
    pub max_frame_dt: f32,
    pub max_step_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_width: LANE_WIDTH,
            lane_ease: LANE_EASE,
            start_speed: GAME_START_SPEED,
            max_speed: GAME_MAX_SPEED,
            speed_per_level: 2.0,
            difficulty_interval: DIFFICULTY_INTERVAL,

            jump_strength: JUMP_STRENGTH,
            gravity: GRAVITY,
            roll_duration: ROLL_DURATION,

            spawn_z: SPAWN_Z,
            despawn_z: DESPAWN_Z,
            initial_spawn_timer: INITIAL_SPAWN_TIMER,
            base_spawn_rate: BASE_SPAWN_RATE,
            min_base_spawn_rate: MIN_BASE_SPAWN_RATE,
            spawn_rate_increase: SPAWN_RATE_INCREASE,
            spawn_jitter: SPAWN_JITTER,
            powerup_spawn_chance: POWERUP_SPAWN_CHANCE,

            coin_value: COIN_VALUE,
            powerup_duration: POWERUP_DURATION,
            magnet_radius: MAGNET_RADIUS,
            magnet_pull: MAGNET_PULL,

            gaze_duration: GAZE_DURATION,

            max_frame_dt: MAX_FRAME_DT,
            max_step_dt: MAX_STEP_DT,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning ({} fields overridden)", tuning.overridden_fields());
        Ok(tuning)
    }

    /// Check every value the simulation divides by or clamps against
    pub fn validate(&self) -> Result<(), TuningError> {
        // NaN slips through every comparison below
        for (field, value) in self.float_fields() {
            if !value.is_finite() {
                return Err(out_of_range(field, "finite", value));
            }
        }
        if self.coin_value == 0 {
            return Err(out_of_range("coin_value", "at least 1", 0.0));
        }

        positive("lane_width", self.lane_width)?;
        positive("lane_ease", self.lane_ease)?;
        positive("start_speed", self.start_speed)?;
        positive("difficulty_interval", self.difficulty_interval)?;
        positive("jump_strength", self.jump_strength)?;
        positive("roll_duration", self.roll_duration)?;
        positive("min_base_spawn_rate", self.min_base_spawn_rate)?;
        positive("powerup_duration", self.powerup_duration)?;
        positive("max_step_dt", self.max_step_dt)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        non_negative("speed_per_level", self.speed_per_level)?;
        non_negative("spawn_rate_increase", self.spawn_rate_increase)?;
        non_negative("spawn_jitter", self.spawn_jitter)?;
        non_negative("initial_spawn_timer", self.initial_spawn_timer)?;
        non_negative("magnet_radius", self.magnet_radius)?;
        non_negative("magnet_pull", self.magnet_pull)?;
        non_negative("gaze_duration", self.gaze_duration)?;

        if self.gravity >= 0.0 {
            return Err(out_of_range("gravity", "negative", self.gravity));
        }
        if self.max_speed < self.start_speed {
            return Err(out_of_range("max_speed", ">= start_speed", self.max_speed));
        }
        if self.base_spawn_rate < self.min_base_spawn_rate {
            return Err(out_of_range(
                "base_spawn_rate",
                ">= min_base_spawn_rate",
                self.base_spawn_rate,
            ));
        }
        if !(0.0..=1.0).contains(&self.powerup_spawn_chance) {
            return Err(out_of_range(
                "powerup_spawn_chance",
                "within 0..=1",
                self.powerup_spawn_chance,
            ));
        }
        if self.despawn_z <= self.spawn_z {
            return Err(out_of_range("despawn_z", "> spawn_z", self.despawn_z));
        }
        Ok(())
    }

    fn float_fields(&self) -> [(&'static str, f32); 23] {
        [
            ("lane_width", self.lane_width),
            ("lane_ease", self.lane_ease),
            ("start_speed", self.start_speed),
            ("max_speed", self.max_speed),
            ("speed_per_level", self.speed_per_level),
            ("difficulty_interval", self.difficulty_interval),
            ("jump_strength", self.jump_strength),
            ("gravity", self.gravity),
            ("roll_duration", self.roll_duration),
            ("spawn_z", self.spawn_z),
            ("despawn_z", self.despawn_z),
            ("initial_spawn_timer", self.initial_spawn_timer),
            ("base_spawn_rate", self.base_spawn_rate),
            ("min_base_spawn_rate", self.min_base_spawn_rate),
            ("spawn_rate_increase", self.spawn_rate_increase),
            ("spawn_jitter", self.spawn_jitter),
            ("powerup_spawn_chance", self.powerup_spawn_chance),
            ("powerup_duration", self.powerup_duration),
            ("magnet_radius", self.magnet_radius),
            ("magnet_pull", self.magnet_pull),
            ("gaze_duration", self.gaze_duration),
            ("max_frame_dt", self.max_frame_dt),
            ("max_step_dt", self.max_step_dt),
        ]
    }

    fn overridden_fields(&self) -> usize {
        let ours = serde_json::to_value(self).ok();
        let defaults = serde_json::to_value(Tuning::default()).ok();
        match (ours, defaults) {
            (Some(serde_json::Value::Object(a)), Some(serde_json::Value::Object(b))) => {
                a.iter().filter(|(k, v)| b.get(*k) != Some(*v)).count()
            }
            _ => 0,
        }
    }
}

fn out_of_range(field: &'static str, expected: &'static str, value: f32) -> TuningError {
    TuningError::OutOfRange {
        field,
        expected,
        value,
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, "positive", value))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, "non-negative", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "start_speed": 15.0 }"#).unwrap();
        assert_eq!(tuning.start_speed, 15.0);
        assert_eq!(tuning.max_speed, GAME_MAX_SPEED);
        assert_eq!(tuning.coin_value, 10);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json_str(r#"{ "powerup_spawn_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "powerup_spawn_chance",
                ..
            }
        ));

        let err = Tuning::from_json_str(r#"{ "gravity": 9.8 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "gravity", .. }));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let setters: [fn(&mut Tuning); 23] = [
            |t| t.lane_width = f32::NAN,
            |t| t.lane_ease = f32::NAN,
            |t| t.start_speed = f32::NAN,
            |t| t.max_speed = f32::NAN,
            |t| t.speed_per_level = f32::NAN,
            |t| t.difficulty_interval = f32::NAN,
            |t| t.jump_strength = f32::NAN,
            |t| t.gravity = f32::NAN,
            |t| t.roll_duration = f32::NAN,
            |t| t.spawn_z = f32::NAN,
            |t| t.despawn_z = f32::NAN,
            |t| t.initial_spawn_timer = f32::NAN,
            |t| t.base_spawn_rate = f32::NAN,
            |t| t.min_base_spawn_rate = f32::NAN,
            |t| t.spawn_rate_increase = f32::NAN,
            |t| t.spawn_jitter = f32::NAN,
            |t| t.powerup_spawn_chance = f32::NAN,
            |t| t.powerup_duration = f32::NAN,
            |t| t.magnet_radius = f32::NAN,
            |t| t.magnet_pull = f32::NAN,
            |t| t.gaze_duration = f32::NAN,
            |t| t.max_frame_dt = f32::NAN,
            |t| t.max_step_dt = f32::NAN,
        ];
        for (i, set) in setters.iter().enumerate() {
            let mut tuning = Tuning::default();
            set(&mut tuning);
            assert!(tuning.validate().is_err(), "NaN accepted in field #{i}");
        }

        let tuning = Tuning {
            max_speed: f32::INFINITY,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::OutOfRange { field: "max_speed", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_coin_value() {
        let err = Tuning::from_json_str(r#"{ "coin_value": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "coin_value", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json_str("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
