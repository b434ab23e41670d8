//! Simulation world state
//!
//! Everything a run mutates lives in [`World`], owned by the session. No
//! module-level state anywhere.

use super::actor::Actor;
use super::chaser::Chaser;
use super::difficulty::Difficulty;
use super::powerup::PowerUps;
use super::spawn::SpawnManager;
use crate::events::GameOverReason;
use crate::tuning::Tuning;

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub actor: Actor,
    pub spawner: SpawnManager,
    pub power_ups: PowerUps,
    pub difficulty: Difficulty,
    pub chaser: Chaser,
    pub score: u64,
    /// Distance traveled this run
    pub distance: f32,
    pub coins_collected: u32,
    /// Seconds of simulated running (excludes the game-over tail)
    pub run_time: f32,
    /// Simulation step counter
    pub time_steps: u64,
    /// Set once a lethal collision happened
    pub game_over: Option<GameOverReason>,
    pub(crate) death_reported: bool,
}

impl World {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            actor: Actor::default(),
            spawner: SpawnManager::new(seed, tuning),
            power_ups: PowerUps::default(),
            difficulty: Difficulty::new(tuning),
            chaser: Chaser::default(),
            score: 0,
            distance: 0.0,
            coins_collected: 0,
            run_time: 0.0,
            time_steps: 0,
            game_over: None,
            death_reported: false,
        }
    }

    #[inline]
    pub fn game_speed(&self) -> f32 {
        self.difficulty.game_speed
    }

    #[inline]
    pub fn difficulty_level(&self) -> u32 {
        self.difficulty.level
    }

    /// Back to the start of a run. The RNG stream continues so consecutive
    /// runs differ; everything else returns to its initial value.
    pub fn reset(&mut self, tuning: &Tuning) {
        self.actor.reset();
        self.spawner.reset(tuning);
        self.power_ups.reset();
        self.difficulty.reset(tuning);
        self.chaser.reset();
        self.score = 0;
        self.distance = 0.0;
        self.coins_collected = 0;
        self.run_time = 0.0;
        self.time_steps = 0;
        self.game_over = None;
        self.death_reported = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::ActorState;

    #[test]
    fn test_reset_twice_matches_once() {
        let tuning = Tuning::default();
        let mut world = World::new(3, &tuning);
        world.spawner.spawn_set(&tuning);
        world.score = 120;
        world.distance = 2500.0;
        world.difficulty.update(2500.0, &tuning);
        world.actor.die();

        world.reset(&tuning);
        let once = (
            world.spawner.live_count(),
            world.score,
            world.distance,
            world.difficulty.clone(),
            world.actor.state(),
            world.actor.position(),
        );
        world.reset(&tuning);
        let twice = (
            world.spawner.live_count(),
            world.score,
            world.distance,
            world.difficulty.clone(),
            world.actor.state(),
            world.actor.position(),
        );
        assert_eq!(once, twice);
        assert_eq!(once.0, 0);
        assert_eq!(once.4, ActorState::Running);
        assert_eq!(world.difficulty_level(), 1);
        assert_eq!(world.game_speed(), tuning.start_speed);
    }
}
