//! Actor-versus-world collision tests and their outcomes
//!
//! Runs after the actor and every entity have moved and rebuilt their boxes.
//! Obstacles are tested first and any hit ends the scan, so a pickup touched
//! in the same step can never hide a game over.

use super::actor::Actor;
use super::entity::{EntityKind, ObstacleKind, PowerUpKind};
use super::powerup::PowerUps;
use super::spawn::SpawnManager;
use crate::tuning::Tuning;

/// Obstacle that ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LethalHit {
    pub entity_id: u32,
    pub kind: ObstacleKind,
}

/// Everything that happened in one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    pub lethal: Option<LethalHit>,
    /// Ids of coins collected (already removed from the world)
    pub coins: Vec<u32>,
    /// Points earned from those coins
    pub points: u64,
    /// Power-up collected and activated this pass
    pub power_up: Option<PowerUpKind>,
}

impl CollisionOutcome {
    pub fn is_lethal(&self) -> bool {
        self.lethal.is_some()
    }
}

/// Points for one coin given the active power-ups
#[inline]
pub fn coin_points(power_ups: &PowerUps, tuning: &Tuning) -> u64 {
    if power_ups.is_active(PowerUpKind::DoubleScore) {
        tuning.coin_value * 2
    } else {
        tuning.coin_value
    }
}

/// Test the actor against every live entity, in priority order:
/// obstacles (first hit is lethal), then all coins, then the first power-up
pub fn check_collisions(
    actor: &Actor,
    world: &mut SpawnManager,
    power_ups: &mut PowerUps,
    tuning: &Tuning,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    if actor.is_dead() {
        return outcome;
    }
    let actor_box = actor.bbox();

    if let Some(obstacle) = world
        .obstacles
        .iter()
        .find(|o| o.alive && o.bbox().intersects(actor_box))
    {
        if let EntityKind::Obstacle(kind) = obstacle.kind {
            log::info!(
                "Obstacle collision: {} #{} at z={:.2}",
                kind.as_str(),
                obstacle.id,
                obstacle.position().z
            );
            outcome.lethal = Some(LethalHit {
                entity_id: obstacle.id,
                kind,
            });
            return outcome;
        }
    }

    let points = coin_points(power_ups, tuning);
    let hit_coins: Vec<u32> = world
        .coins
        .iter()
        .filter(|c| c.alive && c.bbox().intersects(actor_box))
        .map(|c| c.id)
        .collect();
    for id in hit_coins {
        if world.collect_coin(id) {
            outcome.coins.push(id);
            outcome.points += points;
        }
    }

    let hit_power_up = world
        .power_ups
        .iter()
        .find(|p| p.alive && p.bbox().intersects(actor_box))
        .map(|p| p.id);
    if let Some(id) = hit_power_up {
        match world.collect_power_up(id) {
            Some(kind) => {
                power_ups.activate(kind, tuning.powerup_duration);
                outcome.power_up = Some(kind);
            }
            None => log::warn!("Power-up #{} vanished before activation", id),
        }
    }

    outcome
}
