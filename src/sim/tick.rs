//! Simulation step
//!
//! One step runs the pipeline in a fixed order that collision correctness
//! depends on:
//! 1. actor kinematics (actor box rebuilt)
//! 2. spawn/move/recycle entities (entity boxes rebuilt), accrue distance
//! 3. collisions and scoring
//! 4. power-up timers and difficulty

use super::collision::check_collisions;
use super::state::World;
use crate::events::{GameEvent, GameOverReason};
use crate::tuning::Tuning;

/// Advance a live run by one step of `dt` seconds
pub fn step(world: &mut World, dt: f32, tuning: &Tuning) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if world.game_over.is_some() {
        step_game_over(world, dt, tuning, &mut events);
        return events;
    }

    world.time_steps += 1;
    world.run_time += dt;

    // 1. Actor
    world.actor.update(dt, tuning);
    world.chaser.follow(world.actor.position().x, dt);

    // 2. World
    let speed = world.game_speed();
    world.spawner.update(
        dt,
        speed,
        world.distance,
        world.actor.position(),
        &world.power_ups,
        tuning,
    );
    world.distance += speed * dt;

    // 3. Collisions
    let outcome = check_collisions(&world.actor, &mut world.spawner, &mut world.power_ups, tuning);
    if let Some(hit) = outcome.lethal {
        let reason = GameOverReason::ObstacleCollision { kind: hit.kind };
        world.actor.die();
        world.game_over = Some(reason);
        log::info!(
            "GAME OVER ({}) - distance {:.0}, score {}",
            reason,
            world.distance,
            world.score
        );
        events.push(GameEvent::GameOver { reason });
        return events;
    }

    if !outcome.coins.is_empty() {
        let per_coin = outcome.points / outcome.coins.len() as u64;
        for _ in &outcome.coins {
            events.push(GameEvent::CoinCollected { points: per_coin });
        }
        world.coins_collected += outcome.coins.len() as u32;
        world.score += outcome.points;
        events.push(GameEvent::ScoreChanged { score: world.score });
    }
    if let Some(kind) = outcome.power_up {
        events.push(GameEvent::PowerUpActivated { kind });
    }

    // 4. Power-ups and difficulty
    for kind in world.power_ups.update(dt) {
        events.push(GameEvent::PowerUpDeactivated { kind });
    }
    if let Some(level) = world.difficulty.update(world.distance, tuning) {
        world.spawner.set_base_spawn_rate(world.difficulty.base_spawn_rate);
        events.push(GameEvent::DifficultyChanged {
            level,
            speed: world.difficulty.game_speed,
        });
    }

    events
}

/// After a lethal hit only the death clip and the chaser keep moving
fn step_game_over(world: &mut World, dt: f32, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    world.actor.update(dt, tuning);
    world.chaser.catch_up(dt);
    if !world.death_reported && world.actor.death_sequence_finished() {
        world.death_reported = true;
        log::info!("Death sequence finished");
        events.push(GameEvent::DeathSequenceFinished);
    }
}
