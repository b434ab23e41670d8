//! Spawning, movement and recycling of world entities
//!
//! The manager owns every live obstacle, coin and power-up. Entities appear
//! at spawn-Z, drift toward the camera at track speed and are removed once
//! they pass despawn-Z or are collected.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityKind, ObstacleKind, PowerUpKind};
use super::powerup::PowerUps;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{Lane, lane_x};

/// Owns the live entity collections and the spawn cadence
#[derive(Debug, Clone)]
pub struct SpawnManager {
    pub obstacles: Vec<Entity>,
    pub coins: Vec<Entity>,
    pub power_ups: Vec<Entity>,
    spawn_timer: f32,
    base_spawn_rate: f32,
    difficulty_level: u32,
    rng: Pcg32,
    next_id: u32,
}

impl SpawnManager {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            obstacles: Vec::new(),
            coins: Vec::new(),
            power_ups: Vec::new(),
            spawn_timer: tuning.initial_spawn_timer,
            base_spawn_rate: tuning.base_spawn_rate,
            difficulty_level: 1,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    #[inline]
    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    #[inline]
    pub fn base_spawn_rate(&self) -> f32 {
        self.base_spawn_rate
    }

    #[inline]
    pub fn difficulty_level(&self) -> u32 {
        self.difficulty_level
    }

    /// Set by the difficulty controller on level-up
    pub fn set_base_spawn_rate(&mut self, rate: f32) {
        self.base_spawn_rate = rate;
    }

    /// Every live entity, obstacles first
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.obstacles.iter().chain(&self.coins).chain(&self.power_ups)
    }

    pub fn live_count(&self) -> usize {
        self.obstacles.len() + self.coins.len() + self.power_ups.len()
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Advance spawning and movement by `dt`
    pub fn update(
        &mut self,
        dt: f32,
        speed: f32,
        distance: f32,
        actor_position: Vec3,
        power_ups: &PowerUps,
        tuning: &Tuning,
    ) {
        let level = super::difficulty::level_for_distance(distance, tuning.difficulty_interval);
        self.difficulty_level = self.difficulty_level.max(level);

        self.spawn_timer -= dt;
        if self.spawn_timer <= 0.0 {
            self.spawn_set(tuning);
            self.spawn_timer = self.next_spawn_interval(tuning);
        }

        let drift = Vec3::new(0.0, 0.0, speed * dt);
        for obstacle in &mut self.obstacles {
            obstacle.translate(drift);
        }
        for power_up in &mut self.power_ups {
            power_up.translate(drift);
        }

        let magnet = power_ups.is_active(PowerUpKind::Magnet);
        for coin in &mut self.coins {
            let mut delta = drift;
            if magnet {
                let pos = coin.position() + drift;
                let to_actor = Vec3::new(actor_position.x - pos.x, 0.0, actor_position.z - pos.z);
                if to_actor.length() < tuning.magnet_radius {
                    delta += to_actor * (dt * tuning.magnet_pull).min(1.0);
                }
            }
            coin.translate(delta);
        }

        let despawn_z = tuning.despawn_z;
        let before = self.live_count();
        for list in [&mut self.obstacles, &mut self.coins, &mut self.power_ups] {
            list.retain_mut(|entity| {
                if entity.position().z > despawn_z {
                    entity.alive = false;
                }
                entity.alive
            });
        }
        let recycled = before - self.live_count();
        if recycled > 0 {
            log::trace!("Recycled {} entities past despawn-Z", recycled);
        }
    }

    /// Seconds until the next spawn event at the current difficulty
    pub fn next_spawn_interval(&mut self, tuning: &Tuning) -> f32 {
        let jitter = self.rng.random::<f32>() * tuning.spawn_jitter;
        self.base_spawn_rate / (self.difficulty_level as f32 * 0.7) + jitter
    }

    /// One spawn event: an obstacle, maybe a power-up or second obstacle,
    /// and a coin run, with the extras never sharing the obstacle's lane
    pub fn spawn_set(&mut self, tuning: &Tuning) {
        let lane = self.random_lane();
        let kind = self.random_obstacle_kind();
        self.spawn_obstacle(lane, kind, tuning.spawn_z, tuning);

        if self.rng.random::<f32>() < tuning.powerup_spawn_chance {
            let power_up_lane = self.other_lane(lane);
            let power_up = if self.rng.random::<f32>() > 0.5 {
                PowerUpKind::Magnet
            } else {
                PowerUpKind::DoubleScore
            };
            self.spawn_power_up(power_up_lane, power_up, tuning.spawn_z, tuning);
        } else if self.difficulty_level >= DOUBLE_OBSTACLE_LEVEL && self.rng.random::<f32>() > 0.6 {
            let second_lane = self.other_lane(lane);
            let second_kind = self.random_obstacle_kind();
            self.spawn_obstacle(second_lane, second_kind, tuning.spawn_z, tuning);
        }

        let coin_lane = self.other_lane(lane);
        self.spawn_coin_run(coin_lane, tuning.spawn_z, tuning);
        log::debug!(
            "Spawn set: {} in lane {}, coins in lane {} (level {})",
            kind.as_str(),
            lane.index(),
            coin_lane.index(),
            self.difficulty_level
        );
    }

    pub fn spawn_obstacle(
        &mut self,
        lane: Lane,
        kind: ObstacleKind,
        z: f32,
        tuning: &Tuning,
    ) -> u32 {
        let id = self.next_entity_id();
        let pos = Vec3::new(lane.x(tuning.lane_width), 0.0, z);
        self.obstacles.push(Entity::new(id, EntityKind::Obstacle(kind), pos));
        id
    }

    /// A straight run of coins receding from `front_z`
    pub fn spawn_coin_run(&mut self, lane: Lane, front_z: f32, tuning: &Tuning) {
        for i in 0..COIN_RUN_LENGTH {
            let id = self.next_entity_id();
            let pos = Vec3::new(
                lane_x(lane.index(), tuning.lane_width),
                COIN_HEIGHT,
                front_z - i as f32 * COIN_SPACING,
            );
            self.coins.push(Entity::new(id, EntityKind::Coin, pos));
        }
    }

    pub fn spawn_power_up(
        &mut self,
        lane: Lane,
        kind: PowerUpKind,
        z: f32,
        tuning: &Tuning,
    ) -> u32 {
        let id = self.next_entity_id();
        let pos = Vec3::new(lane.x(tuning.lane_width), POWERUP_HEIGHT, z);
        self.power_ups.push(Entity::new(id, EntityKind::PowerUp(kind), pos));
        log::info!("Power-up {} spawned in lane {}", kind.as_str(), lane.index());
        id
    }

    /// Remove a collected coin by id
    pub fn collect_coin(&mut self, id: u32) -> bool {
        take_by_id(&mut self.coins, id).is_some()
    }

    /// Remove a collected power-up by id, returning its kind
    pub fn collect_power_up(&mut self, id: u32) -> Option<PowerUpKind> {
        match take_by_id(&mut self.power_ups, id)?.kind {
            EntityKind::PowerUp(kind) => Some(kind),
            other => {
                log::warn!("Entity {} in power-up list has kind {:?}", id, other);
                None
            }
        }
    }

    /// Drop every entity and restore the initial cadence
    pub fn reset(&mut self, tuning: &Tuning) {
        let removed = self.live_count();
        for entity in self
            .obstacles
            .iter_mut()
            .chain(&mut self.coins)
            .chain(&mut self.power_ups)
        {
            entity.alive = false;
        }
        self.obstacles.clear();
        self.coins.clear();
        self.power_ups.clear();
        self.spawn_timer = tuning.initial_spawn_timer;
        self.base_spawn_rate = tuning.base_spawn_rate;
        self.difficulty_level = 1;
        if removed > 0 {
            log::info!("Spawn manager reset ({} entities removed)", removed);
        }
    }

    fn random_lane(&mut self) -> Lane {
        Lane::new(self.rng.random_range(0..LANE_COUNT)).unwrap_or_default()
    }

    fn other_lane(&mut self, lane: Lane) -> Lane {
        lane.other(self.rng.random_range(0..2u8))
    }

    fn random_obstacle_kind(&mut self) -> ObstacleKind {
        let roll = self.rng.random::<f32>();
        if roll < 0.33 {
            ObstacleKind::Barrier
        } else if roll < 0.66 {
            ObstacleKind::Wall
        } else {
            ObstacleKind::Barrel
        }
    }
}

fn take_by_id(list: &mut Vec<Entity>, id: u32) -> Option<Entity> {
    let index = list.iter().position(|e| e.id == id)?;
    let mut entity = list.remove(index);
    entity.alive = false;
    Some(entity)
}
