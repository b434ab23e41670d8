//! Read-only views of a session for the presentation layer
//!
//! A [`Snapshot`] is a detached copy; holding one never borrows the session.
//! [`EntityInstance`] is the flat per-entity record a renderer uploads as an
//! instance buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::Serialize;

use crate::events::GameOverReason;
use crate::session::SessionPhase;
use crate::sim::{ActorState, Clip, Entity, EntityKind, ObstacleKind, PowerUpKind, World};

/// Actor as seen from outside
#[derive(Debug, Clone, Serialize)]
pub struct ActorView {
    pub lane: u8,
    pub position: Vec3,
    pub bbox_min: Vec3,
    pub bbox_max: Vec3,
    pub state: ActorState,
    pub clip: Clip,
    pub clip_time: f32,
}

/// One live entity
#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    pub position: Vec3,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            position: entity.position(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PowerUpView {
    pub kind: PowerUpKind,
    pub active: bool,
    pub remaining: f32,
}

/// Final stats of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub reason: GameOverReason,
    pub score: u64,
    pub coins: u32,
    pub distance: f32,
    /// Seconds of running before the run ended
    pub run_time: f32,
    pub level: u32,
}

impl RunSummary {
    pub fn from_world(world: &World) -> Option<Self> {
        world.game_over.map(|reason| Self {
            reason,
            score: world.score,
            coins: world.coins_collected,
            distance: world.distance,
            run_time: world.run_time,
            level: world.difficulty_level(),
        })
    }
}

/// Everything a renderer or HUD needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub score: u64,
    pub distance: f32,
    pub difficulty_level: u32,
    pub game_speed: f32,
    pub power_ups: Vec<PowerUpView>,
    pub actor: ActorView,
    pub chaser: Vec3,
    /// Pursuer reached the actor after game over
    pub chaser_caught: bool,
    pub obstacles: Vec<EntityView>,
    pub coins: Vec<EntityView>,
    pub pickups: Vec<EntityView>,
    /// Present once the run has ended
    pub summary: Option<RunSummary>,
}

impl Snapshot {
    pub fn capture(phase: SessionPhase, world: &World) -> Self {
        let actor = &world.actor;
        let live = |list: &[Entity]| -> Vec<EntityView> {
            list.iter().filter(|e| e.alive).map(EntityView::from).collect()
        };
        Self {
            phase,
            score: world.score,
            distance: world.distance,
            difficulty_level: world.difficulty_level(),
            game_speed: world.game_speed(),
            power_ups: world
                .power_ups
                .iter()
                .map(|(kind, timer)| PowerUpView {
                    kind,
                    active: timer.active,
                    remaining: timer.remaining,
                })
                .collect(),
            actor: ActorView {
                lane: actor.lane().index(),
                position: actor.position(),
                bbox_min: actor.bbox().min,
                bbox_max: actor.bbox().max,
                state: actor.state(),
                clip: actor.clip(),
                clip_time: actor.clip_time(),
            },
            chaser: world.chaser.pos,
            chaser_caught: world.chaser.has_caught(),
            obstacles: live(&world.spawner.obstacles),
            coins: live(&world.spawner.coins),
            pickups: live(&world.spawner.power_ups),
            summary: RunSummary::from_world(world),
        }
    }
}

/// Per-entity GPU instance record
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct EntityInstance {
    pub position: [f32; 3],
    /// 0 obstacle, 1 coin, 2 power-up
    pub category: u32,
    pub size: [f32; 3],
    /// Subtype index within the category
    pub variant: u32,
}

impl EntityInstance {
    pub fn from_entity(entity: &Entity) -> Self {
        let (category, variant) = match entity.kind {
            EntityKind::Obstacle(kind) => (0, obstacle_variant(kind)),
            EntityKind::Coin => (1, 0),
            EntityKind::PowerUp(kind) => (2, kind.index() as u32),
        };
        Self {
            position: entity.position().to_array(),
            category,
            size: entity.kind.size().to_array(),
            variant,
        }
    }

    /// Instance records for every live entity, obstacles first
    pub fn collect(world: &World) -> Vec<Self> {
        world
            .spawner
            .entities()
            .filter(|e| e.alive)
            .map(Self::from_entity)
            .collect()
    }
}

fn obstacle_variant(kind: ObstacleKind) -> u32 {
    match kind {
        ObstacleKind::Barrier => 0,
        ObstacleKind::Wall => 1,
        ObstacleKind::Barrel => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lane;
    use crate::tuning::Tuning;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<EntityInstance>(), 32);
        let tuning = Tuning::default();
        let mut world = World::new(5, &tuning);
        world.spawner.spawn_obstacle(Lane::LEFT, ObstacleKind::Barrel, -20.0, &tuning);
        world.spawner.spawn_power_up(Lane::RIGHT, PowerUpKind::DoubleScore, -30.0, &tuning);

        let instances = EntityInstance::collect(&world);
        assert_eq!(instances.len(), 2);
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 64);
        assert_eq!(instances[0].category, 0);
        assert_eq!(instances[0].variant, 2);
        assert_eq!(instances[0].position[2], -20.0);
        assert_eq!(instances[1].category, 2);
        assert_eq!(instances[1].variant, PowerUpKind::DoubleScore.index() as u32);
    }

    #[test]
    fn test_snapshot_serializes() {
        let tuning = Tuning::default();
        let mut world = World::new(5, &tuning);
        world.spawner.spawn_coin_run(Lane::CENTER, -40.0, &tuning);
        let snapshot = Snapshot::capture(SessionPhase::Running, &world);
        assert_eq!(snapshot.coins.len(), 5);
        assert!(snapshot.summary.is_none());
        assert_eq!(snapshot.actor.lane, 1);
        assert_eq!(snapshot.actor.clip_time, 0.0);
        assert!(!snapshot.chaser_caught);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["phase"], "Running");
        assert_eq!(json["power_ups"].as_array().map(|a| a.len()), Some(2));
    }
}
