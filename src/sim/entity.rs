//! World entities: obstacles, coins and power-ups
//!
//! An entity's bounding box is derived from its position and kind. The
//! position is private and only changes through [`Entity::set_position`] /
//! [`Entity::translate`], which recompute the box, so a collision test can
//! never read a box from a previous position.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;

/// Obstacle variants, each with its own silhouette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Overhead bar - roll under it
    Barrier,
    /// Full-height block - change lane
    Wall,
    /// Low drum - jump over it
    Barrel,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] =
        [ObstacleKind::Barrier, ObstacleKind::Wall, ObstacleKind::Barrel];

    /// (width, height, depth) of the hit box
    pub fn size(self) -> Vec3 {
        match self {
            ObstacleKind::Barrier => Vec3::new(3.0, 1.0, 0.5),
            ObstacleKind::Wall => Vec3::new(2.5, 3.0, 4.0),
            ObstacleKind::Barrel => Vec3::new(1.2, 1.0, 1.2),
        }
    }

    /// Height of the hit box bottom above the entity origin
    pub fn clearance(self) -> f32 {
        match self {
            ObstacleKind::Barrier => 1.6,
            ObstacleKind::Wall | ObstacleKind::Barrel => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObstacleKind::Barrier => "barrier",
            ObstacleKind::Wall => "wall",
            ObstacleKind::Barrel => "barrel",
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Pulls nearby coins toward the actor
    Magnet,
    /// Coins are worth double
    DoubleScore,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::Magnet, PowerUpKind::DoubleScore];

    /// Index into per-kind arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PowerUpKind::Magnet => 0,
            PowerUpKind::DoubleScore => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PowerUpKind::Magnet => "magnet",
            PowerUpKind::DoubleScore => "double",
        }
    }
}

/// Category tag with its subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle(ObstacleKind),
    Coin,
    PowerUp(PowerUpKind),
}

impl EntityKind {
    pub fn size(self) -> Vec3 {
        match self {
            EntityKind::Obstacle(kind) => kind.size(),
            EntityKind::Coin => Vec3::new(0.8, 0.8, 0.2),
            EntityKind::PowerUp(_) => Vec3::ONE,
        }
    }

    /// Offset from the entity origin to the bottom of its box
    fn box_offset(self) -> Vec3 {
        match self {
            EntityKind::Obstacle(kind) => Vec3::new(0.0, kind.clearance(), 0.0),
            // Pickups float; their origin is the visual center
            EntityKind::Coin | EntityKind::PowerUp(_) => Vec3::new(0.0, -self.size().y * 0.5, 0.0),
        }
    }

    pub fn is_lethal(self) -> bool {
        matches!(self, EntityKind::Obstacle(_))
    }
}

/// A positioned, box-tracked world object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Cleared when the entity is collected or recycled
    pub alive: bool,
    pos: Vec3,
    bbox: Aabb,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec3) -> Self {
        let mut entity = Self {
            id,
            kind,
            alive: true,
            pos,
            bbox: Aabb::ZERO,
        };
        entity.refresh_bbox();
        entity
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.pos
    }

    #[inline]
    pub fn bbox(&self) -> &Aabb {
        &self.bbox
    }

    pub fn set_position(&mut self, pos: Vec3) {
        self.pos = pos;
        self.refresh_bbox();
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.pos + delta);
    }

    fn refresh_bbox(&mut self) {
        self.bbox = Aabb::from_base(self.pos + self.kind.box_offset(), self.kind.size());
    }
}
