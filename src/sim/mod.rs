//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied step durations only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod actor;
pub mod anim;
pub mod chaser;
pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod powerup;
pub mod spawn;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use actor::{Actor, ActorState};
pub use anim::{Animator, Clip, Transition};
pub use chaser::Chaser;
pub use collision::{CollisionOutcome, LethalHit, check_collisions};
pub use difficulty::Difficulty;
pub use entity::{Entity, EntityKind, ObstacleKind, PowerUpKind};
pub use powerup::{PowerUpTimer, PowerUps};
pub use spawn::SpawnManager;
pub use state::World;
pub use tick::step;
