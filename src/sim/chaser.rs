//! The pursuer running behind the actor
//!
//! Purely cosmetic: it shadows the actor's lane while the run is live and
//! closes in once the run is over. No collision involvement.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ease_toward;

/// Starting depth behind the actor
pub const CHASER_START_Z: f32 = 11.0;
/// Depth at which the catch animation stops
pub const CHASER_CATCH_Z: f32 = 1.0;
/// Lateral follow rate (1/s)
pub const CHASER_FOLLOW_RATE: f32 = 2.0;
/// Approach speed after game over (units/s)
pub const CHASER_CATCH_SPEED: f32 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chaser {
    pub pos: Vec3,
}

impl Default for Chaser {
    fn default() -> Self {
        Self {
            pos: Vec3::new(0.0, 0.0, CHASER_START_Z),
        }
    }
}

impl Chaser {
    /// Follow the actor's lateral position
    pub fn follow(&mut self, actor_x: f32, dt: f32) {
        self.pos.x = ease_toward(self.pos.x, actor_x, CHASER_FOLLOW_RATE, dt);
    }

    /// Close in on the actor after the run ended
    pub fn catch_up(&mut self, dt: f32) {
        if self.pos.z > CHASER_CATCH_Z {
            self.pos.z = (self.pos.z - CHASER_CATCH_SPEED * dt).max(CHASER_CATCH_Z);
        }
    }

    /// Caught up with the actor
    pub fn has_caught(&self) -> bool {
        self.pos.z <= CHASER_CATCH_Z
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
