//! Timed power-up effects
//!
//! One timer per power-up kind for the whole session. Collecting a kind that
//! is already active restarts its timer instead of stacking.

use serde::{Deserialize, Serialize};

use super::entity::PowerUpKind;

/// Timer for one power-up kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUpTimer {
    pub active: bool,
    /// Seconds left; 0 when inactive
    pub remaining: f32,
}

/// All power-up timers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUps {
    timers: [PowerUpTimer; 2],
}

impl PowerUps {
    #[inline]
    pub fn get(&self, kind: PowerUpKind) -> PowerUpTimer {
        self.timers[kind.index()]
    }

    #[inline]
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.timers[kind.index()].active
    }

    /// (kind, timer) pairs in a stable order
    pub fn iter(&self) -> impl Iterator<Item = (PowerUpKind, PowerUpTimer)> + '_ {
        PowerUpKind::ALL.iter().map(|&kind| (kind, self.get(kind)))
    }

    /// Start or restart `kind` at the full `duration`
    pub fn activate(&mut self, kind: PowerUpKind, duration: f32) {
        let timer = &mut self.timers[kind.index()];
        if timer.active {
            log::info!(
                "Power-up {} refreshed ({:.1}s left before)",
                kind.as_str(),
                timer.remaining
            );
        } else {
            log::info!("Power-up {} active for {:.1}s", kind.as_str(), duration);
        }
        timer.active = true;
        timer.remaining = duration;
    }

    /// Stop `kind`. Returns false if it was not active.
    pub fn deactivate(&mut self, kind: PowerUpKind) -> bool {
        let timer = &mut self.timers[kind.index()];
        if !timer.active {
            return false;
        }
        *timer = PowerUpTimer::default();
        log::info!("Power-up {} expired", kind.as_str());
        true
    }

    /// Count down active timers; returns the kinds that expired this step
    pub fn update(&mut self, dt: f32) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            let timer = &mut self.timers[kind.index()];
            if !timer.active {
                continue;
            }
            timer.remaining -= dt;
            if timer.remaining <= 0.0 && self.deactivate(kind) {
                expired.push(kind);
            }
        }
        expired
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
