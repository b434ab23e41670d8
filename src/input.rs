//! Input mapping
//!
//! Discrete commands come from keys or controller buttons. Continuous lane
//! intent (gaze or pointer hovering over a lane) goes through
//! [`LaneIntentDebouncer`] so a brief glance never moves the actor.

use serde::{Deserialize, Serialize};

use crate::Lane;

/// Discrete player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    Jump,
    RollOrCrouch,
    StrafeLeft,
    StrafeRight,
}

impl InputKind {
    /// Map a DOM-style key name (`"w"`, `"ArrowUp"`, `" "`) to a command
    pub fn from_key_name(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" | "arrowup" | "up" | " " | "space" => Some(InputKind::Jump),
            "s" | "arrowdown" | "down" => Some(InputKind::RollOrCrouch),
            "a" | "arrowleft" | "left" => Some(InputKind::StrafeLeft),
            "d" | "arrowright" | "right" => Some(InputKind::StrafeRight),
            _ => None,
        }
    }

    /// Select button on a tracked controller: first jumps, second rolls
    pub fn from_controller(index: usize) -> Option<Self> {
        match index {
            0 => Some(InputKind::Jump),
            1 => Some(InputKind::RollOrCrouch),
            _ => None,
        }
    }
}

/// Accumulates how long a candidate lane has been requested
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneIntentDebouncer {
    candidate: Option<Lane>,
    held: f32,
}

impl LaneIntentDebouncer {
    /// Lane currently being held, if any
    pub fn candidate(&self) -> Option<Lane> {
        self.candidate
    }

    /// Seconds the current candidate has been held
    pub fn held(&self) -> f32 {
        self.held
    }

    /// Feed one observation of `target` sustained for `secs`.
    ///
    /// Returns the lane to commit once the same candidate (different from
    /// `current`) has been held for at least `threshold` seconds in total,
    /// and keeps returning it until the caller resets after a successful
    /// move. Looking back at `current` clears the accumulator.
    pub fn signal(
        &mut self,
        target: Lane,
        secs: f32,
        current: Lane,
        threshold: f32,
    ) -> Option<Lane> {
        if target == current {
            self.reset();
            return None;
        }
        if self.candidate != Some(target) {
            self.candidate = Some(target);
            self.held = 0.0;
        }
        if secs.is_finite() && secs > 0.0 {
            self.held += secs;
        }
        (self.held >= threshold).then_some(target)
    }

    pub fn reset(&mut self) {
        self.candidate = None;
        self.held = 0.0;
    }
}
