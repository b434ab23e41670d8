//! The player actor: lane and height state machine
//!
//! Independent of rendering. The bounding box is rebuilt at the end of every
//! mutation so collision checks always see the current silhouette.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::anim::{Animator, Clip};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{Lane, ease_toward};

/// Actor movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorState {
    Running,
    Jumping,
    Rolling,
    /// Terminal until reset
    Dead,
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    lane: Lane,
    /// Eased lateral position
    x: f32,
    /// Height of the feet above ground
    y: f32,
    vertical_velocity: f32,
    roll_remaining: f32,
    state: ActorState,
    bbox: Aabb,
    animator: Animator,
}

impl Default for Actor {
    fn default() -> Self {
        let mut actor = Self {
            lane: Lane::CENTER,
            x: 0.0,
            y: 0.0,
            vertical_velocity: 0.0,
            roll_remaining: 0.0,
            state: ActorState::Running,
            bbox: Aabb::ZERO,
            animator: Animator::default(),
        };
        actor.refresh_bbox();
        actor
    }
}

impl Actor {
    #[inline]
    pub fn state(&self) -> ActorState {
        self.state
    }

    #[inline]
    pub fn lane(&self) -> Lane {
        self.lane
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, 0.0)
    }

    #[inline]
    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    #[inline]
    pub fn roll_remaining(&self) -> f32 {
        self.roll_remaining
    }

    #[inline]
    pub fn bbox(&self) -> &Aabb {
        &self.bbox
    }

    #[inline]
    pub fn clip(&self) -> Clip {
        self.animator.clip()
    }

    /// Seconds into the current clip
    #[inline]
    pub fn clip_time(&self) -> f32 {
        self.animator.elapsed()
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == ActorState::Dead
    }

    /// Die clip has played through
    pub fn death_sequence_finished(&self) -> bool {
        self.is_dead() && self.animator.clip() == Clip::Die && self.animator.finished()
    }

    /// Back to center lane, on the ground, running
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Running → Jumping. Returns false if the transition is not allowed.
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        if self.state != ActorState::Running {
            return false;
        }
        self.state = ActorState::Jumping;
        self.vertical_velocity = tuning.jump_strength;
        self.animator.play(Clip::Jump);
        self.refresh_bbox();
        true
    }

    /// Running → Rolling
    pub fn roll(&mut self, tuning: &Tuning) -> bool {
        if self.state != ActorState::Running {
            return false;
        }
        self.state = ActorState::Rolling;
        self.roll_remaining = tuning.roll_duration;
        self.animator.play(Clip::Roll);
        self.refresh_bbox();
        true
    }

    /// Shift one lane left (-1) or right (+1), clamped to the track
    pub fn strafe(&mut self, direction: i8) -> bool {
        let target = self.lane.offset(direction);
        self.set_lane(target)
    }

    /// Retarget the lane directly. Only while running.
    pub fn set_lane(&mut self, target: Lane) -> bool {
        if self.state != ActorState::Running || target == self.lane {
            return false;
        }
        let clip = if target < self.lane {
            Clip::StrafeLeft
        } else {
            Clip::StrafeRight
        };
        self.lane = target;
        self.animator.play(clip);
        true
    }

    /// Any live state → Dead
    pub fn die(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.state = ActorState::Dead;
        self.vertical_velocity = 0.0;
        self.roll_remaining = 0.0;
        self.animator.play(Clip::Die);
        self.refresh_bbox();
        true
    }

    /// Advance kinematics and animation by `dt`
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        self.animator.update(dt);

        if self.is_dead() {
            return;
        }

        let target_x = self.lane.x(tuning.lane_width);
        self.x = ease_toward(self.x, target_x, tuning.lane_ease, dt);

        match self.state {
            ActorState::Jumping => {
                self.vertical_velocity += tuning.gravity * dt;
                self.y += self.vertical_velocity * dt;
                if self.y <= 0.0 {
                    self.y = 0.0;
                    self.vertical_velocity = 0.0;
                    self.state = ActorState::Running;
                }
            }
            ActorState::Rolling => {
                self.roll_remaining -= dt;
                if self.roll_remaining <= 0.0 {
                    self.roll_remaining = 0.0;
                    self.state = ActorState::Running;
                }
            }
            ActorState::Running | ActorState::Dead => {}
        }

        // Jumping holds its clip until landing
        if self.state == ActorState::Running && self.animator.finished() {
            self.animator.play(Clip::Run);
        }

        self.refresh_bbox();
    }

    fn refresh_bbox(&mut self) {
        let height = if self.state == ActorState::Rolling {
            ACTOR_ROLL_HEIGHT
        } else {
            ACTOR_HEIGHT
        };
        let mut bbox = Aabb::from_base(
            self.position(),
            Vec3::new(ACTOR_WIDTH, height, ACTOR_DEPTH),
        );
        if self.state == ActorState::Jumping {
            bbox = bbox.expanded(JUMP_BOX_PADDING);
        }
        self.bbox = bbox.expanded(ACTOR_BOX_PADDING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_jump_arc_returns_to_ground() {
        let tuning = Tuning::default();
        let mut actor = Actor::default();
        assert!(actor.jump(&tuning));
        assert_eq!(actor.state(), ActorState::Jumping);
        assert!(!actor.jump(&tuning), "no double jump");

        let mut peak: f32 = 0.0;
        for _ in 0..120 {
            actor.update(DT, &tuning);
            peak = peak.max(actor.position().y);
            if actor.state() == ActorState::Running {
                break;
            }
        }
        assert_eq!(actor.state(), ActorState::Running);
        assert_eq!(actor.position().y, 0.0);
        assert_eq!(actor.vertical_velocity(), 0.0);
        assert!(peak > 4.0 && peak < 5.0, "peak was {peak}");
    }

    #[test]
    fn test_roll_counts_down() {
        let tuning = Tuning::default();
        let mut actor = Actor::default();
        let standing = actor.bbox().max.y;
        assert!(actor.roll(&tuning));
        assert!(actor.bbox().max.y < standing, "crouch lowers the box");
        assert!(!actor.jump(&tuning), "cannot jump mid-roll");

        for _ in 0..41 {
            actor.update(DT, &tuning);
        }
        assert_eq!(actor.state(), ActorState::Rolling);
        for _ in 0..3 {
            actor.update(DT, &tuning);
        }
        assert_eq!(actor.state(), ActorState::Running);
        assert_eq!(actor.bbox().max.y, standing);
    }

    #[test]
    fn test_strafe_clamps_and_eases() {
        let tuning = Tuning::default();
        let mut actor = Actor::default();
        assert!(actor.strafe(-1));
        assert!(!actor.strafe(-1), "already at the left edge");
        assert_eq!(actor.lane(), Lane::LEFT);
        assert_eq!(actor.clip(), Clip::StrafeLeft);

        actor.update(DT, &tuning);
        let x = actor.position().x;
        assert!(x < 0.0 && x > -4.0, "eased, not snapped: {x}");

        for _ in 0..120 {
            actor.update(DT, &tuning);
        }
        assert!((actor.position().x + 4.0).abs() < 0.01);
        assert_eq!(actor.clip(), Clip::Run);
    }

    #[test]
    fn test_no_strafe_while_airborne() {
        let tuning = Tuning::default();
        let mut actor = Actor::default();
        actor.jump(&tuning);
        assert!(!actor.strafe(1));
        assert_eq!(actor.lane(), Lane::CENTER);
    }

    #[test]
    fn test_dead_ignores_input() {
        let tuning = Tuning::default();
        let mut actor = Actor::default();
        assert!(actor.die());
        assert!(!actor.die());
        assert!(!actor.jump(&tuning));
        assert!(!actor.roll(&tuning));
        assert!(!actor.strafe(1));

        let before = actor.position();
        actor.update(0.5, &tuning);
        assert_eq!(actor.position(), before);
        assert_eq!(actor.state(), ActorState::Dead);
    }

    #[test]
    fn test_death_sequence_completes() {
        let tuning = Tuning::default();
        let mut actor = Actor::default();
        actor.die();
        actor.update(1.0, &tuning);
        assert!(!actor.death_sequence_finished());
        actor.update(0.6, &tuning);
        assert!(actor.death_sequence_finished());
    }

    #[test]
    fn test_jump_box_is_padded() {
        let tuning = Tuning::default();
        let mut actor = Actor::default();
        let width = actor.bbox().size().x;
        actor.jump(&tuning);
        assert!((actor.bbox().size().x - width - 2.0 * JUMP_BOX_PADDING).abs() < 1e-5);
    }
}
