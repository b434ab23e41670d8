//! Actor animation phases
//!
//! Clip completion is derived from elapsed time against the clip length, and
//! clip switches go through a short blend lock with a depth-1 queue. Nothing
//! here feeds back into gameplay state; the actor only reads `finished()` to
//! pick its next clip.

use serde::{Deserialize, Serialize};

/// Blend time during which further clip requests are queued
pub const BLEND_DURATION: f32 = 0.1;

/// Animation clips the presentation layer is expected to provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clip {
    Run,
    Jump,
    Roll,
    StrafeLeft,
    StrafeRight,
    Die,
}

impl Clip {
    /// Nominal clip length in seconds
    pub fn length(self) -> f32 {
        match self {
            Clip::Run => 0.8,
            Clip::Jump => 0.7,
            Clip::Roll => 0.7,
            Clip::StrafeLeft | Clip::StrafeRight => 0.4,
            Clip::Die => 1.5,
        }
    }

    pub fn looping(self) -> bool {
        self == Clip::Run
    }
}

/// Blend lock state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Transition {
    Idle,
    Transitioning {
        /// Seconds until the lock releases
        remaining: f32,
        /// Latest clip requested while locked
        queued: Option<Clip>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animator {
    clip: Clip,
    elapsed: f32,
    transition: Transition,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            clip: Clip::Run,
            elapsed: 0.0,
            transition: Transition::Idle,
        }
    }
}

impl Animator {
    #[inline]
    pub fn clip(&self) -> Clip {
        self.clip
    }

    /// Seconds since the current clip started
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn transition(&self) -> Transition {
        self.transition
    }

    /// One-shot clip has played to its end (looping clips never finish)
    pub fn finished(&self) -> bool {
        !self.clip.looping() && self.elapsed >= self.clip.length()
    }

    /// Request a clip; queued if a blend is in progress
    pub fn play(&mut self, clip: Clip) {
        match &mut self.transition {
            // Asking for the clip already blending in cancels the queue
            Transition::Transitioning { queued, .. } => {
                *queued = (clip != self.clip).then_some(clip)
            }
            Transition::Idle if clip != self.clip => self.start(clip),
            Transition::Idle => {}
        }
    }

    fn start(&mut self, clip: Clip) {
        self.clip = clip;
        self.elapsed = 0.0;
        self.transition = Transition::Transitioning {
            remaining: BLEND_DURATION,
            queued: None,
        };
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        if let Transition::Transitioning { remaining, queued } = &mut self.transition {
            *remaining -= dt;
            if *remaining <= 0.0 {
                let next = queued.take();
                self.transition = Transition::Idle;
                if let Some(next) = next {
                    self.play(next);
                }
            }
        }
    }
}
