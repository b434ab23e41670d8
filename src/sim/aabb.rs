//! Axis-aligned bounding boxes
//!
//! World axes: X is lateral (lanes), Y is up, Z points toward the camera.
//! Entities travel in +Z; the actor stays near z = 0.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const ZERO: Aabb = Aabb {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box of `size` whose bottom face is centred on `base`
    pub fn from_base(base: Vec3, size: Vec3) -> Self {
        let half = Vec3::new(size.x * 0.5, 0.0, size.z * 0.5);
        Self {
            min: base - half,
            max: base + half + Vec3::new(0.0, size.y, 0.0),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Grow every face outward by `amount`
    pub fn expanded(&self, amount: f32) -> Self {
        let pad = Vec3::splat(amount);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Overlap test; touching faces count as a hit
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}
