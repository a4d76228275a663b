//! Solid Obstacles
//!
//! Static or kinematically moved rectangles that actors collide against.
//! Moving a solid lives in `game::push`.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::rect::Rect;
use crate::core::vec2::Vec2;

/// Index of a solid in `World::solids`.
///
/// Only stable within a tick: adding solids never moves existing ones,
/// but callers must not hold references across an append.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SolidId(pub usize);

/// An obstacle occupying a rectangle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    /// Collision volume (also drawn as-is)
    pub bounds: Rect,

    /// Banked sub-pixel motion per axis
    pub remainder: Vec2,

    /// False only while this solid is carrying or pushing actors
    pub collidable: bool,
}

impl Solid {
    /// Create a collidable solid at rest.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            remainder: Vec2::ZERO,
            collidable: true,
        }
    }

    /// Create a solid from integer level coordinates.
    pub fn from_ints(x: i32, y: i32, width: i32, height: i32, collidable: bool) -> Self {
        Self {
            bounds: Rect::new(x as f32, y as f32, width as f32, height as f32),
            remainder: Vec2::ZERO,
            collidable,
        }
    }

    /// Hash this solid's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_rect(&self.bounds);
        hasher.update_vec2(self.remainder);
        hasher.update_bool(self.collidable);
    }
}
