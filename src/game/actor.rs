//! Actor State
//!
//! Dynamic entities (the player and NPCs) that move against solids.
//! The movement engine lives in `game::movement`.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::rect::Rect;
use crate::core::vec2::Vec2;
use crate::game::animation::Animation;

/// Index of an actor in `World::actors`.
///
/// Only stable within a tick; resolve it against the world at time of use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub usize);

/// Horizontal facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Facing {
    /// Facing -X
    Left = 0,
    /// Facing +X
    #[default]
    Right = 1,
}

/// A dynamic entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Render bounds
    pub bounds: Rect,

    /// Collision rectangle, inset from `bounds`
    pub hitbox: Rect,

    /// Center of `bounds`, kept in sync on every committed step
    pub center: Vec2,

    /// Banked sub-pixel motion per axis
    pub remainder: Vec2,

    /// Velocity in pixels per second
    pub speed: Vec2,

    /// Current animation
    pub animation: Animation,

    /// Horizontal facing
    pub facing: Facing,

    /// Seconds spent in the current animation
    pub state_time: f32,

    /// Last downward step was halted by a solid directly beneath
    pub grounded: bool,
}

impl Actor {
    /// Player sprite size in pixels
    pub const PLAYER_SIZE: f32 = 32.0;

    /// Player hitbox inset from each side of the sprite
    pub const PLAYER_INSET_SIDE: f32 = 10.0;

    /// Player hitbox inset from the top of the sprite
    pub const PLAYER_INSET_TOP: f32 = 4.0;

    /// Create an actor with an explicit hitbox.
    pub fn new(bounds: Rect, hitbox: Rect) -> Self {
        Self {
            bounds,
            hitbox,
            center: bounds.center(),
            remainder: Vec2::ZERO,
            speed: Vec2::ZERO,
            animation: Animation::EMPTY,
            facing: Facing::Right,
            state_time: 0.0,
            grounded: false,
        }
    }

    /// Create an actor whose hitbox is horizontally centered in `bounds`,
    /// narrowed by `inset_side` on each side and lowered by `inset_top`.
    /// The hitbox bottom matches the bounds bottom.
    pub fn with_inset(bounds: Rect, inset_side: f32, inset_top: f32) -> Self {
        let hit_width = (bounds.width - 2.0 * inset_side).max(0.0);
        let hit_height = (bounds.height - inset_top).max(0.0);
        let center = bounds.center();
        let hitbox = Rect::new(
            center.x - (hit_width / 2.0).floor(),
            bounds.y + inset_top,
            hit_width,
            hit_height,
        );
        Self::new(bounds, hitbox)
    }

    /// Player-sized actor with its sprite's top-left at (x, y).
    pub fn player(x: f32, y: f32) -> Self {
        Self::with_inset(
            Rect::new(x, y, Self::PLAYER_SIZE, Self::PLAYER_SIZE),
            Self::PLAYER_INSET_SIDE,
            Self::PLAYER_INSET_TOP,
        )
    }

    /// Move bounds and hitbox together by whole pixels and refresh `center`.
    #[inline]
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.bounds = self.bounds.translated(dx, dy);
        self.hitbox = self.hitbox.translated(dx, dy);
        self.center = self.bounds.center();
    }

    /// Hash this actor's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_rect(&self.bounds);
        hasher.update_rect(&self.hitbox);
        hasher.update_vec2(self.remainder);
        hasher.update_vec2(self.speed);
        hasher.update_u8(self.animation.id.map_or(u8::MAX, |id| id as u8));
        hasher.update_u8(self.facing as u8);
        hasher.update_f32(self.state_time);
        hasher.update_bool(self.grounded);
    }
}
