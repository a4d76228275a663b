//! Moving Platforms
//!
//! A route drives one solid back and forth between two limits along a
//! single axis. Every step goes through `move_solid`, so riders are carried
//! and anything in the way is pushed.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::game::movement::Axis;
use crate::game::push::{move_solid, SolidMove};
use crate::game::solid::SolidId;
use crate::game::world::World;

/// Default patrol speed in pixels per second.
pub const DEFAULT_PLATFORM_SPEED: f32 = 60.0;

/// Ping-pong patrol of a solid.
///
/// The solid's leading edge never passes `min` or `max`: on X the solid
/// stays inside `[min, max]` horizontally, on Y vertically.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformRoute {
    /// Solid being driven
    pub solid: SolidId,
    /// Patrol axis
    pub axis: Axis,
    /// Lower limit (left or top edge)
    pub min: f32,
    /// Upper limit (right or bottom edge)
    pub max: f32,
    /// Speed in pixels per second
    pub speed: f32,
    /// +1 or -1
    pub direction: i8,
}

impl PlatformRoute {
    /// Horizontal patrol starting towards +X.
    pub fn horizontal(solid: SolidId, min: f32, max: f32, speed: f32) -> Self {
        Self {
            solid,
            axis: Axis::X,
            min,
            max,
            speed,
            direction: 1,
        }
    }

    /// Vertical patrol starting towards +Y.
    pub fn vertical(solid: SolidId, min: f32, max: f32, speed: f32) -> Self {
        Self {
            axis: Axis::Y,
            ..Self::horizontal(solid, min, max, speed)
        }
    }

    /// Move the solid one tick along the route.
    pub fn advance(&mut self, world: &mut World, dt: f32) -> SolidMove {
        let Some(solid) = world.solids.get(self.solid.0) else {
            return SolidMove::default();
        };

        let (low, high, banked) = match self.axis {
            Axis::X => (solid.bounds.left(), solid.bounds.right(), solid.remainder.x),
            Axis::Y => (solid.bounds.top(), solid.bounds.bottom(), solid.remainder.y),
        };

        // Turn around at the limits
        if self.direction > 0 && high >= self.max {
            self.direction = -1;
        } else if self.direction < 0 && low <= self.min {
            self.direction = 1;
        }

        let step = self.speed * dt * f32::from(self.direction);
        let amount = if self.direction > 0 {
            step.min(self.max - high - banked)
        } else {
            step.max(self.min - low - banked)
        };

        let (dx, dy) = self.axis.offset(amount);
        move_solid(world, self.solid, dx, dy)
    }

    /// Hash route state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u64(self.solid.0 as u64);
        hasher.update_u8(self.direction as u8);
    }
}

// =============================================================================
// TESTS
// =============================================================================
