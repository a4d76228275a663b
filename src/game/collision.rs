//! Collision Detection
//!
//! Broad-phase queries over the world's solids. Deterministic: solids are
//! scanned in insertion order (movable solids, then static tiles) and the
//! first overlap wins.

use crate::core::rect::Rect;
use crate::game::actor::Actor;
use crate::game::solid::{Solid, SolidId};

/// Strict AABB overlap. Touching edges do not collide.
#[inline]
pub fn collides(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// Where a blocking rectangle came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blocker {
    /// A movable solid in `World::solids`
    Solid(SolidId),
    /// A static tile-derived solid in `World::tiles`
    Tile(usize),
}

/// Result of a blocking query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blocking {
    /// Which solid blocked
    pub source: Blocker,
    /// Its bounds at query time
    pub bounds: Rect,
}

/// Read-only view over everything an actor can collide with.
///
/// Borrowing the solid collections separately from the actor collection is
/// what lets the engines mutate one actor while querying the level.
#[derive(Clone, Copy, Debug)]
pub struct Geometry<'a> {
    /// Movable solids
    pub solids: &'a [Solid],
    /// Static level geometry
    pub tiles: &'a [Solid],
}

impl<'a> Geometry<'a> {
    /// Create a view.
    pub fn new(solids: &'a [Solid], tiles: &'a [Solid]) -> Self {
        Self { solids, tiles }
    }

    /// First collidable solid overlapping `rect`, if any.
    pub fn find_blocking_solid(&self, rect: &Rect) -> Option<Blocking> {
        for (index, solid) in self.solids.iter().enumerate() {
            if solid.collidable && collides(&solid.bounds, rect) {
                return Some(Blocking {
                    source: Blocker::Solid(SolidId(index)),
                    bounds: solid.bounds,
                });
            }
        }

        for (index, tile) in self.tiles.iter().enumerate() {
            if tile.collidable && collides(&tile.bounds, rect) {
                return Some(Blocking {
                    source: Blocker::Tile(index),
                    bounds: tile.bounds,
                });
            }
        }

        None
    }

    /// Does anything collidable overlap `rect`?
    #[inline]
    pub fn is_blocked(&self, rect: &Rect) -> bool {
        self.find_blocking_solid(rect).is_some()
    }
}

/// Is `actor` standing on `solid`?
///
/// Grounded, hitbox bottom flush with the solid's top, and horizontally
/// overlapping it.
pub fn is_riding(actor: &Actor, solid: &Solid) -> bool {
    actor.grounded
        && actor.hitbox.bottom() == solid.bounds.top()
        && actor.hitbox.overlaps_x(&solid.bounds)
}

// =============================================================================
// TESTS
// =============================================================================
