//! Actor Movement Engine
//!
//! Moves an actor along one axis at a time:
//!
//! 1. The requested displacement is banked in the actor's remainder.
//! 2. Only whole pixels are taken out (`round_half_away`); the fraction stays
//!    banked for the next call.
//! 3. The pixels are walked one at a time. The first step whose hitbox would
//!    overlap a collidable solid stops the move, notifies the observer once,
//!    and the rest of the pixels are dropped.
//!
//! A move that rounds to zero pixels touches nothing but the remainder.

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::core::math::{round_half_away, sign};
use crate::game::actor::Actor;
use crate::game::collision::{Blocking, Geometry};

/// Movement axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal
    X,
    /// Vertical (+Y is down)
    Y,
}

impl Axis {
    /// (dx, dy) for a displacement of `amount` along this axis.
    #[inline]
    pub fn offset(self, amount: f32) -> (f32, f32) {
        match self {
            Axis::X => (amount, 0.0),
            Axis::Y => (0.0, amount),
        }
    }
}

/// Notified synchronously when a move is stopped by a solid.
///
/// Called at most once per move call, before the call returns.
pub trait CollisionObserver {
    /// The actor's next step was blocked.
    fn on_blocked(&mut self, actor: &mut Actor);
}

impl<F> CollisionObserver for F
where
    F: FnMut(&mut Actor),
{
    fn on_blocked(&mut self, actor: &mut Actor) {
        self(actor)
    }
}

/// Observer used when a solid pushes an actor into something it cannot clear.
#[derive(Debug, Default)]
pub struct Squish {
    /// Set once the pushed actor was blocked
    pub squished: bool,
}

impl CollisionObserver for Squish {
    fn on_blocked(&mut self, actor: &mut Actor) {
        info!("Squished actor at {:?}", actor.hitbox);
        self.squished = true;
    }
}

/// What a move call did.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MoveOutcome {
    /// Whole pixels taken out of the remainder (signed)
    pub requested: i32,
    /// Pixels actually committed (signed)
    pub moved: i32,
    /// The solid that stopped the move, if any
    pub blocked_by: Option<Blocking>,
}

impl MoveOutcome {
    /// Did a solid stop this move?
    #[inline]
    pub fn blocked(&self) -> bool {
        self.blocked_by.is_some()
    }
}

/// Move `actor` by `amount` pixels along `axis`.
///
/// On the Y axis, being stopped by a solid whose top is flush with the
/// hitbox bottom marks the actor `grounded`. This function never clears
/// `grounded`; that is up to the controller.
pub fn move_actor_axis(
    actor: &mut Actor,
    axis: Axis,
    amount: f32,
    geometry: &Geometry<'_>,
    mut observer: Option<&mut dyn CollisionObserver>,
) -> MoveOutcome {
    let remainder = match axis {
        Axis::X => &mut actor.remainder.x,
        Axis::Y => &mut actor.remainder.y,
    };
    *remainder += amount;

    let mut pixels = round_half_away(*remainder);
    if pixels == 0 {
        return MoveOutcome::default();
    }
    let step = sign(*remainder);
    *remainder -= pixels as f32;

    let mut outcome = MoveOutcome {
        requested: pixels,
        ..MoveOutcome::default()
    };

    let (dx, dy) = axis.offset(step as f32);

    while pixels != 0 {
        let next = actor.hitbox.translated(dx, dy);

        if let Some(hit) = geometry.find_blocking_solid(&next) {
            // Solid directly beneath the feet
            if axis == Axis::Y && hit.bounds.top() == actor.hitbox.bottom() {
                actor.grounded = true;
            }
            if let Some(observer) = observer.as_deref_mut() {
                observer.on_blocked(actor);
            }
            outcome.blocked_by = Some(hit);
            break;
        }

        #[cfg(feature = "debug-tracing")]
        tracing::trace!("Step {:?} {} -> {:?}", axis, step, next);

        actor.translate(dx, dy);
        outcome.moved += step;
        pixels -= step;
    }

    outcome
}

/// Move along X. See [`move_actor_axis`].
#[inline]
pub fn move_actor_x(
    actor: &mut Actor,
    amount: f32,
    geometry: &Geometry<'_>,
    observer: Option<&mut dyn CollisionObserver>,
) -> MoveOutcome {
    move_actor_axis(actor, Axis::X, amount, geometry, observer)
}

/// Move along Y. See [`move_actor_axis`].
#[inline]
pub fn move_actor_y(
    actor: &mut Actor,
    amount: f32,
    geometry: &Geometry<'_>,
    observer: Option<&mut dyn CollisionObserver>,
) -> MoveOutcome {
    move_actor_axis(actor, Axis::Y, amount, geometry, observer)
}

// =============================================================================
// TESTS
// =============================================================================
