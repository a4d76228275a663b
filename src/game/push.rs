//! Solid Movement Engine
//!
//! Moves a solid by whole pixels and shoves actors out of its way:
//!
//! - Actors overlapping the solid's new bounds are **pushed** flush against
//!   its leading edge. A pushed actor that gets blocked is squished.
//! - Actors that were standing on the solid before it moved are **carried**
//!   by the same amount, unless they were pushed on that axis.
//!
//! X is fully resolved before Y. The solid never tests against other solids
//! and is made non-collidable while it moves so that the actors it drives
//! cannot catch on it.

use tracing::{debug, warn};

use crate::core::math::round_half_away;
use crate::game::actor::{Actor, ActorId};
use crate::game::collision::{collides, is_riding, Geometry};
use crate::game::events::GameEvent;
use crate::game::movement::{move_actor_axis, Axis, Squish};
use crate::game::solid::{Solid, SolidId};
use crate::game::world::World;

/// What a `move_solid` call did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolidMove {
    /// Whole pixels the solid moved on X
    pub moved_x: i32,
    /// Whole pixels the solid moved on Y
    pub moved_y: i32,
    /// Actors shoved out of the way, per axis
    pub pushed: Vec<(ActorId, Axis)>,
    /// Riders moved along, per axis
    pub carried: Vec<(ActorId, Axis)>,
    /// Pushed actors that could not be cleared
    pub squished: Vec<ActorId>,
}

/// Move solid `id` by (x, y) pixels this tick.
///
/// Fractions are banked in the solid's remainder. Unknown ids are ignored.
pub fn move_solid(world: &mut World, id: SolidId, x: f32, y: f32) -> SolidMove {
    let mut report = SolidMove::default();
    let tick = world.tick;

    let World {
        solids,
        actors,
        tiles,
        pending_events,
        ..
    } = world;

    let Some(solid) = solids.get_mut(id.0) else {
        warn!("move_solid on unknown solid {:?}", id);
        return report;
    };

    solid.remainder.x += x;
    solid.remainder.y += y;

    let move_x = round_half_away(solid.remainder.x);
    let move_y = round_half_away(solid.remainder.y);
    if move_x == 0 && move_y == 0 {
        return report;
    }

    // Snapshot riders before anything moves
    let riders: Vec<ActorId> = actors
        .iter()
        .enumerate()
        .filter(|(_, actor)| is_riding(actor, &solids[id.0]))
        .map(|(index, _)| ActorId(index))
        .collect();

    solids[id.0].collidable = false;

    if move_x != 0 {
        shift_axis(solids, tiles.as_slice(), actors, id, Axis::X, move_x, &riders, &mut report);
    }
    if move_y != 0 {
        shift_axis(solids, tiles.as_slice(), actors, id, Axis::Y, move_y, &riders, &mut report);
    }

    solids[id.0].collidable = true;

    for actor in &report.squished {
        pending_events.push(GameEvent::actor_squished(tick, *actor, id));
    }

    report
}

/// Translate the solid along one axis, then push or carry every actor.
#[allow(clippy::too_many_arguments)]
fn shift_axis(
    solids: &mut [Solid],
    tiles: &[Solid],
    actors: &mut [Actor],
    id: SolidId,
    axis: Axis,
    amount: i32,
    riders: &[ActorId],
    report: &mut SolidMove,
) {
    {
        let solid = &mut solids[id.0];
        let (dx, dy) = axis.offset(amount as f32);
        match axis {
            Axis::X => solid.remainder.x -= amount as f32,
            Axis::Y => solid.remainder.y -= amount as f32,
        }
        solid.bounds = solid.bounds.translated(dx, dy);
    }
    match axis {
        Axis::X => report.moved_x = amount,
        Axis::Y => report.moved_y = amount,
    }

    let bounds = solids[id.0].bounds;
    let geometry = Geometry::new(solids, tiles);

    for (index, actor) in actors.iter_mut().enumerate() {
        let actor_id = ActorId(index);

        if collides(&actor.hitbox, &bounds) {
            let push = match (axis, amount > 0) {
                (Axis::X, true) => bounds.right() - actor.hitbox.left(),
                (Axis::X, false) => bounds.left() - actor.hitbox.right(),
                (Axis::Y, true) => bounds.bottom() - actor.hitbox.top(),
                (Axis::Y, false) => bounds.top() - actor.hitbox.bottom(),
            };
            debug!("Pushing actor {} on {:?} by {:.1}", index, axis, push);

            let mut squish = Squish::default();
            move_actor_axis(actor, axis, push, &geometry, Some(&mut squish));

            report.pushed.push((actor_id, axis));
            if squish.squished && !report.squished.contains(&actor_id) {
                report.squished.push(actor_id);
            }
        } else if riders.contains(&actor_id) {
            debug!("Carrying actor {} on {:?} by {}", index, axis, amount);
            move_actor_axis(actor, axis, amount as f32, &geometry, None);
            report.carried.push((actor_id, axis));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rect::Rect;
    use crate::game::events::GameEventData;

    /// World with one 50x10 platform at (100, 0) and nothing else.
    fn platform_world() -> (World, SolidId) {
        let mut world = World::new();
        let platform = world.add_solid(Solid::from_ints(100, 0, 50, 10, true));
        (world, platform)
    }

    /// Box actor whose hitbox equals its bounds.
    fn box_actor(x: f32, y: f32, size: f32) -> Actor {
        let bounds = Rect::new(x, y, size, size);
        Actor::new(bounds, bounds)
    }

    #[test]
    fn test_sub_pixel_solid_move_is_noop() {
        let (mut world, platform) = platform_world();
        let result = move_solid(&mut world, platform, 0.3, -0.2);

        assert_eq!(result, SolidMove::default());
        let solid = &world.solids[platform.0];
        assert_eq!(solid.bounds.x, 100.0);
        assert!(solid.collidable);
        assert!((solid.remainder.x - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_riding_actor_is_carried() {
        let (mut world, platform) = platform_world();
        let mut rider = box_actor(110.0, -10.0, 10.0);
        rider.grounded = true;
        let rider = world.add_actor(rider);

        let result = move_solid(&mut world, platform, 3.0, 0.0);

        assert_eq!(result.moved_x, 3);
        assert_eq!(result.carried, vec![(rider, Axis::X)]);
        assert!(result.pushed.is_empty());

        let actor = &world.actors[rider.0];
        assert_eq!(actor.bounds.x, 113.0);
        assert!(!collides(&actor.hitbox, &world.solids[platform.0].bounds));
        assert!(world.solids[platform.0].collidable);
    }

    #[test]
    fn test_flush_but_airborne_actor_not_carried() {
        let (mut world, platform) = platform_world();
        let actor = world.add_actor(box_actor(110.0, -10.0, 10.0));

        let result = move_solid(&mut world, platform, 3.0, 0.0);

        assert!(result.carried.is_empty());
        assert_eq!(world.actors[actor.0].bounds.x, 110.0);
    }

    #[test]
    fn test_push_right() {
        let (mut world, platform) = platform_world();
        // Hitbox flush with the platform's right edge
        let actor = world.add_actor(box_actor(150.0, 0.0, 10.0));

        let result = move_solid(&mut world, platform, 4.0, 0.0);

        assert_eq!(result.pushed, vec![(actor, Axis::X)]);
        assert!(result.squished.is_empty());
        assert_eq!(world.actors[actor.0].bounds.x, 154.0);
        assert_eq!(
            world.actors[actor.0].hitbox.left(),
            world.solids[platform.0].bounds.right()
        );
    }

    #[test]
    fn test_push_left() {
        let (mut world, platform) = platform_world();
        let actor = world.add_actor(box_actor(90.0, 0.0, 10.0));

        move_solid(&mut world, platform, -2.0, 0.0);

        assert_eq!(world.actors[actor.0].bounds.right(), 98.0);
        assert_eq!(world.solids[platform.0].bounds.x, 98.0);
    }

    #[test]
    fn test_push_up_from_below() {
        let (mut world, platform) = platform_world();
        // Actor standing right under the platform
        let actor = world.add_actor(box_actor(110.0, 10.0, 10.0));

        move_solid(&mut world, platform, 0.0, 5.0);

        let actor = &world.actors[actor.0];
        assert_eq!(actor.hitbox.top(), 15.0);
        assert!(!collides(&actor.hitbox, &world.solids[platform.0].bounds));
    }

    #[test]
    fn test_rising_platform_lifts_rider() {
        let (mut world, platform) = platform_world();
        let mut rider = box_actor(110.0, -10.0, 10.0);
        rider.grounded = true;
        let rider = world.add_actor(rider);

        let result = move_solid(&mut world, platform, 0.0, -4.0);

        // The rider overlaps the raised platform, so it is pushed, not carried
        assert_eq!(result.pushed, vec![(rider, Axis::Y)]);
        assert!(result.carried.is_empty());
        assert_eq!(world.actors[rider.0].hitbox.bottom(), -4.0);
    }

    #[test]
    fn test_push_and_carry_exclusive_per_axis() {
        let (mut world, platform) = platform_world();
        let mut rider = box_actor(145.0, -10.0, 10.0);
        rider.grounded = true;
        world.add_actor(rider);
        world.add_actor(box_actor(150.0, 0.0, 10.0));

        let result = move_solid(&mut world, platform, 2.0, -3.0);

        for axis in [Axis::X, Axis::Y] {
            for (actor, pushed_axis) in &result.pushed {
                if *pushed_axis == axis {
                    assert!(!result.carried.contains(&(*actor, axis)));
                }
            }
        }
        assert!(world.solids[platform.0].collidable);
    }

    #[test]
    fn test_squish_against_wall() {
        let (mut world, platform) = platform_world();
        world.add_solid(Solid::from_ints(160, -50, 20, 100, true));
        // Actor wedged between platform and wall
        let actor = world.add_actor(box_actor(150.0, 0.0, 10.0));

        let result = move_solid(&mut world, platform, 5.0, 0.0);

        assert_eq!(result.squished, vec![actor]);
        assert!(world.solids[platform.0].collidable);

        let events = world.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].data,
            GameEventData::ActorSquished { actor, solid: platform }
        );
    }

    #[test]
    fn test_carried_rider_blocked_by_other_solid() {
        let (mut world, platform) = platform_world();
        // Wall standing on top of the platform's right end
        world.add_solid(Solid::from_ints(125, -40, 10, 40, true));
        let mut rider = box_actor(115.0, -10.0, 10.0);
        rider.grounded = true;
        let rider = world.add_actor(rider);

        let result = move_solid(&mut world, platform, 5.0, 0.0);

        // Carry is not a push: blocked carries are not squishes
        assert_eq!(result.carried, vec![(rider, Axis::X)]);
        assert!(result.squished.is_empty());
        assert_eq!(world.actors[rider.0].bounds.right(), 125.0);
    }

    #[test]
    fn test_unknown_solid_ignored() {
        let mut world = World::new();
        let result = move_solid(&mut world, SolidId(3), 10.0, 10.0);
        assert_eq!(result, SolidMove::default());
    }
}
