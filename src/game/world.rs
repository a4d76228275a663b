//! World Store
//!
//! Owns every solid and actor for one level. Engines take the world (or a
//! borrowed [`Geometry`] view of it) by reference; nothing keeps element
//! references across an append, only [`SolidId`]/[`ActorId`] indices.

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::core::hash::{StateHash, compute_state_hash};
use crate::core::vec2::Vec2;
use crate::game::actor::{Actor, ActorId};
use crate::game::collision::Geometry;
use crate::game::events::GameEvent;
use crate::game::movement::{move_actor_axis, Axis, CollisionObserver, MoveOutcome};
use crate::game::platform::{PlatformRoute, DEFAULT_PLATFORM_SPEED};
use crate::game::push::{move_solid, SolidMove};
use crate::game::solid::{Solid, SolidId};

/// Player sprite top-left when a level does not name a spawn point.
pub const DEFAULT_SPAWN: Vec2 = Vec2::new(200.0, -32.0);

/// Complete simulation state for one level.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct World {
    /// Ticks simulated so far
    pub tick: u64,

    /// Movable (and editor-placed) solids, in insertion order
    pub solids: Vec<Solid>,

    /// Actors, in insertion order
    pub actors: Vec<Actor>,

    /// Static tile-derived solids, never moved
    pub tiles: Vec<Solid>,

    /// Moving platform routes, advanced once per tick
    pub routes: Vec<PlatformRoute>,

    /// Where the player sprite starts
    pub spawn: Vec2,

    /// The player-controlled actor, if any
    pub player: Option<ActorId>,

    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pub(crate) pending_events: Vec<GameEvent>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self {
            spawn: DEFAULT_SPAWN,
            ..Self::default()
        }
    }

    /// The built-in test level: floor, two walls, a ceiling, one patrolling
    /// platform and the player.
    pub fn default_level() -> Self {
        let mut world = Self::new();

        let platform = world.add_solid(Solid::from_ints(20, -50, 20, 20, true));
        world.add_route(PlatformRoute::horizontal(
            platform,
            20.0,
            480.0,
            DEFAULT_PLATFORM_SPEED,
        ));

        world.add_solid(Solid::from_ints(0, 0, 500, 20, true));
        world.add_solid(Solid::from_ints(0, -100, 20, 100, true));
        world.add_solid(Solid::from_ints(480, -100, 20, 100, true));
        world.add_solid(Solid::from_ints(0, -120, 500, 20, true));

        world.spawn_player();
        world
    }

    /// World built from a saved level's solids plus a player at the default
    /// spawn.
    pub fn from_level(solids: Vec<Solid>) -> Self {
        let mut world = Self::new();
        info!("Building world from {} level solids", solids.len());
        world.solids = solids;
        world.spawn_player();
        world
    }

    /// World built from static tile geometry and a spawn point.
    pub fn from_static_geometry(tiles: Vec<Solid>, spawn: Vec2) -> Self {
        let mut world = Self::new();
        info!("Building world from {} tile solids", tiles.len());
        world.tiles = tiles;
        world.spawn = spawn;
        world.spawn_player();
        world
    }

    /// Append a solid.
    pub fn add_solid(&mut self, solid: Solid) -> SolidId {
        self.solids.push(solid);
        SolidId(self.solids.len() - 1)
    }

    /// Append an actor.
    pub fn add_actor(&mut self, actor: Actor) -> ActorId {
        self.actors.push(actor);
        ActorId(self.actors.len() - 1)
    }

    /// Append a static tile solid.
    pub fn add_tile(&mut self, tile: Solid) {
        self.tiles.push(tile);
    }

    /// Register a platform route.
    pub fn add_route(&mut self, route: PlatformRoute) {
        self.routes.push(route);
    }

    /// Add a player-sized actor at the spawn point and make it the player.
    pub fn spawn_player(&mut self) -> ActorId {
        // Positions are whole pixels
        let id = self.add_actor(Actor::player(self.spawn.x.round(), self.spawn.y.round()));
        self.player = Some(id);
        id
    }

    /// Get actor.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0)
    }

    /// Get actor (mutable).
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.0)
    }

    /// Get the player actor.
    pub fn player_actor(&self) -> Option<&Actor> {
        self.player.and_then(|id| self.actor(id))
    }

    /// Read-only collision view over solids and tiles.
    pub fn geometry(&self) -> Geometry<'_> {
        Geometry::new(&self.solids, &self.tiles)
    }

    /// Move an actor along one axis against this world's solids.
    pub fn move_actor(
        &mut self,
        id: ActorId,
        axis: Axis,
        amount: f32,
        observer: Option<&mut dyn CollisionObserver>,
    ) -> MoveOutcome {
        let geometry = Geometry::new(&self.solids, &self.tiles);
        match self.actors.get_mut(id.0) {
            Some(actor) => move_actor_axis(actor, axis, amount, &geometry, observer),
            None => MoveOutcome::default(),
        }
    }

    /// Move a solid, pushing and carrying actors.
    pub fn move_solid(&mut self, id: SolidId, x: f32, y: f32) -> SolidMove {
        move_solid(self, id, x, y)
    }

    /// Advance every platform route by `dt` seconds.
    pub fn advance_platforms(&mut self, dt: f32) {
        let mut routes = std::mem::take(&mut self.routes);
        for route in &mut routes {
            route.advance(self, dt);
        }
        self.routes = routes;
    }

    /// Compute state hash for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, |hasher| {
            hasher.update_u64(self.solids.len() as u64);
            for solid in &self.solids {
                solid.hash_into(hasher);
            }

            hasher.update_u64(self.tiles.len() as u64);
            for tile in &self.tiles {
                tile.hash_into(hasher);
            }

            hasher.update_u64(self.actors.len() as u64);
            for actor in &self.actors {
                actor.hash_into(hasher);
            }

            for route in &self.routes {
                route.hash_into(hasher);
            }
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Queue an event for this tick.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rect::Rect;

    #[test]
    fn test_default_level_layout() {
        let world = World::default_level();

        assert_eq!(world.solids.len(), 5);
        assert_eq!(world.solids[0].bounds, Rect::new(20.0, -50.0, 20.0, 20.0));
        assert_eq!(world.solids[1].bounds, Rect::new(0.0, 0.0, 500.0, 20.0));
        assert!(world.solids.iter().all(|s| s.collidable));
        assert_eq!(world.routes.len(), 1);

        let player = world.player_actor().unwrap();
        assert_eq!(player.bounds, Rect::new(200.0, -32.0, 32.0, 32.0));
        assert_eq!(player.hitbox, Rect::new(210.0, -28.0, 12.0, 28.0));
    }

    #[test]
    fn test_player_starts_clear_of_geometry() {
        let world = World::default_level();
        let player = world.player_actor().unwrap();
        assert!(!world.geometry().is_blocked(&player.hitbox));
    }

    #[test]
    fn test_move_actor_uses_world_geometry() {
        let mut world = World::default_level();
        let id = world.player.unwrap();

        // Floor is directly beneath the spawn point
        let outcome = world.move_actor(id, Axis::Y, 5.0, None);
        assert_eq!(outcome.moved, 0);
        assert!(world.actor(id).unwrap().grounded);
    }

    #[test]
    fn test_move_actor_unknown_id() {
        let mut world = World::new();
        let outcome = world.move_actor(ActorId(4), Axis::X, 10.0, None);
        assert_eq!(outcome, MoveOutcome::default());
    }

    #[test]
    fn test_from_level_spawns_player() {
        let world = World::from_level(vec![Solid::from_ints(0, 0, 100, 10, true)]);
        assert_eq!(world.solids.len(), 1);
        assert_eq!(world.player, Some(ActorId(0)));
        assert!(world.tiles.is_empty());
    }

    #[test]
    fn test_static_geometry_goes_to_tiles() {
        let tiles = vec![Solid::from_ints(0, 0, 16, 16, true)];
        let world = World::from_static_geometry(tiles, Vec2::new(32.0, -32.0));

        assert!(world.solids.is_empty());
        assert_eq!(world.tiles.len(), 1);
        assert_eq!(world.player_actor().unwrap().bounds.x, 32.0);
    }

    #[test]
    fn test_world_hash_determinism() {
        let world1 = World::default_level();
        let world2 = World::default_level();
        assert_eq!(world1.compute_hash(), world2.compute_hash());

        let mut world3 = World::default_level();
        world3.move_solid(SolidId(0), 1.0, 0.0);
        assert_ne!(world1.compute_hash(), world3.compute_hash());
    }

    #[test]
    fn test_take_events_drains() {
        let mut world = World::new();
        world.push_event(GameEvent::actor_jumped(0, ActorId(0)));
        assert_eq!(world.take_events().len(), 1);
        assert!(world.take_events().is_empty());
    }
}
