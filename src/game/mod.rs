//! Game Logic Module
//!
//! All simulation code. Deterministic for a given input sequence.
//!
//! ## Module Structure
//!
//! - `actor`, `solid`: Entity types
//! - `collision`: Overlap tests and blocking queries
//! - `movement`: Actor movement engine (sub-pixel, per-pixel stepped)
//! - `push`: Solid movement engine (push / carry)
//! - `platform`: Patrol routes for moving solids
//! - `world`: Owned entity store
//! - `input`: Input intent, recording and replay
//! - `animation`: Animation lookup
//! - `player`: Player control policy
//! - `tick`: Simulation loop
//! - `events`: Game events for replay/verification

pub mod actor;
pub mod solid;
pub mod collision;
pub mod movement;
pub mod push;
pub mod platform;
pub mod world;
pub mod input;
pub mod animation;
pub mod player;
pub mod tick;
pub mod events;

// Re-export key types
pub use actor::{Actor, ActorId, Facing};
pub use solid::{Solid, SolidId};
pub use collision::{collides, Geometry};
pub use movement::{move_actor_x, move_actor_y, Axis, CollisionObserver, MoveOutcome};
pub use push::{move_solid, SolidMove};
pub use world::World;
pub use input::{InputFrame, InputSource, PlayerInputBuffer};
pub use animation::{Animation, AnimationId, AnimationLibrary};
pub use player::PlayerConfig;
pub use tick::{SimConfig, TickResult};
pub use events::GameEvent;
