//! Player Control
//!
//! Turns one tick of input intent into velocity, then drives the actor
//! movement engine with it.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::vec2::Vec2;
use crate::game::actor::{Actor, ActorId, Facing};
use crate::game::animation::{AnimationId, AnimationLibrary};
use crate::game::collision::Geometry;
use crate::game::events::GameEvent;
use crate::game::input::InputFrame;
use crate::game::movement::{move_actor_axis, Axis, MoveOutcome};
use crate::game::world::World;

/// Physics constants for the player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal speed while a direction is held (px/s)
    pub run_speed: f32,
    /// Speed multiplier while the run modifier is held
    pub run_multiplier: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Maximum falling speed (px/s)
    pub terminal_velocity: f32,
    /// Upward speed set by a jump (px/s)
    pub jump_speed: f32,
    /// Per-axis velocity multiplier applied after moving
    pub friction: Vec2,
    /// Velocity components below this magnitude snap to zero
    pub epsilon: f32,
    /// Up/down fly at run speed and gravity is off
    pub free_fly: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            run_speed: 200.0,
            run_multiplier: 1.5,
            gravity: 1200.0,
            terminal_velocity: 600.0,
            jump_speed: 420.0,
            friction: Vec2::new(0.8, 1.0),
            epsilon: 0.5,
            free_fly: false,
        }
    }
}

/// What one player update did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerUpdate {
    /// Horizontal move result
    pub horizontal: MoveOutcome,
    /// Vertical move result
    pub vertical: MoveOutcome,
    /// A jump started this tick
    pub jumped: bool,
    /// Went from airborne to grounded this tick
    pub landed: bool,
}

/// Switch animation, resetting `state_time` only on an actual change.
fn set_animation(actor: &mut Actor, animations: &AnimationLibrary, id: AnimationId) {
    if !actor.animation.is(id) {
        actor.animation = animations.get(id);
        actor.state_time = 0.0;
    }
}

/// Run one tick of player control for actor `id`.
pub fn update_player(
    world: &mut World,
    id: ActorId,
    input: &InputFrame,
    config: &PlayerConfig,
    animations: &AnimationLibrary,
    dt: f32,
) -> PlayerUpdate {
    let mut update = PlayerUpdate::default();
    let tick = world.tick;

    let World {
        solids,
        tiles,
        actors,
        pending_events,
        ..
    } = world;

    let Some(actor) = actors.get_mut(id.0) else {
        return update;
    };
    let geometry = Geometry::new(solids.as_slice(), tiles.as_slice());

    actor.state_time += dt;

    // Horizontal intent, left wins when both are held
    let run_speed = if input.run() {
        config.run_speed * config.run_multiplier
    } else {
        config.run_speed
    };
    let running = if input.left() {
        actor.speed.x = -run_speed;
        actor.facing = Facing::Left;
        true
    } else if input.right() {
        actor.speed.x = run_speed;
        actor.facing = Facing::Right;
        true
    } else {
        false
    };

    // Vertical intent
    if config.free_fly {
        actor.speed.y = if input.up() {
            -run_speed
        } else if input.down() {
            run_speed
        } else {
            0.0
        };
    } else {
        if input.jump_pressed() && actor.grounded {
            actor.speed.y = -config.jump_speed;
            actor.grounded = false;
            update.jumped = true;
            debug!("Actor {} jumped", id.0);
            pending_events.push(GameEvent::actor_jumped(tick, id));
        }
        actor.speed.y = (actor.speed.y + config.gravity * dt).min(config.terminal_velocity);
    }

    let step = actor.speed * dt;
    update.horizontal = move_actor_axis(actor, Axis::X, step.x, &geometry, None);

    // Landing or bumping the ceiling kills vertical speed
    let was_grounded = actor.grounded;
    let mut stop_vertical = |blocked: &mut Actor| blocked.speed.y = 0.0;
    update.vertical = move_actor_axis(actor, Axis::Y, step.y, &geometry, Some(&mut stop_vertical));

    // Free fall: a downward step went through
    if update.vertical.moved > 0 && !update.vertical.blocked() {
        actor.grounded = false;
    }
    if !was_grounded && actor.grounded {
        update.landed = true;
        pending_events.push(GameEvent::actor_landed(tick, id));
    }

    let animation = if !actor.grounded && !config.free_fly {
        if actor.speed.y < 0.0 {
            AnimationId::JumpUp
        } else {
            AnimationId::JumpDown
        }
    } else if running {
        AnimationId::RunRight
    } else {
        AnimationId::IdleRight
    };
    set_animation(actor, animations, animation);

    actor.speed = actor.speed.mul_elements(config.friction);
    if actor.speed.x.abs() < config.epsilon {
        actor.speed.x = 0.0;
    }
    if actor.speed.y.abs() < config.epsilon {
        actor.speed.y = 0.0;
    }

    update
}

// =============================================================================
// TESTS
// =============================================================================
