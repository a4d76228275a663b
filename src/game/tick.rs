//! Simulation Tick
//!
//! One fixed step of the world. Order within a tick:
//!
//! 1. Advance tick counter
//! 2. Player control (input -> velocity -> actor moves)
//! 3. Moving platforms (push / carry)
//! 4. Drain events into the result

use serde::{Serialize, Deserialize};

use crate::game::animation::AnimationLibrary;
use crate::game::events::GameEvent;
use crate::game::input::{InputFrame, InputSource, PlayerInputBuffer};
use crate::game::player::{update_player, PlayerConfig};
use crate::game::world::World;
use crate::TICK_RATE;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick, in processing order
    pub events: Vec<GameEvent>,
}

/// Configuration for the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Player physics constants
    pub player: PlayerConfig,
    /// Fixed timestep in seconds
    pub dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            dt: 1.0 / TICK_RATE as f32,
        }
    }
}

/// Run one simulation tick.
pub fn tick(
    world: &mut World,
    input: &InputFrame,
    config: &SimConfig,
    animations: &AnimationLibrary,
) -> TickResult {
    let mut result = TickResult::default();

    // 0. Advance tick counter
    world.tick += 1;

    // 1. Player control
    if let Some(player) = world.player {
        update_player(world, player, input, &config.player, animations, config.dt);
    }

    // 2. Moving platforms
    world.advance_platforms(config.dt);

    // 3. Collect events
    result.events = world.take_events();
    result.events.sort();

    result
}

/// Run `ticks` ticks, pulling input from `source`.
///
/// Returns every event generated.
pub fn run<S: InputSource + ?Sized>(
    world: &mut World,
    source: &mut S,
    ticks: u64,
    config: &SimConfig,
    animations: &AnimationLibrary,
) -> Vec<GameEvent> {
    let mut all_events = Vec::new();

    for _ in 0..ticks {
        let input = source.input_at(world.tick);
        all_events.extend(tick(world, &input, config, animations).events);
    }

    all_events
}

/// Replay a recording on `initial`.
///
/// Returns final world and events.
pub fn replay(
    initial: World,
    inputs: &PlayerInputBuffer,
    config: &SimConfig,
    animations: &AnimationLibrary,
) -> (World, Vec<GameEvent>) {
    let mut world = initial;
    let mut all_events = Vec::new();

    for (_, input) in inputs.replay_iter() {
        let result = tick(&mut world, &input, config, animations);
        all_events.extend(result.events);
    }

    (world, all_events)
}
