//! Sandbox Simulation Runner
//!
//! Headless driver for the physics core. Builds a world, runs a scripted
//! session, then replays the recorded input and checks the state hashes.
//!
//! ```text
//! sandbox-sim [--level FILE | --tilemap FILE] [--config FILE]
//!             [--ticks N] [--snapshot FILE] [--save-level FILE]
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sandbox_physics::{
    TICK_RATE, VERSION,
    config::load_config,
    game::{
        animation::AnimationLibrary,
        events::GameEventData,
        input::{InputFrame, PlayerInputBuffer},
        tick::{replay, tick, SimConfig},
        solid::Solid,
        world::World,
    },
    level::{load_level, save_level},
    tilemap::load_tilemap,
};

/// Headless sandbox simulation with replay verification.
#[derive(Debug, Parser)]
#[command(name = "sandbox-sim", version)]
struct Options {
    /// Plain-text level file to load
    #[arg(long, value_name = "FILE", conflicts_with = "tilemap")]
    level: Option<PathBuf>,

    /// Tiled JSON map to load
    #[arg(long, value_name = "FILE")]
    tilemap: Option<PathBuf>,

    /// TOML simulation config
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ticks to simulate (default: 10 seconds)
    #[arg(long)]
    ticks: Option<u64>,

    /// Write the final world as JSON
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Write the final geometry as a level file
    #[arg(long, value_name = "FILE")]
    save_level: Option<PathBuf>,
}

/// Scripted demo input: run right, jump, run back left.
fn demo_input(t: u64) -> InputFrame {
    let phase = t % 240;
    let mut frame = InputFrame::new();
    frame.set_right(phase < 100);
    frame.set_left((120..220).contains(&phase));
    frame.set_run(phase % 60 < 20);
    frame.set_jump(phase == 40 || phase == 160);
    frame
}

fn build_world(options: &Options) -> anyhow::Result<World> {
    if let Some(path) = &options.level {
        let solids = load_level(path)?;
        if solids.is_empty() {
            warn!("Level {} has no solids", path.display());
        }
        return Ok(World::from_level(solids));
    }
    if let Some(path) = &options.tilemap {
        return Ok(load_tilemap(path)?.build_world());
    }
    Ok(World::default_level())
}

/// Every solid in the world, movable first. Tilemap geometry lives in
/// `tiles`, so a level saved from a tilemap world still has its floor.
fn level_geometry(world: &World) -> Vec<Solid> {
    world.solids.iter().chain(&world.tiles).cloned().collect()
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Sandbox Sim v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let options = Options::parse();
    let config = match &options.config {
        Some(path) => load_config(path)?,
        None => SimConfig::default(),
    };
    let animations = AnimationLibrary::with_defaults();
    let ticks = options.ticks.unwrap_or(10 * TICK_RATE as u64);

    let initial = build_world(&options)?;
    info!(
        "World: {} solids, {} tiles, {} actors",
        initial.solids.len(),
        initial.tiles.len(),
        initial.actors.len()
    );
    info!("Initial State Hash: {}", hex::encode(initial.compute_hash()));

    // Run the scripted session
    info!("=== Running {} ticks ===", ticks);
    let mut world = initial.clone();
    let mut inputs = PlayerInputBuffer::new();
    let mut total_events = 0;

    for t in 0..ticks {
        let input = demo_input(t);
        inputs.record(t, input);

        let result = tick(&mut world, &input, &config, &animations);
        total_events += result.events.len();

        for event in &result.events {
            if let GameEventData::ActorSquished { actor, solid } = &event.data {
                info!("Tick {}: actor {} squished by solid {}", event.tick, actor.0, solid.0);
            }
        }

        // Report every 2 seconds
        if t % (2 * TICK_RATE as u64) == 0 {
            if let Some(player) = world.player_actor() {
                info!(
                    "Tick {}: player at ({:.0}, {:.0}) grounded={} {} events so far",
                    world.tick, player.bounds.x, player.bounds.y, player.grounded, total_events
                );
            }
        }
    }
    inputs.finalize(ticks.saturating_sub(1));

    let hash = world.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Total events: {} ({} input deltas)", total_events, inputs.delta_count());
    info!("Input Hash: {}", hex::encode(inputs.compute_hash()));

    if let Some(path) = &options.snapshot {
        let json = serde_json::to_string_pretty(&world)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        info!("Wrote snapshot {}", path.display());
    }
    if let Some(path) = &options.save_level {
        save_level(path, &level_geometry(&world))?;
    }

    // Verify determinism by replaying
    if ticks > 0 {
        info!("=== Verifying Determinism ===");
        let (replayed, _) = replay(initial, &inputs, &config, &animations);
        let replay_hash = replayed.compute_hash();
        info!("Replay State Hash: {}", hex::encode(replay_hash));

        if hash != replay_hash {
            bail!("DETERMINISM FAILURE: Hashes differ!");
        }
        info!("DETERMINISM VERIFIED: Hashes match!");
    }

    Ok(())
}
