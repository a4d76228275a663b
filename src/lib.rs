//! # Sandbox Physics
//!
//! Actor/solid collision and movement core for a 2D pixel platformer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SANDBOX PHYSICS                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── rect.rs     - Axis-aligned rectangle, strict overlap    │
//! │  ├── vec2.rs     - 2D float vector                           │
//! │  ├── math.rs     - sign, rounding mode                       │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Simulation                                │
//! │  ├── collision.rs- Blocking queries over solids and tiles    │
//! │  ├── movement.rs - Actor movement engine                     │
//! │  ├── push.rs     - Solid movement engine (push / carry)      │
//! │  ├── platform.rs - Moving platform routes                    │
//! │  ├── world.rs    - Owned entity store                        │
//! │  ├── player.rs   - Player control policy                     │
//! │  └── tick.rs     - Simulation loop                           │
//! │                                                              │
//! │  level.rs        - Plain-text level format                   │
//! │  tilemap.rs      - Tiled JSON maps                           │
//! │  config.rs       - TOML configuration                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Movement Model
//!
//! Positions are whole pixels. Fractional motion is banked per axis in a
//! remainder and released one pixel at a time, so an actor can never tunnel
//! through a solid however fast it goes. Solids are moved in one jump and
//! shove actors out of their way afterwards.
//!
//! Given identical level data and inputs the simulation produces identical
//! state hashes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod level;
pub mod tilemap;
pub mod config;

// Re-export commonly used types
pub use core::rect::Rect;
pub use core::vec2::Vec2;
pub use game::actor::{Actor, ActorId};
pub use game::solid::{Solid, SolidId};
pub use game::world::World;
pub use game::input::{InputFrame, PlayerInputBuffer};
pub use game::tick::SimConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
