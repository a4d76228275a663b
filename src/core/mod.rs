//! Core geometry primitives.
//!
//! Plain value types with no knowledge of the world or its entities.

pub mod rect;
pub mod vec2;
pub mod math;
pub mod hash;

// Re-export core types
pub use rect::Rect;
pub use vec2::Vec2;
pub use math::{sign, round_half_away};
pub use hash::{StateHash, StateHasher, compute_state_hash};
