//! Animation Lookup
//!
//! The simulation only needs animations as comparison keys (to decide when
//! `state_time` resets) plus enough timing data to pick a frame index.
//! Textures stay with the renderer, which maps frame indices to images.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use tracing::error;

/// Symbolic animation identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AnimationId {
    /// Standing still (sprite faces right, flipped for left)
    IdleRight = 0,
    /// Running (sprite faces right, flipped for left)
    RunRight = 1,
    /// Rising after a jump
    JumpUp = 2,
    /// Falling
    JumpDown = 3,
}

/// How frame indices advance with elapsed time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum AnimationMode {
    /// Play once, hold the last frame
    #[default]
    Normal = 0,
    /// Play once backwards, hold the first frame
    Reversed = 1,
    /// Wrap around
    Looped = 2,
    /// Wrap around, backwards
    LoopedReversed = 3,
    /// Bounce between first and last frame
    LoopedPingPong = 4,
}

/// Timing description of one animation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Identifier, `None` for the empty animation
    pub id: Option<AnimationId>,
    /// Frame advance mode
    pub mode: AnimationMode,
    /// Seconds each frame is shown
    pub frame_duration: f32,
    /// Number of frames
    pub frame_count: usize,
}

impl Animation {
    /// Neutral animation returned for unknown lookups. Has no frames.
    pub const EMPTY: Self = Self {
        id: None,
        mode: AnimationMode::Normal,
        frame_duration: 0.0,
        frame_count: 0,
    };

    /// Default frame duration (10 fps)
    pub const DEFAULT_FRAME_DURATION: f32 = 0.1;

    /// Create an animation description.
    pub const fn new(id: AnimationId, mode: AnimationMode, frame_count: usize) -> Self {
        Self {
            id: Some(id),
            mode,
            frame_duration: Self::DEFAULT_FRAME_DURATION,
            frame_count,
        }
    }

    /// Is this the animation with the given id?
    #[inline]
    pub fn is(&self, id: AnimationId) -> bool {
        self.id == Some(id)
    }

    /// Frame to show after `state_time` seconds in this animation.
    ///
    /// Returns `None` for animations without frames.
    pub fn frame_index(&self, state_time: f32) -> Option<usize> {
        let n = self.frame_count;
        if n == 0 {
            return None;
        }
        if self.frame_duration <= 0.0 || state_time <= 0.0 {
            return Some(match self.mode {
                AnimationMode::Reversed | AnimationMode::LoopedReversed => n - 1,
                _ => 0,
            });
        }

        let step = (state_time / self.frame_duration).floor() as usize;
        let last = n - 1;

        let index = match self.mode {
            AnimationMode::Normal => step.min(last),
            AnimationMode::Reversed => last - step.min(last),
            AnimationMode::Looped => step % n,
            AnimationMode::LoopedReversed => last - step % n,
            AnimationMode::LoopedPingPong => {
                if n == 1 {
                    0
                } else {
                    let period = 2 * n - 2;
                    let phase = step % period;
                    if phase < n { phase } else { period - phase }
                }
            }
        };
        Some(index)
    }
}

/// Registry of animations keyed by id.
#[derive(Clone, Debug, Default)]
pub struct AnimationLibrary {
    animations: BTreeMap<AnimationId, Animation>,
}

impl AnimationLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Library with the character animations the sandbox ships with.
    pub fn with_defaults() -> Self {
        let mut library = Self::new();
        library.register(Animation::new(AnimationId::IdleRight, AnimationMode::Looped, 10));
        library.register(Animation::new(AnimationId::RunRight, AnimationMode::Looped, 6));
        library.register(Animation::new(AnimationId::JumpUp, AnimationMode::Normal, 1));
        library.register(Animation::new(AnimationId::JumpDown, AnimationMode::Normal, 1));
        library
    }

    /// Add or replace an animation. Animations without an id are ignored.
    pub fn register(&mut self, animation: Animation) {
        if let Some(id) = animation.id {
            self.animations.insert(id, animation);
        }
    }

    /// Look up an animation.
    ///
    /// An unregistered id is reported and yields `Animation::EMPTY`;
    /// the caller keeps simulating.
    pub fn get(&self, id: AnimationId) -> Animation {
        match self.animations.get(&id) {
            Some(animation) => *animation,
            None => {
                error!("Unknown animation {:?}, using empty animation", id);
                Animation::EMPTY
            }
        }
    }

    /// Number of registered animations.
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn anim(mode: AnimationMode, frames: usize) -> Animation {
        Animation::new(AnimationId::RunRight, mode, frames)
    }

    #[test]
    fn test_defaults_registered() {
        let library = AnimationLibrary::with_defaults();
        assert_eq!(library.len(), 4);
        assert_eq!(library.get(AnimationId::IdleRight).frame_count, 10);
        assert_eq!(library.get(AnimationId::RunRight).frame_count, 6);
    }

    #[test]
    fn test_unknown_animation_is_empty() {
        let library = AnimationLibrary::new();
        let animation = library.get(AnimationId::JumpUp);
        assert_eq!(animation, Animation::EMPTY);
        assert_eq!(animation.frame_index(1.0), None);
    }

    #[test]
    fn test_normal_holds_last_frame() {
        let a = anim(AnimationMode::Normal, 3);
        assert_eq!(a.frame_index(0.0), Some(0));
        assert_eq!(a.frame_index(0.15), Some(1));
        assert_eq!(a.frame_index(10.0), Some(2));
    }

    #[test]
    fn test_reversed() {
        let a = anim(AnimationMode::Reversed, 3);
        assert_eq!(a.frame_index(0.0), Some(2));
        assert_eq!(a.frame_index(0.15), Some(1));
        assert_eq!(a.frame_index(10.0), Some(0));
    }

    #[test]
    fn test_looped_wraps() {
        let a = anim(AnimationMode::Looped, 6);
        assert_eq!(a.frame_index(0.55), Some(5));
        assert_eq!(a.frame_index(0.65), Some(0));

        let r = anim(AnimationMode::LoopedReversed, 6);
        assert_eq!(r.frame_index(0.05), Some(5));
        assert_eq!(r.frame_index(0.65), Some(5));
    }

    #[test]
    fn test_ping_pong_bounces() {
        let a = anim(AnimationMode::LoopedPingPong, 3);
        let frames: Vec<_> = (0..6)
            .map(|i| a.frame_index(i as f32 * 0.1 + 0.05).unwrap())
            .collect();
        assert_eq!(frames, vec![0, 1, 2, 1, 0, 1]);
    }

    #[test]
    fn test_single_frame_ping_pong() {
        let a = anim(AnimationMode::LoopedPingPong, 1);
        assert_eq!(a.frame_index(3.0), Some(0));
    }
}
