//! Input Intent and Recording
//!
//! The simulation never polls a device. Each tick it receives an
//! [`InputFrame`] of already-resolved booleans (keyboard and gamepad are
//! merged upstream). Frames can be recorded into a delta-compressed
//! [`PlayerInputBuffer`] and replayed for determinism checks.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Resolved input intent for a single tick.
///
/// NO tick field - tick is stored separately for compression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFrame {
    /// Packed intent bits:
    /// - Bit 0: Move left held
    /// - Bit 1: Move right held
    /// - Bit 2: Move up held
    /// - Bit 3: Move down held
    /// - Bit 4: Run modifier held
    /// - Bit 5: Jump pressed this tick (edge)
    /// - Bit 6-7: Reserved
    pub flags: u8,
}

impl InputFrame {
    /// Size in bytes
    pub const SIZE: usize = 1;

    /// Left flag bit
    pub const FLAG_LEFT: u8 = 0x01;

    /// Right flag bit
    pub const FLAG_RIGHT: u8 = 0x02;

    /// Up flag bit
    pub const FLAG_UP: u8 = 0x04;

    /// Down flag bit
    pub const FLAG_DOWN: u8 = 0x08;

    /// Run modifier flag bit
    pub const FLAG_RUN: u8 = 0x10;

    /// Jump edge flag bit
    pub const FLAG_JUMP: u8 = 0x20;

    /// Create an idle frame.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Create a frame from raw flag bits.
    pub const fn from_flags(flags: u8) -> Self {
        Self { flags }
    }

    /// Builder: add flag bits.
    pub const fn with(self, flag: u8) -> Self {
        Self {
            flags: self.flags | flag,
        }
    }

    #[inline]
    fn has(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    #[inline]
    fn set(&mut self, flag: u8, on: bool) {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }

    /// Move left held.
    #[inline]
    pub fn left(&self) -> bool {
        self.has(Self::FLAG_LEFT)
    }

    /// Move right held.
    #[inline]
    pub fn right(&self) -> bool {
        self.has(Self::FLAG_RIGHT)
    }

    /// Move up held.
    #[inline]
    pub fn up(&self) -> bool {
        self.has(Self::FLAG_UP)
    }

    /// Move down held.
    #[inline]
    pub fn down(&self) -> bool {
        self.has(Self::FLAG_DOWN)
    }

    /// Run modifier held.
    #[inline]
    pub fn run(&self) -> bool {
        self.has(Self::FLAG_RUN)
    }

    /// Jump pressed this tick.
    #[inline]
    pub fn jump_pressed(&self) -> bool {
        self.has(Self::FLAG_JUMP)
    }

    /// Set move left.
    pub fn set_left(&mut self, held: bool) {
        self.set(Self::FLAG_LEFT, held);
    }

    /// Set move right.
    pub fn set_right(&mut self, held: bool) {
        self.set(Self::FLAG_RIGHT, held);
    }

    /// Set move up.
    pub fn set_up(&mut self, held: bool) {
        self.set(Self::FLAG_UP, held);
    }

    /// Set move down.
    pub fn set_down(&mut self, held: bool) {
        self.set(Self::FLAG_DOWN, held);
    }

    /// Set run modifier.
    pub fn set_run(&mut self, held: bool) {
        self.set(Self::FLAG_RUN, held);
    }

    /// Set jump edge.
    pub fn set_jump(&mut self, pressed: bool) {
        self.set(Self::FLAG_JUMP, pressed);
    }

    /// Check if this is an idle frame (no input).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }
}

/// Anything that can answer "what is the intent at this tick".
pub trait InputSource {
    /// Input for `tick`.
    fn input_at(&mut self, tick: u64) -> InputFrame;
}

impl InputSource for InputFrame {
    fn input_at(&mut self, _tick: u64) -> InputFrame {
        *self
    }
}

/// Delta-compressed input entry.
///
/// Only stored when input CHANGES (not every tick).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u64,
    /// The new input state
    pub frame: InputFrame,
}

impl InputDelta {
    /// Create new delta entry.
    pub fn new(tick: u64, frame: InputFrame) -> Self {
        Self { tick, frame }
    }
}

// =============================================================================
// INPUT BUFFER
// =============================================================================

/// Input recording for one player over one session.
///
/// Used for replay playback and determinism checks.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlayerInputBuffer {
    /// Starting tick (usually 0)
    pub start_tick: u64,

    /// Last recorded tick
    pub end_tick: u64,

    /// Delta-compressed input data.
    /// Only stores ticks where input CHANGED.
    deltas: Vec<InputDelta>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_frame: InputFrame,
}

impl PlayerInputBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record input for a tick.
    ///
    /// Only stores if input changed from previous frame.
    pub fn record(&mut self, tick: u64, frame: InputFrame) {
        self.end_tick = tick;

        if frame != self.last_frame {
            self.deltas.push(InputDelta::new(tick, frame));
            self.last_frame = frame;
        }
    }

    /// Get input at a specific tick.
    ///
    /// Uses binary search for efficiency.
    pub fn get_input_at(&self, tick: u64) -> InputFrame {
        // Last delta at or before this tick
        let idx = self.deltas.partition_point(|d| d.tick <= tick);

        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// All deltas.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Number of delta entries.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Hash of the recording, for comparing runs.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_buffer();
        hasher.update_u64(self.start_tick);
        hasher.update_u64(self.end_tick);
        for delta in &self.deltas {
            hasher.update_u64(delta.tick);
            hasher.update_u8(delta.frame.flags);
        }
        hasher.finalize()
    }

    /// Finalize the buffer (call at session end).
    pub fn finalize(&mut self, end_tick: u64) {
        self.end_tick = end_tick;
    }

    /// Create iterator over all inputs for replay.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            buffer: self,
            current_tick: self.start_tick,
            delta_idx: 0,
            current_frame: InputFrame::new(),
        }
    }
}

impl InputSource for PlayerInputBuffer {
    fn input_at(&mut self, tick: u64) -> InputFrame {
        self.get_input_at(tick)
    }
}

/// Iterator for replaying inputs tick-by-tick.
pub struct ReplayIterator<'a> {
    buffer: &'a PlayerInputBuffer,
    current_tick: u64,
    delta_idx: usize,
    current_frame: InputFrame,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u64, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tick > self.buffer.end_tick {
            return None;
        }

        while let Some(delta) = self.buffer.deltas.get(self.delta_idx) {
            if delta.tick > self.current_tick {
                break;
            }
            self.current_frame = delta.frame;
            self.delta_idx += 1;
        }

        let result = (self.current_tick, self.current_frame);
        self.current_tick += 1;
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_frame_flags() {
        let mut frame = InputFrame::new();
        assert!(frame.is_idle());

        frame.set_left(true);
        frame.set_jump(true);
        assert!(frame.left());
        assert!(frame.jump_pressed());
        assert!(!frame.right());
        assert!(!frame.run());

        frame.set_jump(false);
        assert!(!frame.jump_pressed());
        assert!(frame.left());

        let built = InputFrame::new()
            .with(InputFrame::FLAG_RIGHT)
            .with(InputFrame::FLAG_RUN);
        assert!(built.right() && built.run());
        assert!(!built.up() && !built.down());
    }

    #[test]
    fn test_vertical_setters() {
        let mut frame = InputFrame::new();
        frame.set_up(true);
        assert!(frame.up());
        assert_eq!(frame.flags, InputFrame::FLAG_UP);

        frame.set_down(true);
        frame.set_up(false);
        assert!(frame.down() && !frame.up());
        assert_eq!(frame.flags, InputFrame::FLAG_DOWN);
    }

    #[test]
    fn test_input_buffer_delta_compression() {
        let mut buffer = PlayerInputBuffer::new();

        let frame = InputFrame::new().with(InputFrame::FLAG_RIGHT);
        for tick in 0..4 {
            buffer.record(tick, frame);
        }

        // Input didn't change
        assert_eq!(buffer.delta_count(), 1);

        buffer.record(4, InputFrame::new().with(InputFrame::FLAG_LEFT));
        assert_eq!(buffer.delta_count(), 2);
        assert_eq!(buffer.end_tick, 4);
    }

    #[test]
    fn test_input_buffer_get_at() {
        let mut buffer = PlayerInputBuffer::new();

        let frame1 = InputFrame::new().with(InputFrame::FLAG_RIGHT);
        let frame2 = InputFrame::new().with(InputFrame::FLAG_LEFT);
        let frame3 = InputFrame::new().with(InputFrame::FLAG_JUMP);

        buffer.record(10, frame1);
        buffer.record(20, frame2);
        buffer.record(30, frame3);

        // Before first delta
        assert!(buffer.get_input_at(5).is_idle());

        assert_eq!(buffer.get_input_at(10), frame1);
        assert_eq!(buffer.get_input_at(15), frame1);
        assert_eq!(buffer.get_input_at(25), frame2);
        assert_eq!(buffer.get_input_at(30), frame3);
        assert_eq!(buffer.get_input_at(100), frame3);

        assert_eq!(buffer.input_at(21), frame2);
    }

    #[test]
    fn test_replay_iterator() {
        let mut buffer = PlayerInputBuffer::new();

        let walk = InputFrame::new().with(InputFrame::FLAG_RIGHT);
        let jump = walk.with(InputFrame::FLAG_JUMP);
        buffer.record(0, walk);
        buffer.record(3, jump);
        buffer.record(4, walk);
        buffer.finalize(5);

        let frames: Vec<_> = buffer.replay_iter().collect();

        assert_eq!(frames.len(), 6);
        assert_eq!(frames[0], (0, walk));
        assert_eq!(frames[2], (2, walk));
        assert_eq!(frames[3], (3, jump));
        assert_eq!(frames[4], (4, walk));
        assert_eq!(frames[5], (5, walk));
    }

    #[test]
    fn test_buffer_hash_ignores_repeats() {
        let walk = InputFrame::new().with(InputFrame::FLAG_RIGHT);

        let mut a = PlayerInputBuffer::new();
        let mut b = PlayerInputBuffer::new();
        for tick in 0..10 {
            a.record(tick, walk);
            b.record(tick, if tick < 5 { walk } else { walk.with(InputFrame::FLAG_RUN) });
        }

        assert_eq!(a.compute_hash(), a.clone().compute_hash());
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = PlayerInputBuffer::new();
        assert_eq!(buffer.delta_count(), 0);
        assert!(buffer.get_input_at(0).is_idle());
    }
}
