//! Scalar helpers shared by the movement engines.

/// Sign of a value: 1, -1, or 0.
#[inline]
pub fn sign(value: f32) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Round to the nearest whole pixel, halves away from zero.
///
/// This is the single rounding rule for remainder accumulation:
/// 0.5 -> 1, -0.5 -> -1, 2.5 -> 3.
#[inline]
pub fn round_half_away(value: f32) -> i32 {
    value.round() as i32
}
