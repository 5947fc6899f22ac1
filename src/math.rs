//! Angle helpers shared by the heading computations

use nalgebra::ComplexField;

/// Degrees in a full turn
pub const FULL_TURN: f64 = 360.0;

/// Wrap an angle in degrees into `[0, 360)`
///
/// One truncating remainder, then a single `+360` for negative results.
/// `%` on floats keeps the sign of the dividend, so the add is what makes
/// negative headings land in range.
pub fn wrap_degrees(angle: f64) -> f64 {
    let mut wrapped = angle % FULL_TURN;
    if wrapped < 0.0 {
        wrapped += FULL_TURN;
    }
    // -1e-14 % 360 + 360 rounds to exactly 360.0
    if wrapped >= FULL_TURN {
        wrapped -= FULL_TURN;
    }
    wrapped
}

/// Round to the nearest integer with halves going up
///
/// Uses the fractional part relative to truncation: `ceil` when it is at
/// least one half, `floor` otherwise. Negative inputs therefore always
/// round down, matching the driver sector maths.
pub fn round_half_up(value: f64) -> f64 {
    let fraction = value - value.trunc();
    if fraction >= 0.5 {
        value.ceil()
    } else {
        value.floor()
    }
}

/// Truncate toward zero into an `i32`, saturating at the bounds
pub fn truncate(value: f64) -> i32 {
    value as i32
}
