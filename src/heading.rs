//! Azimuth, bearing and compass-rose direction
//!
//! The azimuth is taken straight from the horizontal X/Y components with no
//! tilt compensation, so the sensor is assumed to be held level.

use core::f64::consts::PI;
use core::fmt;

use crate::math::{FULL_TURN, round_half_up, wrap_degrees};
use nalgebra::RealField;

/// Width of one compass-rose sector in degrees
pub const SECTOR_WIDTH: f64 = FULL_TURN / 16.0;

/// Compass-rose rows, three letter slots each, blank padded
static BEARINGS: [[u8; 3]; 16] = [
    *b"N  ",
    *b"NNE",
    *b"NE ",
    *b"ENE",
    *b"E  ",
    *b"ESE",
    *b"SE ",
    *b"SSE",
    *b"S  ",
    *b"SSW",
    *b"SW ",
    *b"WSW",
    *b"W  ",
    *b"WNW",
    *b"NW ",
    *b"NNW",
];

/// Heading in degrees from the horizontal field components
///
/// `atan2(y, x)` in degrees plus `declination`, wrapped into `[0, 360)`.
///
/// # Example
/// ```
/// use qmc_compass::heading::azimuth;
///
/// assert_eq!(azimuth(0.0, 1.0, 0.0), 90.0);
/// assert_eq!(azimuth(0.0, -1.0, 370.0), 280.0);
/// ```
pub fn azimuth(x: f64, y: f64, declination: f64) -> f64 {
    let heading = y.atan2(x) * 180.0 / PI + declination;
    wrap_degrees(heading)
}

/// Sector index in `0..=15` for an azimuth in degrees
///
/// Sector `n` covers `[n * 22.5 - 11.25, n * 22.5 + 11.25)`, with halves
/// rounding up, so 11.25° already belongs to NNE. Azimuths at or below
/// -0.5° are shifted up by a full turn first.
///
/// # Example
/// ```
/// use qmc_compass::heading::bearing;
///
/// assert_eq!(bearing(11.24), 0);
/// assert_eq!(bearing(11.26), 1);
/// assert_eq!(bearing(348.76), 0);
/// ```
pub fn bearing(azimuth: f64) -> u8 {
    let shifted = if azimuth > -0.5 {
        azimuth
    } else {
        azimuth + FULL_TURN
    };
    let sector = round_half_up(shifted / SECTOR_WIDTH) as i64;
    sector.rem_euclid(16) as u8
}

/// Direction label for a bearing, e.g. `"NNE"`
///
/// Bearings past 15 wrap around the rose.
pub fn direction(bearing: u8) -> &'static str {
    Direction::from_bearing(bearing).as_str()
}

/// One of the sixteen compass-rose points, clockwise from north
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
}

impl Direction {
    /// All points in bearing order
    pub const ALL: [Direction; 16] = [
        Direction::N,
        Direction::Nne,
        Direction::Ne,
        Direction::Ene,
        Direction::E,
        Direction::Ese,
        Direction::Se,
        Direction::Sse,
        Direction::S,
        Direction::Ssw,
        Direction::Sw,
        Direction::Wsw,
        Direction::W,
        Direction::Wnw,
        Direction::Nw,
        Direction::Nnw,
    ];

    pub fn from_bearing(bearing: u8) -> Self {
        Self::ALL[usize::from(bearing) % 16]
    }

    /// Direction containing `azimuth` degrees
    pub fn from_azimuth(azimuth: f64) -> Self {
        Self::from_bearing(bearing(azimuth))
    }

    pub fn bearing(self) -> u8 {
        self as u8
    }

    /// Centre of this sector in degrees
    pub fn center_degrees(self) -> f64 {
        f64::from(self.bearing()) * SECTOR_WIDTH
    }

    /// Label with the blank slots trimmed
    pub fn as_str(self) -> &'static str {
        let row = &BEARINGS[self as usize];
        let len = row.iter().position(|&c| c == b' ').unwrap_or(row.len());
        // Rows are ASCII letters and blanks, so any prefix is valid UTF-8
        core::str::from_utf8(&row[..len]).unwrap_or_default()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
