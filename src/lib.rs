#![no_std]

//! QMC Compass - calibration, smoothing and heading for three-axis magnetometers
//!
//! Turns raw X/Y/Z magnetometer frames (QMC5883L and compatible parts) into a
//! stable compass heading. The bus transport and device configuration stay
//! with the caller; this crate only does the numbers.
//!
//! # Features
//!
//! - Two's-complement decoding of the 6-byte X/Y/Z output frame
//! - Hard-iron offset and soft-iron scale calibration from rotation extremes
//! - Pull-based calibration over any sample iterator, no clock required
//! - Plain or outlier-trimmed moving-average smoothing (up to 10 samples)
//! - Azimuth with magnetic declination, 16-point bearing and direction label
//! - `#![no_std]` compatible and allocation free
//!
//! # Quick Start
//!
//! ```rust
//! use qmc_compass::{Compass, RawSample};
//!
//! let mut compass = Compass::new();
//! compass.set_magnetic_declination(2.0, 30.0);
//! compass.set_smoothing(5, true);
//!
//! // Rotate the sensor through a full turn while collecting readings
//! let rotation = [
//!     RawSample::new(-180, 20, 40),
//!     RawSample::new(220, 20, 40),
//!     RawSample::new(20, -230, 40),
//!     RawSample::new(20, 270, 40),
//! ];
//! compass.calibrate(rotation).unwrap();
//!
//! // Each read cycle: raw bytes from the bus in, heading out
//! compass.read_bytes(&[0xDC, 0x00, 0x14, 0x00, 0x28, 0x00]).unwrap();
//! let azimuth = compass.azimuth();
//! let direction = compass.direction();
//! # let _ = (azimuth, direction);
//! ```

pub mod calibration;
mod compass;
mod error;
pub mod heading;
mod math;
pub mod sample;
pub mod smoothing;
mod types;

// Re-export all public types and functions
pub use calibration::{CalibrationEstimator, CalibrationModel, Extremes};
pub use compass::Compass;
pub use error::{Error, FRAME_LENGTH, Result};
pub use heading::{Direction, azimuth, bearing, direction};
pub use math::wrap_degrees;
pub use sample::RawSample;
pub use smoothing::SmoothingFilter;
pub use types::*;
