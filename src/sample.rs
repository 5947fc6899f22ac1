//! Raw sample decoding
//!
//! The QMC5883L family returns X, Y and Z as three little-endian 16-bit
//! two's-complement words starting at output register 0x00.

use crate::error::{Error, FRAME_LENGTH, Result};
use nalgebra::Vector3;

/// One raw X/Y/Z reading in sensor counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl RawSample {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Decode a raw output frame
    ///
    /// Takes the first six bytes of `bytes` as `[x_lsb, x_msb, y_lsb, y_msb,
    /// z_lsb, z_msb]`. Anything past the sixth byte is ignored.
    ///
    /// # Errors
    /// [`Error::InvalidFrameLength`] if fewer than six bytes are supplied.
    ///
    /// # Example
    /// ```
    /// use qmc_compass::RawSample;
    ///
    /// let sample = RawSample::from_le_bytes(&[0x00, 0x00, 0x64, 0x00, 0x18, 0xFC]).unwrap();
    /// assert_eq!(sample, RawSample::new(0, 100, -1000));
    /// ```
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self> {
        let frame: &[u8; FRAME_LENGTH] = bytes
            .get(..FRAME_LENGTH)
            .and_then(|head| head.try_into().ok())
            .ok_or(Error::InvalidFrameLength {
                expected: FRAME_LENGTH,
                actual: bytes.len(),
            })?;

        let sample = Self::from(*frame);
        log::trace!("decoded raw sample {:?}", sample);
        Ok(sample)
    }

    /// Reading as a floating point vector
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }

    /// Reading as an `[x, y, z]` array
    pub const fn to_array(self) -> [i16; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[u8; FRAME_LENGTH]> for RawSample {
    fn from(frame: [u8; FRAME_LENGTH]) -> Self {
        Self {
            x: to_signed(u16::from_le_bytes([frame[0], frame[1]])),
            y: to_signed(u16::from_le_bytes([frame[2], frame[3]])),
            z: to_signed(u16::from_le_bytes([frame[4], frame[5]])),
        }
    }
}

impl From<(i16, i16, i16)> for RawSample {
    fn from((x, y, z): (i16, i16, i16)) -> Self {
        Self { x, y, z }
    }
}

impl From<[i16; 3]> for RawSample {
    fn from([x, y, z]: [i16; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Reinterpret an unsigned register word as two's-complement
///
/// Values at or above 32768 map to `value - 65536`.
pub const fn to_signed(value: u16) -> i16 {
    value as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_signed_matches_twos_complement() {
        for value in (0..=u16::MAX).step_by(97).chain([0, 1, 32767, 32768, 65535]) {
            let expected = if value < 32768 {
                i32::from(value)
            } else {
                i32::from(value) - 65536
            };
            assert_eq!(i32::from(to_signed(value)), expected, "value {}", value);
        }
    }

    #[test]
    fn test_decode_axis_order_and_endianness() {
        let sample = RawSample::from([0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        assert_eq!(sample.x, 0x0201);
        assert_eq!(sample.y, 0x0403);
        assert_eq!(sample.z, 0x0605);
    }

    #[test]
    fn test_decode_negative_values() {
        let sample = RawSample::from([0xFF, 0xFF, 0x00, 0x80, 0xFF, 0x7F]);
        assert_eq!(sample, RawSample::new(-1, i16::MIN, i16::MAX));
    }

    #[test]
    fn test_short_frame_rejected() {
        for length in 0..FRAME_LENGTH {
            let bytes = [0u8; FRAME_LENGTH];
            assert_eq!(
                RawSample::from_le_bytes(&bytes[..length]),
                Err(Error::InvalidFrameLength {
                    expected: FRAME_LENGTH,
                    actual: length,
                })
            );
        }
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let bytes = [0x0A, 0x00, 0x14, 0x00, 0x1E, 0x00, 0xAA, 0xBB];
        assert_eq!(
            RawSample::from_le_bytes(&bytes),
            Ok(RawSample::new(10, 20, 30))
        );
    }

    #[test]
    fn test_to_vector() {
        let v = RawSample::new(-5, 0, 7).to_vector();
        assert_eq!(v, Vector3::new(-5.0, 0.0, 7.0));
    }
}
