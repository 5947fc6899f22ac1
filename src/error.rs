//! Error types for the compass pipeline

use core::fmt;

/// Number of bytes in one X/Y/Z output frame
pub const FRAME_LENGTH: usize = 6;

/// Result type for compass operations
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by the compass pipeline
///
/// Every condition is detected synchronously from the inputs; nothing here
/// talks to hardware, so there is no retry concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Raw output frame was shorter than the six bytes of an X/Y/Z triple
    InvalidFrameLength {
        /// Bytes required
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },
    /// Smoothing step count outside `1..=10`
    ///
    /// Only returned by strict constructors. Lenient configuration clamps
    /// the value instead.
    InvalidSmoothingSteps(usize),
    /// Calibration was asked to finish without having seen a single sample
    NoSamples,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidFrameLength { expected, actual } => write!(
                f,
                "invalid frame length: expected {} bytes, got {}",
                expected, actual
            ),
            Error::InvalidSmoothingSteps(steps) => {
                write!(f, "smoothing steps must be in 1..=10, got {}", steps)
            }
            Error::NoSamples => write!(f, "calibration finished without any samples"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn test_display_messages() {
        let error = Error::InvalidFrameLength {
            expected: FRAME_LENGTH,
            actual: 4,
        };
        assert_eq!(
            error.to_string(),
            "invalid frame length: expected 6 bytes, got 4"
        );
        assert_eq!(
            Error::InvalidSmoothingSteps(0).to_string(),
            "smoothing steps must be in 1..=10, got 0"
        );
        assert_eq!(
            Error::NoSamples.to_string(),
            "calibration finished without any samples"
        );
    }
}
