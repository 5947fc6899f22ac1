//! Core types and settings for the compass pipeline

/// Largest smoothing window the filter supports
pub const MAX_SMOOTHING_STEPS: usize = 10;

/// Sensor axis selector
///
/// # Example
/// ```
/// use qmc_compass::{Axis, Compass};
///
/// let mut compass = Compass::new();
/// compass.set_calibration_offsets(10.0, 20.0, 30.0);
/// assert_eq!(compass.calibration_offset(Axis::Y), 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// All axes in X, Y, Z order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis in a `Vector3`
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Magnetic declination for the current location
///
/// Expressed the way declination charts print it: whole degrees plus
/// optional arc-minutes. East declination is positive.
///
/// # Example
/// ```
/// use qmc_compass::Declination;
///
/// let declination = Declination::new(11.0, 30.0);
/// assert_eq!(declination.to_degrees(), 11.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Declination {
    /// Whole degrees
    pub degrees: f64,
    /// Arc-minutes, added on top of `degrees`
    pub minutes: f64,
}

impl Declination {
    pub const fn new(degrees: f64, minutes: f64) -> Self {
        Self { degrees, minutes }
    }

    /// Declination in decimal degrees (`degrees + minutes / 60`)
    pub fn to_degrees(self) -> f64 {
        self.degrees + self.minutes / 60.0
    }
}

/// Averaging strategy applied over the smoothing window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothingMode {
    /// Plain moving average: `total / steps`
    #[default]
    Simple,
    /// Moving average with the single highest and lowest sample dropped
    ///
    /// Falls back to the plain average when the window has two or fewer
    /// slots.
    Trimmed,
}

impl SmoothingMode {
    /// Map the driver-style "advanced" flag onto a mode
    pub const fn from_advanced(advanced: bool) -> Self {
        if advanced {
            SmoothingMode::Trimmed
        } else {
            SmoothingMode::Simple
        }
    }
}

/// How slots that have not been written since (re)configuration are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColdStart {
    /// Unwritten slots count as zero and the divisor is always the full
    /// window, so the output ramps up from zero over the first `steps`
    /// pushes. This is the historical QMC5883L driver behavior and existing
    /// calibration workflows are tuned against it.
    #[default]
    ZeroPadded,
    /// Only written slots take part; the divisor grows with the fill level
    Partial,
}

/// Smoothing configuration
///
/// # Example
/// ```
/// use qmc_compass::{Smoothing, SmoothingMode};
///
/// let smoothing = Smoothing::enabled(5, SmoothingMode::Trimmed);
/// assert!(smoothing.is_enabled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Smoothing {
    /// Pass-through, no history is kept
    #[default]
    Disabled,
    /// Moving average over `steps` samples (clamped to `1..=10`)
    Enabled {
        steps: usize,
        mode: SmoothingMode,
        cold_start: ColdStart,
    },
}

impl Smoothing {
    /// Enabled smoothing with the default zero-padded cold start
    pub const fn enabled(steps: usize, mode: SmoothingMode) -> Self {
        Smoothing::Enabled {
            steps,
            mode,
            cold_start: ColdStart::ZeroPadded,
        }
    }

    pub const fn is_enabled(&self) -> bool {
        matches!(self, Smoothing::Enabled { .. })
    }
}

/// Compass session settings
///
/// # Example
/// ```
/// use qmc_compass::{Compass, CompassSettings, Declination, Smoothing, SmoothingMode};
///
/// let settings = CompassSettings {
///     declination: Declination::new(-3.0, 45.0),
///     smoothing: Smoothing::enabled(8, SmoothingMode::Simple),
/// };
/// let compass = Compass::with_settings(settings);
/// assert_eq!(compass.smoothing_steps(), Some(8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompassSettings {
    /// Magnetic declination added to every azimuth
    pub declination: Declination,
    /// Temporal smoothing of calibrated samples
    pub smoothing: Smoothing,
}
