//! Compass session tying decode, calibration, smoothing and heading together

use crate::calibration::{CalibrationEstimator, CalibrationModel};
use crate::error::Result;
use crate::heading::{self, Direction};
use crate::math::truncate;
use crate::sample::RawSample;
use crate::smoothing::SmoothingFilter;
use crate::types::{Axis, CompassSettings, Declination, Smoothing, SmoothingMode};
use nalgebra::Vector3;

/// One magnetometer session
///
/// Owns the calibration model, the smoothing history and the declination
/// for a single sensor. Each read cycle decodes a raw frame, applies the
/// calibration and, when enabled, the smoothing filter. The heading getters
/// then work from the latest output.
///
/// There is no internal locking; share a session between threads only
/// behind the caller's own synchronization.
///
/// # Example
/// ```
/// use qmc_compass::{Compass, Direction};
///
/// let mut compass = Compass::new();
/// compass.read_bytes(&[0x00, 0x00, 0x64, 0x00, 0x00, 0x00]).unwrap();
///
/// assert_eq!(compass.y(), 100);
/// assert_eq!(compass.azimuth(), 90);
/// assert_eq!(compass.bearing(), 4);
/// assert_eq!(compass.direction(), Direction::E);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Compass {
    declination: Declination,
    calibration: CalibrationModel,
    filter: SmoothingFilter,
    raw: RawSample,
    calibrated: Vector3<f64>,
}

impl Compass {
    /// Session with pass-through calibration, no smoothing and no declination
    pub fn new() -> Self {
        Self::with_settings(CompassSettings::default())
    }

    pub fn with_settings(settings: CompassSettings) -> Self {
        let mut compass = Self {
            declination: Declination::default(),
            calibration: CalibrationModel::new(),
            filter: SmoothingFilter::new(),
            raw: RawSample::default(),
            calibrated: Vector3::zeros(),
        };
        compass.set_settings(settings);
        compass
    }

    /// Replace declination and smoothing settings
    ///
    /// Smoothing history is discarded. Calibration is left untouched.
    pub fn set_settings(&mut self, settings: CompassSettings) {
        self.declination = settings.declination;
        self.filter.apply_settings(settings.smoothing);
    }

    /// Current settings, with the smoothing step count as actually applied
    pub fn get_settings(&self) -> CompassSettings {
        CompassSettings {
            declination: self.declination,
            smoothing: self.filter.settings(),
        }
    }

    /// Run one read cycle on a raw output frame
    ///
    /// # Errors
    /// [`Error::InvalidFrameLength`](crate::Error::InvalidFrameLength) if
    /// fewer than six bytes are supplied. The session state is unchanged in
    /// that case.
    pub fn read_bytes(&mut self, bytes: &[u8]) -> Result<RawSample> {
        let sample = RawSample::from_le_bytes(bytes)?;
        self.read_sample(sample);
        Ok(sample)
    }

    /// Run one read cycle on an already decoded sample
    ///
    /// Returns the calibrated and, if enabled, smoothed reading.
    pub fn read_sample(&mut self, sample: RawSample) -> Vector3<f64> {
        self.raw = sample;
        self.calibrated = self.calibration.apply(sample);
        self.filter.push(self.calibrated)
    }

    /// Latest raw reading
    pub fn raw(&self) -> RawSample {
        self.raw
    }

    /// Latest calibrated reading, before smoothing
    pub fn calibrated(&self) -> Vector3<f64> {
        self.calibrated
    }

    /// Latest output: smoothed when smoothing is enabled, calibrated otherwise
    pub fn output(&self) -> Vector3<f64> {
        if self.filter.is_enabled() {
            self.filter.output()
        } else {
            self.calibrated
        }
    }

    /// Output on one axis, truncated toward zero
    pub fn axis(&self, axis: Axis) -> i32 {
        truncate(self.output()[axis.index()])
    }

    pub fn x(&self) -> i32 {
        self.axis(Axis::X)
    }

    pub fn y(&self) -> i32 {
        self.axis(Axis::Y)
    }

    pub fn z(&self) -> i32 {
        self.axis(Axis::Z)
    }

    /// Truncated `[x, y, z]` output
    pub fn magnet(&self) -> [i32; 3] {
        Axis::ALL.map(|axis| self.axis(axis))
    }

    /// Heading in degrees, `[0, 360)`
    ///
    /// Computed from the truncated X and Y outputs, so it matches what a
    /// caller would get from [`x`](Self::x) and [`y`](Self::y).
    pub fn azimuth_degrees(&self) -> f64 {
        heading::azimuth(
            f64::from(self.x()),
            f64::from(self.y()),
            self.declination.to_degrees(),
        )
    }

    /// Heading in whole degrees, `0..=359`
    pub fn azimuth(&self) -> i32 {
        truncate(self.azimuth_degrees())
    }

    /// Compass-rose sector of the current heading, `0..=15`
    pub fn bearing(&self) -> u8 {
        self.bearing_for(f64::from(self.azimuth()))
    }

    /// Compass-rose sector of an explicit azimuth
    pub fn bearing_for(&self, azimuth: f64) -> u8 {
        heading::bearing(azimuth)
    }

    /// Compass-rose point of the current heading
    pub fn direction(&self) -> Direction {
        self.direction_for(f64::from(self.azimuth()))
    }

    /// Compass-rose point of an explicit azimuth
    pub fn direction_for(&self, azimuth: f64) -> Direction {
        Direction::from_azimuth(azimuth)
    }

    /// Set declination from degrees and arc-minutes
    pub fn set_magnetic_declination(&mut self, degrees: f64, minutes: f64) {
        self.declination = Declination::new(degrees, minutes);
    }

    /// Declination in decimal degrees
    pub fn magnetic_declination(&self) -> f64 {
        self.declination.to_degrees()
    }

    /// Enable smoothing; `advanced` drops the highest and lowest sample
    ///
    /// Returns the step count actually used after clamping into `1..=10`.
    pub fn set_smoothing(&mut self, steps: usize, advanced: bool) -> usize {
        self.filter.configure(steps, SmoothingMode::from_advanced(advanced))
    }

    /// Apply full smoothing settings, including the cold start policy
    pub fn set_smoothing_settings(&mut self, smoothing: Smoothing) -> Option<usize> {
        self.filter.apply_settings(smoothing)
    }

    pub fn disable_smoothing(&mut self) {
        self.filter.disable();
    }

    /// Effective smoothing window, `None` when smoothing is off
    pub fn smoothing_steps(&self) -> Option<usize> {
        self.filter.steps()
    }

    /// Derive calibration from per-axis extremes
    pub fn set_calibration(
        &mut self,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        z_min: f64,
        z_max: f64,
    ) {
        self.calibration = CalibrationModel::from_extremes(x_min, x_max, y_min, y_max, z_min, z_max);
    }

    pub fn set_calibration_offsets(&mut self, x: f64, y: f64, z: f64) {
        self.calibration.set_offsets(x, y, z);
    }

    pub fn set_calibration_scales(&mut self, x: f64, y: f64, z: f64) {
        self.calibration.set_scales(x, y, z);
    }

    pub fn set_calibration_model(&mut self, model: CalibrationModel) {
        self.calibration = model;
    }

    pub fn calibration(&self) -> &CalibrationModel {
        &self.calibration
    }

    pub fn calibration_offset(&self, axis: Axis) -> f64 {
        self.calibration.axis_offset(axis)
    }

    pub fn calibration_scale(&self, axis: Axis) -> f64 {
        self.calibration.axis_scale(axis)
    }

    /// Reset to pass-through calibration
    pub fn clear_calibration(&mut self) {
        self.calibration.clear();
    }

    /// Calibrate from a stream of raw readings taken while rotating the sensor
    ///
    /// The current calibration is cleared first. The pass lasts as long as
    /// `samples` keeps yielding; bound it with `take` or `take_while` on a
    /// deadline.
    ///
    /// # Errors
    /// [`Error::NoSamples`](crate::Error::NoSamples) if `samples` is empty,
    /// in which case the session is left with pass-through calibration.
    pub fn calibrate<I>(&mut self, samples: I) -> Result<CalibrationModel>
    where
        I: IntoIterator<Item = RawSample>,
    {
        self.clear_calibration();
        let model = CalibrationEstimator::estimate(samples)?;
        self.calibration = model;
        Ok(model)
    }
}

impl Default for Compass {
    fn default() -> Self {
        Self::new()
    }
}
