//! Hard-iron and soft-iron calibration for the magnetometer
//!
//! The model is a per-axis offset followed by a per-axis scale:
//! `calibrated = (raw - offset) * scale`. It is estimated from the extremes
//! seen while the sensor is rotated through a full turn. The offset is the
//! centre of the bounding box and the scale stretches every axis to the mean
//! half-range, which turns the ellipse traced by a distorted sensor back into
//! an approximate circle without a full ellipsoid fit.

use crate::error::{Error, Result};
use crate::sample::RawSample;
use crate::types::Axis;
use nalgebra::Vector3;

/// Per-axis hard-iron offset and soft-iron scale
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use qmc_compass::{CalibrationModel, RawSample};
///
/// // Half ranges 100, 200 and 300 average to 200
/// let model = CalibrationModel::from_extremes(-100.0, 100.0, -150.0, 250.0, -300.0, 300.0);
/// assert_eq!(model.offset(), Vector3::new(0.0, 50.0, 0.0));
///
/// let calibrated = model.apply(RawSample::new(100, 250, 0));
/// assert_eq!(calibrated, Vector3::new(200.0, 200.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationModel {
    offset: Vector3<f64>,
    scale: Vector3<f64>,
}

impl CalibrationModel {
    /// Pass-through calibration: zero offset, unit scale
    pub fn new() -> Self {
        Self {
            offset: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
        }
    }

    /// Build a model from explicit offset and scale vectors
    pub fn from_parts(offset: Vector3<f64>, scale: Vector3<f64>) -> Self {
        Self { offset, scale }
    }

    /// Derive a model from the per-axis extremes of a calibration pass
    ///
    /// Axes whose minimum equals their maximum keep a scale of 1.0.
    pub fn from_extremes(
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        z_min: f64,
        z_max: f64,
    ) -> Self {
        Extremes::from_bounds(
            Vector3::new(x_min, y_min, z_min),
            Vector3::new(x_max, y_max, z_max),
        )
        .to_model()
    }

    /// Apply the calibration to a raw reading
    pub fn apply(&self, raw: RawSample) -> Vector3<f64> {
        (raw.to_vector() - self.offset).component_mul(&self.scale)
    }

    /// Overwrite the hard-iron offsets
    pub fn set_offsets(&mut self, x: f64, y: f64, z: f64) {
        self.offset = Vector3::new(x, y, z);
    }

    /// Overwrite the soft-iron scales
    ///
    /// No validation: a zero scale collapses every reading on that axis to
    /// zero, which is allowed.
    pub fn set_scales(&mut self, x: f64, y: f64, z: f64) {
        self.scale = Vector3::new(x, y, z);
    }

    /// Reset to pass-through calibration
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn offset(&self) -> Vector3<f64> {
        self.offset
    }

    pub fn scale(&self) -> Vector3<f64> {
        self.scale
    }

    pub fn axis_offset(&self, axis: Axis) -> f64 {
        self.offset[axis.index()]
    }

    pub fn axis_scale(&self, axis: Axis) -> f64 {
        self.scale[axis.index()]
    }
}

impl Default for CalibrationModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-axis minimum and maximum seen during a calibration pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremes {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl Extremes {
    /// Extremes seeded from a single reading
    pub fn from_sample(sample: RawSample) -> Self {
        let v = sample.to_vector();
        Self { min: v, max: v }
    }

    pub fn from_bounds(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    /// Widen the extremes to include `sample`
    pub fn include(&mut self, sample: RawSample) {
        let v = sample.to_vector();
        self.min = self.min.inf(&v);
        self.max = self.max.sup(&v);
    }

    /// Bounding box centre per axis
    pub fn midpoint(&self) -> Vector3<f64> {
        (self.min + self.max) / 2.0
    }

    /// Bounding box half-range per axis
    pub fn half_range(&self) -> Vector3<f64> {
        (self.max - self.min) / 2.0
    }

    /// Axes that did not vary at all
    pub fn degenerate_axes(&self) -> [bool; 3] {
        let delta = self.half_range();
        [delta.x == 0.0, delta.y == 0.0, delta.z == 0.0]
    }

    /// Convert the extremes into a calibration model
    pub fn to_model(&self) -> CalibrationModel {
        let delta = self.half_range();
        let average_delta = (delta.x + delta.y + delta.z) / 3.0;

        let scale = delta.map(|d| if d != 0.0 { average_delta / d } else { 1.0 });

        for (axis, degenerate) in Axis::ALL.into_iter().zip(self.degenerate_axes()) {
            if degenerate {
                log::warn!("{:?} axis had no spread during calibration, scale left at 1.0", axis);
            }
        }

        CalibrationModel::from_parts(self.midpoint(), scale)
    }
}

/// Streaming min/max tracker that produces a [`CalibrationModel`]
///
/// The estimator never waits on a clock. Feed it samples for as long as the
/// calibration should run, then call [`finish`](Self::finish). Stopping early
/// simply finalizes with the extremes gathered so far.
///
/// # Example
/// ```
/// use qmc_compass::{CalibrationEstimator, RawSample};
///
/// let mut estimator = CalibrationEstimator::new();
/// estimator.update(RawSample::new(-100, -50, 10));
/// estimator.update(RawSample::new(100, 150, 10));
///
/// let model = estimator.finish().unwrap();
/// assert_eq!(model.offset().x, 0.0);
/// assert_eq!(model.offset().y, 50.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CalibrationEstimator {
    extremes: Option<Extremes>,
    samples: u32,
}

impl CalibrationEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a full calibration pass over `samples`
    ///
    /// Bound the source (`take`, `take_while` on a deadline, a finite
    /// buffer) to bound the calibration time.
    ///
    /// # Errors
    /// [`Error::NoSamples`] if the source yields nothing.
    pub fn estimate<I>(samples: I) -> Result<CalibrationModel>
    where
        I: IntoIterator<Item = RawSample>,
    {
        let mut estimator = Self::new();
        samples.into_iter().for_each(|sample| estimator.update(sample));
        estimator.finish()
    }

    /// Track one more reading
    ///
    /// The first reading seeds both minimum and maximum.
    pub fn update(&mut self, sample: RawSample) {
        match &mut self.extremes {
            Some(extremes) => extremes.include(sample),
            None => self.extremes = Some(Extremes::from_sample(sample)),
        }
        self.samples = self.samples.saturating_add(1);
    }

    /// Extremes gathered so far
    pub fn extremes(&self) -> Option<Extremes> {
        self.extremes
    }

    /// Number of readings tracked so far
    pub fn sample_count(&self) -> u32 {
        self.samples
    }

    /// Finalize the pass into a calibration model
    ///
    /// # Errors
    /// [`Error::NoSamples`] if no reading was tracked.
    pub fn finish(&self) -> Result<CalibrationModel> {
        let extremes = self.extremes.ok_or(Error::NoSamples)?;
        let model = extremes.to_model();
        log::debug!(
            "calibration finished after {} samples: offset {:?}, scale {:?}",
            self.samples,
            model.offset().as_slice(),
            model.scale().as_slice()
        );
        Ok(model)
    }

    /// Forget everything tracked so far
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
