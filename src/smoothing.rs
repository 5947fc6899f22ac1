//! Moving-average smoothing of calibrated samples
//!
//! The filter keeps a fixed ring of up to ten samples and a running total
//! per axis. Each push overwrites the oldest slot, updates the totals and
//! returns either the plain or the trimmed mean of the window.

use crate::error::{Error, Result};
use crate::types::{ColdStart, MAX_SMOOTHING_STEPS, Smoothing, SmoothingMode};
use nalgebra::Vector3;

impl SmoothingMode {
    /// Average one axis of the window given its running total
    ///
    /// `window` holds the slots taking part in the average and is never
    /// empty.
    pub fn average(self, window: &[f64], total: f64) -> f64 {
        let count = window.len();
        match self {
            SmoothingMode::Trimmed if count > 2 => {
                let (max_index, min_index) = extreme_indices(window);
                (total - (window[max_index] + window[min_index])) / (count - 2) as f64
            }
            _ => total / count as f64,
        }
    }
}

/// Indices of the first maximum and the first minimum in `window`
fn extreme_indices(window: &[f64]) -> (usize, usize) {
    let mut max_index = 0;
    let mut min_index = 0;
    for (index, &value) in window.iter().enumerate() {
        if value > window[max_index] {
            max_index = index;
        }
        if value < window[min_index] {
            min_index = index;
        }
    }
    (max_index, min_index)
}

/// Clamp a requested step count into `1..=10`
pub fn clamp_steps(steps: usize) -> usize {
    steps.clamp(1, MAX_SMOOTHING_STEPS)
}

/// Ring-buffer moving average over calibrated X/Y/Z samples
///
/// A disabled filter passes samples straight through. An enabled filter
/// starts with every slot at zero; see [`ColdStart`] for how those slots are
/// treated until the ring has been filled once.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use qmc_compass::{SmoothingFilter, SmoothingMode};
///
/// let mut filter = SmoothingFilter::new();
/// filter.configure(2, SmoothingMode::Simple);
///
/// let sample = Vector3::new(10.0, -4.0, 2.0);
/// assert_eq!(filter.push(sample), Vector3::new(5.0, -2.0, 1.0)); // empty slot counts as zero
/// assert_eq!(filter.push(sample), sample);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SmoothingFilter {
    settings: Smoothing,
    history: [Vector3<f64>; MAX_SMOOTHING_STEPS],
    totals: Vector3<f64>,
    cursor: usize,
    filled: usize,
    output: Vector3<f64>,
}

impl SmoothingFilter {
    /// Disabled filter
    pub fn new() -> Self {
        Self {
            settings: Smoothing::Disabled,
            history: [Vector3::zeros(); MAX_SMOOTHING_STEPS],
            totals: Vector3::zeros(),
            cursor: 0,
            filled: 0,
            output: Vector3::zeros(),
        }
    }

    /// Enabled filter with a strictly validated step count
    ///
    /// # Errors
    /// [`Error::InvalidSmoothingSteps`] if `steps` is outside `1..=10`.
    pub fn try_new(steps: usize, mode: SmoothingMode) -> Result<Self> {
        if steps != clamp_steps(steps) {
            return Err(Error::InvalidSmoothingSteps(steps));
        }
        let mut filter = Self::new();
        filter.configure(steps, mode);
        Ok(filter)
    }

    /// Filter configured from settings
    pub fn with_settings(settings: Smoothing) -> Self {
        let mut filter = Self::new();
        filter.apply_settings(settings);
        filter
    }

    /// Enable smoothing over `steps` samples
    ///
    /// Out-of-range step counts are clamped into `1..=10`; the value
    /// actually used is returned. History, totals and the write cursor are
    /// reset. The current cold start policy is kept.
    pub fn configure(&mut self, steps: usize, mode: SmoothingMode) -> usize {
        let cold_start = match self.settings {
            Smoothing::Enabled { cold_start, .. } => cold_start,
            Smoothing::Disabled => ColdStart::default(),
        };
        self.configure_with(steps, mode, cold_start)
    }

    /// Enable smoothing with an explicit cold start policy
    pub fn configure_with(&mut self, steps: usize, mode: SmoothingMode, cold_start: ColdStart) -> usize {
        let clamped = clamp_steps(steps);
        if clamped != steps {
            log::warn!("smoothing steps {} out of range, clamped to {}", steps, clamped);
        }
        log::debug!("smoothing over {} steps, {:?}, {:?}", clamped, mode, cold_start);

        self.settings = Smoothing::Enabled {
            steps: clamped,
            mode,
            cold_start,
        };
        self.reset();
        clamped
    }

    /// Apply smoothing settings, returning the effective step count
    pub fn apply_settings(&mut self, settings: Smoothing) -> Option<usize> {
        match settings {
            Smoothing::Disabled => {
                self.disable();
                None
            }
            Smoothing::Enabled {
                steps,
                mode,
                cold_start,
            } => Some(self.configure_with(steps, mode, cold_start)),
        }
    }

    /// Switch to pass-through and drop the history
    pub fn disable(&mut self) {
        self.settings = Smoothing::Disabled;
        self.reset();
    }

    /// Clear history, totals and cursor while keeping the configuration
    pub fn reset(&mut self) {
        self.history = [Vector3::zeros(); MAX_SMOOTHING_STEPS];
        self.totals = Vector3::zeros();
        self.cursor = 0;
        self.filled = 0;
        self.output = Vector3::zeros();
    }

    /// Feed one calibrated sample and return the smoothed value
    pub fn push(&mut self, sample: Vector3<f64>) -> Vector3<f64> {
        let Smoothing::Enabled {
            steps,
            mode,
            cold_start,
        } = self.settings
        else {
            self.output = sample;
            return sample;
        };

        if self.cursor >= steps {
            self.cursor = 0;
        }
        self.filled = (self.filled + 1).min(steps);

        let slot = self.cursor;
        let window = match cold_start {
            ColdStart::ZeroPadded => steps,
            ColdStart::Partial => self.filled,
        };

        for axis in 0..3 {
            // A zero total is taken to mean an untouched ring, so the slot is
            // not subtracted. This differs from the true sum only when
            // readings of opposite sign cancel out exactly.
            if cold_start == ColdStart::Partial || self.totals[axis] != 0.0 {
                self.totals[axis] -= self.history[slot][axis];
            }
            self.history[slot][axis] = sample[axis];
            self.totals[axis] += sample[axis];

            let mut values = [0.0; MAX_SMOOTHING_STEPS];
            for (value, entry) in values.iter_mut().zip(&self.history[..window]) {
                *value = entry[axis];
            }
            self.output[axis] = mode.average(&values[..window], self.totals[axis]);
        }

        self.cursor += 1;
        self.output
    }

    /// Last value returned by [`push`](Self::push)
    pub fn output(&self) -> Vector3<f64> {
        self.output
    }

    /// Running per-axis totals of the ring
    pub fn totals(&self) -> Vector3<f64> {
        self.totals
    }

    pub fn settings(&self) -> Smoothing {
        self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.is_enabled()
    }

    /// Effective window size, `None` when disabled
    pub fn steps(&self) -> Option<usize> {
        match self.settings {
            Smoothing::Enabled { steps, .. } => Some(steps),
            Smoothing::Disabled => None,
        }
    }

    /// Slots written since the last reset, capped at the window size
    pub fn filled(&self) -> usize {
        self.filled
    }
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_only(value: f64) -> Vector3<f64> {
        Vector3::new(value, 0.0, 0.0)
    }

    #[test]
    fn test_disabled_is_pass_through() {
        let mut filter = SmoothingFilter::new();
        let sample = Vector3::new(1.5, -2.5, 3.5);
        assert_eq!(filter.push(sample), sample);
        assert_eq!(filter.output(), sample);
        assert_eq!(filter.steps(), None);
        assert_eq!(filter.totals(), Vector3::zeros());
    }

    #[test]
    fn test_configure_clamps_steps() {
        let mut filter = SmoothingFilter::new();
        assert_eq!(filter.configure(25, SmoothingMode::Simple), 10);
        assert_eq!(filter.steps(), Some(10));
        assert_eq!(filter.configure(0, SmoothingMode::Simple), 1);
        assert_eq!(filter.steps(), Some(1));
        assert_eq!(filter.configure(7, SmoothingMode::Trimmed), 7);
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert_eq!(
            SmoothingFilter::try_new(0, SmoothingMode::Simple).err(),
            Some(Error::InvalidSmoothingSteps(0))
        );
        assert_eq!(
            SmoothingFilter::try_new(11, SmoothingMode::Simple).err(),
            Some(Error::InvalidSmoothingSteps(11))
        );
        let filter = SmoothingFilter::try_new(10, SmoothingMode::Trimmed).unwrap();
        assert_eq!(filter.steps(), Some(10));
    }

    #[test]
    fn test_constant_stream_converges_after_steps() {
        let sample = Vector3::new(7.25, -3.5, 120.0);
        let mut filter = SmoothingFilter::new();
        filter.configure(4, SmoothingMode::Simple);

        for _ in 0..3 {
            assert_ne!(filter.push(sample), sample);
        }
        assert_eq!(filter.push(sample), sample);
        // Steady state once the ring has wrapped
        for _ in 0..10 {
            assert_eq!(filter.push(sample), sample);
        }
    }

    #[test]
    fn test_cold_start_ramps_from_zero() {
        let mut filter = SmoothingFilter::new();
        filter.configure(4, SmoothingMode::Simple);

        assert_eq!(filter.push(x_only(8.0)).x, 2.0);
        assert_eq!(filter.push(x_only(8.0)).x, 4.0);
        assert_eq!(filter.push(x_only(8.0)).x, 6.0);
        assert_eq!(filter.push(x_only(8.0)).x, 8.0);
    }

    #[test]
    fn test_partial_cold_start_uses_filled_slots() {
        let mut filter = SmoothingFilter::new();
        filter.configure_with(4, SmoothingMode::Simple, ColdStart::Partial);

        assert_eq!(filter.push(x_only(8.0)).x, 8.0);
        assert_eq!(filter.push(x_only(4.0)).x, 6.0);
        assert_eq!(filter.filled(), 2);
        filter.push(x_only(0.0));
        filter.push(x_only(0.0));
        assert_eq!(filter.filled(), 4);
        // Ring wrapped, the 8.0 falls out
        assert_eq!(filter.push(x_only(0.0)).x, 1.0);
    }

    #[test]
    fn test_moving_window_drops_oldest() {
        let mut filter = SmoothingFilter::new();
        filter.configure(3, SmoothingMode::Simple);

        for value in [3.0, 6.0, 9.0] {
            filter.push(x_only(value));
        }
        assert_eq!(filter.output().x, 6.0);
        assert_eq!(filter.push(x_only(12.0)).x, 9.0);
        assert_eq!(filter.totals().x, 27.0);
    }

    #[test]
    fn test_trimmed_excludes_one_high_and_one_low() {
        let mut filter = SmoothingFilter::new();
        filter.configure(5, SmoothingMode::Trimmed);

        for value in [1.0, 2.0, 3.0, 4.0, 100.0] {
            filter.push(x_only(value));
        }
        // (1 + 2 + 3 + 4 + 100 - 100 - 1) / 3
        assert_eq!(filter.output().x, 3.0);
        assert_eq!(filter.totals().x, 110.0);
    }

    #[test]
    fn test_trimmed_counts_zero_placeholders() {
        let mut filter = SmoothingFilter::new();
        filter.configure(4, SmoothingMode::Trimmed);

        // Window [9, 0, 0, 0]: drop 9 and one 0, average the other two zeros
        assert_eq!(filter.push(x_only(9.0)).x, 0.0);
        // Window [9, 3, 0, 0]: drop 9 and a 0 -> (3 + 0) / 2
        assert_eq!(filter.push(x_only(3.0)).x, 1.5);
    }

    #[test]
    fn test_trimmed_small_window_falls_back_to_mean() {
        let mut filter = SmoothingFilter::new();
        filter.configure(2, SmoothingMode::Trimmed);

        filter.push(x_only(10.0));
        assert_eq!(filter.push(x_only(20.0)).x, 15.0);

        filter.configure(1, SmoothingMode::Trimmed);
        assert_eq!(filter.push(x_only(-4.0)).x, -4.0);
    }

    #[test]
    fn test_trimmed_ties_drop_single_sample() {
        let window = [5.0, 5.0, 1.0, 1.0];
        assert_eq!(extreme_indices(&window), (0, 2));
        assert_eq!(SmoothingMode::Trimmed.average(&window, 12.0), 3.0);
    }

    #[test]
    fn test_zero_total_skips_subtraction() {
        let mut filter = SmoothingFilter::new();
        filter.configure(2, SmoothingMode::Simple);

        filter.push(x_only(5.0));
        assert_eq!(filter.push(x_only(-5.0)).x, 0.0);
        // Total is exactly zero, so the 5.0 being overwritten is not removed
        assert_eq!(filter.push(x_only(3.0)).x, 1.5);
        assert_eq!(filter.totals().x, 3.0);
    }

    #[test]
    fn test_partial_cold_start_always_subtracts() {
        let mut filter = SmoothingFilter::new();
        filter.configure_with(2, SmoothingMode::Simple, ColdStart::Partial);

        filter.push(x_only(5.0));
        filter.push(x_only(-5.0));
        assert_eq!(filter.push(x_only(3.0)).x, -1.0);
    }

    #[test]
    fn test_axes_are_independent() {
        let mut filter = SmoothingFilter::new();
        filter.configure(2, SmoothingMode::Simple);

        filter.push(Vector3::new(2.0, 4.0, 6.0));
        let output = filter.push(Vector3::new(4.0, 8.0, -6.0));
        assert_eq!(output, Vector3::new(3.0, 6.0, 0.0));
    }

    #[test]
    fn test_reconfigure_discards_history() {
        let mut filter = SmoothingFilter::new();
        filter.configure(3, SmoothingMode::Simple);
        filter.push(x_only(30.0));
        filter.push(x_only(30.0));

        filter.configure(3, SmoothingMode::Simple);
        assert_eq!(filter.totals(), Vector3::zeros());
        assert_eq!(filter.filled(), 0);
        assert_eq!(filter.push(x_only(3.0)).x, 1.0);
    }

    #[test]
    fn test_configure_keeps_cold_start_policy() {
        let mut filter = SmoothingFilter::new();
        filter.configure_with(3, SmoothingMode::Simple, ColdStart::Partial);
        filter.configure(5, SmoothingMode::Trimmed);
        assert_eq!(
            filter.settings(),
            Smoothing::Enabled {
                steps: 5,
                mode: SmoothingMode::Trimmed,
                cold_start: ColdStart::Partial,
            }
        );
    }

    #[test]
    fn test_apply_settings() {
        let mut filter = SmoothingFilter::with_settings(Smoothing::enabled(12, SmoothingMode::Simple));
        assert_eq!(filter.steps(), Some(10));

        assert_eq!(filter.apply_settings(Smoothing::Disabled), None);
        assert!(!filter.is_enabled());
        let sample = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(filter.push(sample), sample);
    }
}
