//! Warm-up buffer producing a frozen baseline for one analysis run.

/// Number of samples averaged into a baseline.
pub const CALIBRATION_WINDOW: usize = 10;

/// Collects the first `CALIBRATION_WINDOW` finite samples of a reference
/// coordinate, then permanently caches their mean.
///
/// The mean is kept incrementally, so a constant stream reproduces the
/// constant exactly.
#[derive(Debug, Clone, Default)]
pub struct CalibrationBuffer {
    count: usize,
    mean: f64,
    baseline: Option<f64>,
}

impl CalibrationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample. Returns `None` while collecting and the frozen
    /// baseline from the `CALIBRATION_WINDOW`-th sample onward.
    ///
    /// Non-finite samples are ignored and do not count toward the window.
    pub fn observe(&mut self, value: f64) -> Option<f64> {
        if self.baseline.is_some() {
            return self.baseline;
        }
        if !value.is_finite() {
            return None;
        }
        self.count += 1;
        self.mean += (value - self.mean) / self.count as f64;
        if self.count == CALIBRATION_WINDOW {
            self.baseline = Some(self.mean);
            self.count = 0;
            tracing::debug!(baseline = self.mean, "calibration complete");
        }
        self.baseline
    }

    #[inline]
    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    #[inline]
    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    /// Samples collected so far (0 once calibrated).
    #[inline]
    pub fn pending(&self) -> usize {
        self.count
    }
}
