//! Repetition phase state machine driven by the calibrated ear height.

use serde::Serialize;

use crate::calibration::CalibrationBuffer;

/// Rebound band: the ear must rise 2% above the deepest point seen before
/// the descent counts as turned around.
pub const REBOUND_FACTOR: f64 = 0.98;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseState {
    #[default]
    Idle,
    Descending,
    Ascending,
    Completed,
}

impl PhaseState {
    /// Phases in which the deviation classifiers run.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, PhaseState::Descending | PhaseState::Ascending)
    }

    pub fn name(self) -> &'static str {
        match self {
            PhaseState::Idle => "idle",
            PhaseState::Descending => "descending",
            PhaseState::Ascending => "ascending",
            PhaseState::Completed => "completed",
        }
    }
}

/// Result of feeding one ear sample to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseUpdate {
    /// Baseline still warming up; no phase logic ran.
    Uncalibrated,
    Steady(PhaseState),
    Transition { from: PhaseState, to: PhaseState },
}

#[derive(Debug, Clone)]
pub struct PhaseDetector {
    calibration: CalibrationBuffer,
    state: PhaseState,
    // Deepest (largest) ear_y of the current repetition; y grows downward.
    min_y_in_rep: Option<f64>,
    descent_threshold: f64,
    ascent_return_threshold: f64,
}

impl PhaseDetector {
    pub fn new(descent_threshold: f64, ascent_return_threshold: f64) -> Self {
        Self {
            calibration: CalibrationBuffer::new(),
            state: PhaseState::Idle,
            min_y_in_rep: None,
            descent_threshold,
            ascent_return_threshold,
        }
    }

    #[inline]
    pub fn state(&self) -> PhaseState {
        self.state
    }

    #[inline]
    pub fn baseline(&self) -> Option<f64> {
        self.calibration.baseline()
    }

    /// Deepest ear position of the repetition in progress, if any.
    #[inline]
    pub fn deepest_y(&self) -> Option<f64> {
        self.min_y_in_rep
    }

    pub fn update(&mut self, ear_y: f64) -> PhaseUpdate {
        let Some(baseline) = self.calibration.observe(ear_y) else {
            return PhaseUpdate::Uncalibrated;
        };

        let from = self.state;
        match self.state {
            PhaseState::Idle => {
                if ear_y > baseline * (1.0 + self.descent_threshold) {
                    self.state = PhaseState::Descending;
                    self.min_y_in_rep = Some(ear_y);
                }
            }
            PhaseState::Descending => {
                let deepest = self.min_y_in_rep.map_or(ear_y, |m| m.max(ear_y));
                self.min_y_in_rep = Some(deepest);
                if ear_y < deepest * REBOUND_FACTOR {
                    self.state = PhaseState::Ascending;
                }
            }
            PhaseState::Ascending => {
                if ear_y <= baseline * (1.0 + self.ascent_return_threshold) {
                    self.state = PhaseState::Completed;
                }
            }
            PhaseState::Completed => {}
        }

        if self.state == from {
            PhaseUpdate::Steady(from)
        } else {
            tracing::debug!(
                from = from.name(),
                to = self.state.name(),
                ear_y,
                baseline,
                "phase transition"
            );
            PhaseUpdate::Transition {
                from,
                to: self.state,
            }
        }
    }

    /// Arm the detector for the next repetition.
    pub fn rearm(&mut self) {
        self.state = PhaseState::Idle;
        self.min_y_in_rep = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibrated(y: f64) -> PhaseDetector {
        let mut d = PhaseDetector::new(0.05, 0.02);
        for _ in 0..9 {
            assert_eq!(d.update(y), PhaseUpdate::Uncalibrated);
        }
        assert_eq!(d.update(y), PhaseUpdate::Steady(PhaseState::Idle));
        d
    }

    #[test]
    fn full_cycle_on_synthetic_trace() {
        let mut d = calibrated(0.40);
        let mut transitions = Vec::new();
        // rise 10% above baseline, fall 5% below the peak, return to within 2%
        for y in [0.41, 0.43, 0.44, 0.435, 0.418, 0.40] {
            if let PhaseUpdate::Transition { from, to } = d.update(y) {
                transitions.push((from, to));
            }
        }
        assert_eq!(
            transitions,
            vec![
                (PhaseState::Idle, PhaseState::Descending),
                (PhaseState::Descending, PhaseState::Ascending),
                (PhaseState::Ascending, PhaseState::Completed),
            ]
        );
    }

    #[test]
    fn jitter_inside_rebound_band_does_not_ascend() {
        let mut d = calibrated(0.40);
        d.update(0.45);
        assert_eq!(d.state(), PhaseState::Descending);
        // 0.45 * 0.98 = 0.441; 0.442 stays inside the band
        assert_eq!(d.update(0.442), PhaseUpdate::Steady(PhaseState::Descending));
        assert_eq!(d.deepest_y(), Some(0.45));
        d.update(0.46);
        assert_eq!(d.deepest_y(), Some(0.46));
    }

    #[test]
    fn completed_is_terminal_until_rearmed() {
        let mut d = calibrated(0.40);
        for y in [0.45, 0.43, 0.40] {
            d.update(y);
        }
        assert_eq!(d.state(), PhaseState::Completed);
        assert_eq!(d.update(0.50), PhaseUpdate::Steady(PhaseState::Completed));
        d.rearm();
        assert_eq!(d.state(), PhaseState::Idle);
        assert_eq!(d.deepest_y(), None);
    }
}
