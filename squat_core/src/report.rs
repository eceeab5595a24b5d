//! Per-body-part session report for downstream exporters.

use serde::Serialize;

use crate::aggregate::MAX_REPETITIONS;
use crate::classify::BodyPart;
use crate::result::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartReport {
    pub part: BodyPart,
    pub error_counts: [u32; MAX_REPETITIONS],
    pub deviated: [bool; MAX_REPETITIONS],
    pub verdict: Verdict,
    /// Total errors divided by the session duration, when one was supplied.
    pub errors_per_second: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub repetitions_detected: u8,
    pub completed_repetitions: u8,
    pub total_duration_s: Option<f64>,
    pub rows: Vec<PartReport>,
}

impl SessionReport {
    /// Build the report. Non-positive or non-finite durations are ignored.
    pub fn new(result: &AnalysisResult, total_duration_s: Option<f64>) -> Self {
        let duration = total_duration_s.filter(|d| d.is_finite() && *d > 0.0);
        let rows = BodyPart::ALL
            .into_iter()
            .map(|part| {
                let error_counts = result.slots().map(|s| *s.error_totals.get(part));
                let deviated = result.slots().map(|s| *s.deviated.get(part));
                let total: u32 = error_counts.iter().sum();
                PartReport {
                    part,
                    error_counts,
                    deviated,
                    verdict: if result.part_failed(part) {
                        Verdict::Fail
                    } else {
                        Verdict::Pass
                    },
                    errors_per_second: duration.map(|d| f64::from(total) / d),
                }
            })
            .collect();
        Self {
            repetitions_detected: result.repetitions_detected(),
            completed_repetitions: result.completed_repetitions(),
            total_duration_s: duration,
            rows,
        }
    }

    pub fn row(&self, part: BodyPart) -> Option<&PartReport> {
        self.rows.iter().find(|r| r.part == part)
    }
}
