//! The per-analysis state owner: one `AnalysisSession` per video.
//!
//! A session is fed frames in timestamp order via [`AnalysisSession::process_frame`]
//! and consumed by [`AnalysisSession::finalize`] at end-of-stream.

use serde::Serialize;
use squat_traits::{Frame, Landmarks};

use crate::aggregate::{Aggregator, RepetitionStatus};
use crate::builder::AnalysisSessionBuilder;
use crate::classify::{BodyPart, PartFlags, PerPart, References};
use crate::config::{AnalysisConfig, IncompletePolicy};
use crate::debounce::DebounceCounter;
use crate::phase::{PhaseDetector, PhaseState, PhaseUpdate};
use crate::result::AnalysisResult;

/// Why a frame was not fully processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The estimator found no body.
    MissingDetection,
    /// The ear baseline is still warming up.
    Uncalibrated,
    /// A body was found but the tracked ear was not; the phase held and the
    /// rules still ran if a repetition was in progress.
    MissingReference,
    /// Timestamp went backwards; the frame was dropped.
    OutOfOrder,
}

/// What happened to one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameOutcome {
    pub timestamp_ms: f64,
    pub phase: PhaseState,
    pub deviations: PartFlags,
    pub skipped: Option<SkipReason>,
}

/// Counters describing degraded input seen during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub frames_seen: u64,
    pub frames_classified: u64,
    pub missing_detection: u64,
    pub uncalibrated: u64,
    pub missing_reference: u64,
    pub out_of_order: u64,
    pub classifier_errors: PerPart<u64>,
}

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    cfg: AnalysisConfig,
    detector: PhaseDetector,
    refs: References,
    counters: PerPart<DebounceCounter>,
    aggregator: Aggregator,
    stats: AnalysisStats,
    last_timestamp_ms: Option<f64>,
}

impl AnalysisSession {
    pub fn builder() -> AnalysisSessionBuilder {
        AnalysisSessionBuilder::default()
    }

    /// Only called by the builder after validation.
    pub(crate) fn from_config(cfg: AnalysisConfig) -> Self {
        let detector = PhaseDetector::new(
            cfg.phase.descent_threshold,
            cfg.phase.ascent_return_threshold,
        );
        Self {
            cfg,
            detector,
            refs: References::new(),
            counters: PerPart::default(),
            aggregator: Aggregator::new(),
            stats: AnalysisStats::default(),
            last_timestamp_ms: None,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.cfg
    }

    pub fn phase(&self) -> PhaseState {
        self.detector.state()
    }

    pub fn baseline(&self) -> Option<f64> {
        self.detector.baseline()
    }

    pub fn stats(&self) -> &AnalysisStats {
        &self.stats
    }

    pub fn counters(&self) -> &PerPart<DebounceCounter> {
        &self.counters
    }

    pub fn references(&self) -> &References {
        &self.refs
    }

    pub fn repetitions_detected(&self) -> usize {
        self.aggregator.len()
    }

    /// Timestamp of the last accepted frame.
    pub fn last_timestamp_ms(&self) -> Option<f64> {
        self.last_timestamp_ms
    }

    fn outcome(&self, timestamp_ms: f64, skipped: Option<SkipReason>) -> FrameOutcome {
        FrameOutcome {
            timestamp_ms,
            phase: self.detector.state(),
            deviations: PartFlags::default(),
            skipped,
        }
    }

    fn break_streaks(&mut self) {
        if self.detector.state().is_active() {
            for part in BodyPart::ALL {
                self.counters.get_mut(part).break_streak();
            }
        }
    }

    /// Process one frame. Never fails: degraded input is absorbed and
    /// reported through the returned outcome and [`AnalysisStats`].
    pub fn process_frame(&mut self, frame: &Frame) -> FrameOutcome {
        let ts = frame.timestamp_ms;
        self.stats.frames_seen += 1;

        let in_order = ts.is_finite() && self.last_timestamp_ms.is_none_or(|prev| ts >= prev);
        if !in_order {
            tracing::warn!(
                timestamp_ms = ts,
                previous_ms = ?self.last_timestamp_ms,
                "dropping out-of-order frame"
            );
            self.stats.out_of_order += 1;
            return self.outcome(ts, Some(SkipReason::OutOfOrder));
        }
        self.last_timestamp_ms = Some(ts);

        let Some(lm) = frame.landmarks.as_ref() else {
            self.stats.missing_detection += 1;
            self.break_streaks();
            return self.outcome(ts, Some(SkipReason::MissingDetection));
        };

        self.refs.observe(lm);

        let ear_id = self.cfg.phase.ear.landmark();
        let Some(ear) = lm.get(&ear_id).filter(|p| p.is_finite()) else {
            tracing::trace!(timestamp_ms = ts, landmark = %ear_id, "tracked ear not visible");
            self.stats.missing_reference += 1;
            // The phase holds; the rules do not depend on the ear.
            let phase = self.detector.state();
            let deviations = if matches!(phase, PhaseState::Descending | PhaseState::Ascending) {
                self.classify(ts, lm)
            } else {
                PartFlags::default()
            };
            return FrameOutcome {
                timestamp_ms: ts,
                phase,
                deviations,
                skipped: Some(SkipReason::MissingReference),
            };
        };

        match self.detector.update(ear.y) {
            PhaseUpdate::Uncalibrated => {
                self.stats.uncalibrated += 1;
                return self.outcome(ts, Some(SkipReason::Uncalibrated));
            }
            PhaseUpdate::Transition {
                to: PhaseState::Completed,
                ..
            } => self.complete_repetition(ts),
            PhaseUpdate::Transition { .. } | PhaseUpdate::Steady(_) => {}
        }

        let phase = self.detector.state();
        let deviations = match phase {
            PhaseState::Idle => {
                for part in BodyPart::ALL {
                    self.counters.get_mut(part).reset();
                }
                PartFlags::default()
            }
            PhaseState::Descending | PhaseState::Ascending => self.classify(ts, lm),
            PhaseState::Completed => PartFlags::default(),
        };

        FrameOutcome {
            timestamp_ms: ts,
            phase,
            deviations,
            skipped: None,
        }
    }

    fn complete_repetition(&mut self, ts: f64) {
        self.aggregator.record(
            &self.counters,
            &self.cfg.debounce,
            ts,
            RepetitionStatus::Completed,
        );
        if self.aggregator.is_full() {
            tracing::info!("repetition cap reached; ignoring further motion");
        } else {
            self.detector.rearm();
        }
    }

    fn classify(&mut self, ts: f64, lm: &Landmarks) -> PartFlags {
        let mut flags = PartFlags::default();
        let debounce = &self.cfg.debounce;
        for part in BodyPart::ALL {
            let counter = self.counters.get_mut(part);
            match self.cfg.rules.evaluate(part, lm, &self.refs) {
                Ok(deviated) => {
                    *flags.get_mut(part) = deviated;
                    if counter.observe(deviated, debounce.threshold(part), debounce.mode) {
                        tracing::debug!(
                            part = part.name(),
                            total = counter.total,
                            timestamp_ms = ts,
                            "deviation promoted to error"
                        );
                    }
                }
                Err(e) => {
                    tracing::trace!(part = part.name(), timestamp_ms = ts, error = %e, "classifier skipped");
                    *self.stats.classifier_errors.get_mut(part) += 1;
                    counter.break_streak();
                }
            }
        }
        self.stats.frames_classified += 1;
        flags
    }

    /// End the stream and produce the padded result.
    ///
    /// If no repetition was recorded and the stream stopped mid-repetition,
    /// the partial tallies are handled according to the configured
    /// [`IncompletePolicy`].
    pub fn finalize(mut self, last_timestamp_ms: f64) -> AnalysisResult {
        if self.aggregator.is_empty() && self.detector.state().is_active() {
            match self.cfg.finalize.incomplete {
                IncompletePolicy::Record => {
                    tracing::warn!(
                        phase = self.detector.state().name(),
                        timestamp_ms = last_timestamp_ms,
                        "stream ended mid-repetition; recording it as incomplete"
                    );
                    self.aggregator.record(
                        &self.counters,
                        &self.cfg.debounce,
                        last_timestamp_ms,
                        RepetitionStatus::Incomplete,
                    );
                }
                IncompletePolicy::Discard => {
                    tracing::warn!(
                        phase = self.detector.state().name(),
                        "stream ended mid-repetition; discarding it"
                    );
                }
            }
        }
        tracing::info!(
            repetitions = self.aggregator.len(),
            frames = self.stats.frames_seen,
            classified = self.stats.frames_classified,
            "session finalized"
        );
        self.aggregator.into_result()
    }
}
