//! Immutable, always three-slot analysis result.

use serde::Serialize;

use crate::aggregate::{MAX_REPETITIONS, RepetitionRecord, RepetitionStatus};
use crate::classify::{BodyPart, PartFlags};

/// Flagged slots at or above which a body part fails the session.
pub const FAIL_SLOT_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    slots: [RepetitionRecord; MAX_REPETITIONS],
    repetitions_detected: u8,
}

impl AnalysisResult {
    pub(crate) fn new(slots: [RepetitionRecord; MAX_REPETITIONS], repetitions_detected: u8) -> Self {
        Self {
            slots,
            repetitions_detected,
        }
    }

    /// A result with no repetitions.
    pub fn empty() -> Self {
        Self::new(
            [
                RepetitionRecord::empty(0),
                RepetitionRecord::empty(1),
                RepetitionRecord::empty(2),
            ],
            0,
        )
    }

    #[inline]
    pub fn slots(&self) -> &[RepetitionRecord; MAX_REPETITIONS] {
        &self.slots
    }

    /// Recorded repetitions, including an incomplete trailing one.
    #[inline]
    pub fn repetitions_detected(&self) -> u8 {
        self.repetitions_detected
    }

    /// Repetitions that actually returned to standing.
    pub fn completed_repetitions(&self) -> u8 {
        self.slots
            .iter()
            .filter(|s| s.status == RepetitionStatus::Completed)
            .count() as u8
    }

    /// Number of slots in which `part` was flagged.
    pub fn deviated_slots(&self, part: BodyPart) -> usize {
        self.slots.iter().filter(|s| *s.deviated.get(part)).count()
    }

    pub fn part_failed(&self, part: BodyPart) -> bool {
        self.deviated_slots(part) >= FAIL_SLOT_COUNT
    }

    /// Session-level verdict per body part (`true` = failed).
    pub fn summary(&self) -> PartFlags {
        PartFlags::from_fn(|p| self.part_failed(p))
    }
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self::empty()
    }
}
