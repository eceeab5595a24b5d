//! Repetition records and the bounded aggregator that produces them.

use serde::Serialize;

use crate::classify::{PartFlags, PerPart};
use crate::config::DebounceCfg;
use crate::debounce::DebounceCounter;
use crate::result::AnalysisResult;
use crate::util::MILLIS_PER_SEC;

/// Maximum number of repetitions recorded per session.
pub const MAX_REPETITIONS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepetitionStatus {
    /// Returned to standing within the stream.
    Completed,
    /// Stream ended mid-repetition and the partial tallies were kept.
    Incomplete,
    /// Padding slot.
    #[default]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RepetitionRecord {
    pub index: u8,
    pub timestamp_s: f64,
    pub error_totals: PerPart<u32>,
    pub deviated: PartFlags,
    pub status: RepetitionStatus,
}

impl RepetitionRecord {
    /// Neutral padding record.
    pub fn empty(index: u8) -> Self {
        Self {
            index,
            timestamp_s: 0.0,
            error_totals: PerPart::default(),
            deviated: PartFlags::default(),
            status: RepetitionStatus::Empty,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    records: Vec<RepetitionRecord>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            records: Vec::with_capacity(MAX_REPETITIONS),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.records.len() >= MAX_REPETITIONS
    }

    /// Snapshot the counters into the next slot. Returns `None` once all
    /// slots are taken.
    pub fn record(
        &mut self,
        counters: &PerPart<DebounceCounter>,
        debounce: &DebounceCfg,
        timestamp_ms: f64,
        status: RepetitionStatus,
    ) -> Option<&RepetitionRecord> {
        if self.is_full() {
            return None;
        }
        let index = self.records.len() as u8;
        let rec = RepetitionRecord {
            index,
            timestamp_s: timestamp_ms / MILLIS_PER_SEC,
            error_totals: counters.map(|_, c| c.total),
            deviated: counters.map(|part, c| c.flagged(debounce.threshold(part), debounce.mode)),
            status,
        };
        tracing::info!(
            repetition = index,
            timestamp_s = rec.timestamp_s,
            status = ?status,
            head = rec.error_totals.head,
            trunk = rec.error_totals.trunk,
            knee = rec.error_totals.knee,
            heel = rec.error_totals.heel,
            "repetition recorded"
        );
        self.records.push(rec);
        self.records.last()
    }

    /// Pad to exactly `MAX_REPETITIONS` slots.
    pub fn into_result(self) -> AnalysisResult {
        let detected = self.records.len().min(MAX_REPETITIONS) as u8;
        let mut slots = [
            RepetitionRecord::empty(0),
            RepetitionRecord::empty(1),
            RepetitionRecord::empty(2),
        ];
        for (slot, rec) in slots.iter_mut().zip(self.records) {
            *slot = rec;
        }
        AnalysisResult::new(slots, detected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CountingMode;

    fn counters(totals: [u32; 4]) -> PerPart<DebounceCounter> {
        let [head, trunk, knee, heel] = totals.map(|total| DebounceCounter {
            consecutive: 0,
            total,
        });
        PerPart {
            head,
            trunk,
            knee,
            heel,
        }
    }

    #[test]
    fn record_snapshots_totals_and_flags() {
        let mut agg = Aggregator::new();
        let cfg = DebounceCfg::default();
        let rec = *agg
            .record(&counters([0, 2, 0, 1]), &cfg, 1500.0, RepetitionStatus::Completed)
            .unwrap();
        assert_eq!(rec.index, 0);
        assert_eq!(rec.timestamp_s, 1.5);
        assert_eq!(rec.error_totals.trunk, 2);
        assert!(!rec.deviated.head && rec.deviated.trunk && !rec.deviated.knee && rec.deviated.heel);
    }

    #[test]
    fn per_frame_mode_uses_threshold() {
        let mut agg = Aggregator::new();
        let cfg = DebounceCfg {
            mode: CountingMode::PerFrame,
            ..DebounceCfg::default()
        };
        let rec = *agg
            .record(&counters([5, 6, 0, 0]), &cfg, 0.0, RepetitionStatus::Completed)
            .unwrap();
        assert!(!rec.deviated.head);
        assert!(rec.deviated.trunk);
    }

    #[test]
    fn fourth_record_is_refused() {
        let mut agg = Aggregator::new();
        let cfg = DebounceCfg::default();
        for i in 0..3 {
            assert!(
                agg.record(&counters([0; 4]), &cfg, i as f64, RepetitionStatus::Completed)
                    .is_some()
            );
        }
        assert!(agg.is_full());
        assert!(
            agg.record(&counters([1; 4]), &cfg, 9.0, RepetitionStatus::Completed)
                .is_none()
        );
        assert_eq!(agg.into_result().repetitions_detected(), 3);
    }

    #[test]
    fn padding_fills_remaining_slots() {
        let mut agg = Aggregator::new();
        agg.record(
            &counters([1, 0, 0, 0]),
            &DebounceCfg::default(),
            2000.0,
            RepetitionStatus::Completed,
        );
        let result = agg.into_result();
        assert_eq!(result.repetitions_detected(), 1);
        let slots = result.slots();
        assert_eq!(slots[1], RepetitionRecord::empty(1));
        assert_eq!(slots[2], RepetitionRecord::empty(2));
    }
}
