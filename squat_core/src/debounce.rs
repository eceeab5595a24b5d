//! Per-part debounce counter turning sustained deviation into error events.

use serde::Serialize;

use crate::config::CountingMode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DebounceCounter {
    pub consecutive: u32,
    pub total: u32,
}

impl DebounceCounter {
    /// Record one classified frame. Returns `true` when an error was added to
    /// `total` by this frame.
    pub fn observe(&mut self, deviated: bool, threshold: u32, mode: CountingMode) -> bool {
        if !deviated {
            self.consecutive = 0;
            return false;
        }
        self.consecutive = self.consecutive.saturating_add(1);
        match mode {
            CountingMode::Consecutive => {
                if self.consecutive >= threshold {
                    self.total = self.total.saturating_add(1);
                    self.consecutive = 0;
                    true
                } else {
                    false
                }
            }
            CountingMode::PerFrame => {
                self.total = self.total.saturating_add(1);
                true
            }
        }
    }

    /// Break the current streak without touching `total`.
    #[inline]
    pub fn break_streak(&mut self) {
        self.consecutive = 0;
    }

    /// Whether the accumulated tally marks the part as deviated for the repetition.
    #[inline]
    pub fn flagged(&self, threshold: u32, mode: CountingMode) -> bool {
        match mode {
            CountingMode::Consecutive => self.total > 0,
            CountingMode::PerFrame => self.total > threshold,
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
