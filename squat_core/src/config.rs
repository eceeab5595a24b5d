//! Configuration types for the analysis engine.
//!
//! These are the runtime configuration structs used by `AnalysisSession`.
//! They are separate from the TOML-deserialized config in `squat_config`.

use squat_traits::LandmarkId;

use crate::classify::BodyPart;

/// Ear whose vertical position drives the phase detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EarSide {
    Left,
    #[default]
    Right,
}

impl EarSide {
    pub fn landmark(self) -> LandmarkId {
        match self {
            EarSide::Left => LandmarkId::LeftEar,
            EarSide::Right => LandmarkId::RightEar,
        }
    }
}

/// Phase detector thresholds, as fractions of the calibrated standing ear height.
#[derive(Debug, Clone)]
pub struct PhaseCfg {
    /// Enter `Descending` once `ear_y > baseline * (1 + descent_threshold)`.
    pub descent_threshold: f64,
    /// Complete once `ear_y <= baseline * (1 + ascent_return_threshold)`.
    pub ascent_return_threshold: f64,
    pub ear: EarSide,
}

impl Default for PhaseCfg {
    fn default() -> Self {
        Self {
            descent_threshold: 0.05,
            ascent_return_threshold: 0.02,
            ear: EarSide::Right,
        }
    }
}

/// How deviated frames turn into the per-repetition error tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountingMode {
    /// One error per `threshold` consecutive deviated frames; flagged if any error.
    #[default]
    Consecutive,
    /// Every deviated frame counts; flagged once the count exceeds the threshold.
    PerFrame,
}

/// Per-part debounce thresholds (frames).
#[derive(Debug, Clone)]
pub struct DebounceCfg {
    pub head: u32,
    pub trunk: u32,
    pub knee: u32,
    pub heel: u32,
    pub mode: CountingMode,
}

impl DebounceCfg {
    pub fn threshold(&self, part: BodyPart) -> u32 {
        match part {
            BodyPart::Head => self.head,
            BodyPart::Trunk => self.trunk,
            BodyPart::Knee => self.knee,
            BodyPart::Heel => self.heel,
        }
    }
}

impl Default for DebounceCfg {
    fn default() -> Self {
        Self {
            head: 5,
            trunk: 5,
            knee: 5,
            heel: 5,
            mode: CountingMode::Consecutive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadRule {
    /// Nose horizontally within `max_offset_x` of the shoulder midpoint.
    NoseShoulderOffset { max_offset_x: f64 },
    /// Ear→eye vector within `max_tilt_deg` of horizontal.
    EarEyeLevel { max_tilt_deg: f64 },
    /// Shoulder–ear vertical span within `±tolerance` (relative) of the span
    /// seen on the first detected frame.
    EarShoulderSpan { tolerance: f64 },
}

impl Default for HeadRule {
    fn default() -> Self {
        Self::NoseShoulderOffset { max_offset_x: 0.05 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrunkRule {
    /// Deviated when the shoulder→hip angle falls below the knee→ankle angle.
    /// With a gate, frames whose knee/ankle x drifted more than the gate from
    /// the standing reference are rejected as tracking jumps.
    TibiaParallel { position_gate: Option<f64> },
    /// Deviated when `|shoulder→hip angle|` leaves `[min_deg, max_deg]`.
    AngleWindow { min_deg: f64, max_deg: f64 },
}

impl Default for TrunkRule {
    fn default() -> Self {
        Self::TibiaParallel {
            position_gate: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KneeRule {
    /// Knee x beyond the big toe by more than `foot_fraction` of the foot length.
    ToeTravel { foot_fraction: f64 },
    /// Knee x outside the hip/ankle x range widened by `margin_x`.
    HipAnkleCorridor { margin_x: f64 },
}

impl Default for KneeRule {
    fn default() -> Self {
        Self::ToeTravel {
            foot_fraction: 0.30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeelRule {
    /// Heel above the ankle by more than `max_lift`.
    AnkleLift { max_lift: f64 },
    /// Heel above its calibrated standing height by more than `tolerance`.
    CalibratedHeight { tolerance: f64 },
}

impl Default for HeelRule {
    fn default() -> Self {
        Self::AnkleLift { max_lift: 0.01 }
    }
}

/// One geometric rule per body part.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub head: HeadRule,
    pub trunk: TrunkRule,
    pub knee: KneeRule,
    pub heel: HeelRule,
}

/// What to do with a first repetition that never returned to standing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IncompletePolicy {
    #[default]
    Record,
    Discard,
}

#[derive(Debug, Clone, Default)]
pub struct FinalizeCfg {
    pub incomplete: IncompletePolicy,
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    pub phase: PhaseCfg,
    pub debounce: DebounceCfg,
    pub rules: RuleSet,
    pub finalize: FinalizeCfg,
}
