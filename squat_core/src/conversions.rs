//! `From` implementations bridging `squat_config` types to `squat_core` types.

use crate::config::{
    AnalysisConfig, CountingMode, DebounceCfg, EarSide, FinalizeCfg, HeadRule, HeelRule,
    IncompletePolicy, KneeRule, PhaseCfg, RuleSet, TrunkRule,
};

// ── Phase ────────────────────────────────────────────────────────────────────

impl From<squat_config::EarSide> for EarSide {
    fn from(c: squat_config::EarSide) -> Self {
        match c {
            squat_config::EarSide::Left => EarSide::Left,
            squat_config::EarSide::Right => EarSide::Right,
        }
    }
}

impl From<&squat_config::PhaseSection> for PhaseCfg {
    fn from(c: &squat_config::PhaseSection) -> Self {
        Self {
            descent_threshold: c.descent_threshold,
            ascent_return_threshold: c.ascent_return_threshold,
            ear: c.ear.into(),
        }
    }
}

// ── Debounce ─────────────────────────────────────────────────────────────────

impl From<squat_config::CountingMode> for CountingMode {
    fn from(c: squat_config::CountingMode) -> Self {
        match c {
            squat_config::CountingMode::Consecutive => CountingMode::Consecutive,
            squat_config::CountingMode::PerFrame => CountingMode::PerFrame,
        }
    }
}

impl From<&squat_config::DebounceSection> for DebounceCfg {
    fn from(c: &squat_config::DebounceSection) -> Self {
        Self {
            head: c.head,
            trunk: c.trunk,
            knee: c.knee,
            heel: c.heel,
            mode: c.mode.into(),
        }
    }
}

// ── Rules ────────────────────────────────────────────────────────────────────

impl From<squat_config::HeadRuleToml> for HeadRule {
    fn from(c: squat_config::HeadRuleToml) -> Self {
        use squat_config::HeadRuleToml as T;
        match c {
            T::NoseShoulderOffset { max_offset_x } => HeadRule::NoseShoulderOffset { max_offset_x },
            T::EarEyeLevel { max_tilt_deg } => HeadRule::EarEyeLevel { max_tilt_deg },
            T::EarShoulderSpan { tolerance } => HeadRule::EarShoulderSpan { tolerance },
        }
    }
}

impl From<squat_config::TrunkRuleToml> for TrunkRule {
    fn from(c: squat_config::TrunkRuleToml) -> Self {
        use squat_config::TrunkRuleToml as T;
        match c {
            T::TibiaParallel { position_gate } => TrunkRule::TibiaParallel { position_gate },
            T::AngleWindow { min_deg, max_deg } => TrunkRule::AngleWindow { min_deg, max_deg },
        }
    }
}

impl From<squat_config::KneeRuleToml> for KneeRule {
    fn from(c: squat_config::KneeRuleToml) -> Self {
        use squat_config::KneeRuleToml as T;
        match c {
            T::ToeTravel { foot_fraction } => KneeRule::ToeTravel { foot_fraction },
            T::HipAnkleCorridor { margin_x } => KneeRule::HipAnkleCorridor { margin_x },
        }
    }
}

impl From<squat_config::HeelRuleToml> for HeelRule {
    fn from(c: squat_config::HeelRuleToml) -> Self {
        use squat_config::HeelRuleToml as T;
        match c {
            T::AnkleLift { max_lift } => HeelRule::AnkleLift { max_lift },
            T::CalibratedHeight { tolerance } => HeelRule::CalibratedHeight { tolerance },
        }
    }
}

impl From<&squat_config::RulesSection> for RuleSet {
    fn from(c: &squat_config::RulesSection) -> Self {
        Self {
            head: c.head.into(),
            trunk: c.trunk.into(),
            knee: c.knee.into(),
            heel: c.heel.into(),
        }
    }
}

// ── Finalize ─────────────────────────────────────────────────────────────────

impl From<&squat_config::FinalizeSection> for FinalizeCfg {
    fn from(c: &squat_config::FinalizeSection) -> Self {
        Self {
            incomplete: match c.incomplete {
                squat_config::IncompletePolicy::Record => IncompletePolicy::Record,
                squat_config::IncompletePolicy::Discard => IncompletePolicy::Discard,
            },
        }
    }
}

// ── Whole config ─────────────────────────────────────────────────────────────

impl From<&squat_config::Config> for AnalysisConfig {
    fn from(c: &squat_config::Config) -> Self {
        Self {
            phase: (&c.phase).into(),
            debounce: (&c.debounce).into(),
            rules: (&c.rules).into(),
            finalize: (&c.finalize).into(),
        }
    }
}
