//! Validating builder for [`AnalysisSession`].

use crate::config::*;
use crate::error::{BuildError, Result};
use crate::session::AnalysisSession;

/// Builder for `AnalysisSession`. Unset sections fall back to their defaults;
/// everything is validated on `build()`.
#[derive(Debug, Default)]
pub struct AnalysisSessionBuilder {
    phase: Option<PhaseCfg>,
    debounce: Option<DebounceCfg>,
    rules: Option<RuleSet>,
    finalize: Option<FinalizeCfg>,
}

impl AnalysisSessionBuilder {
    pub fn with_phase(mut self, phase: PhaseCfg) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_debounce(mut self, debounce: DebounceCfg) -> Self {
        self.debounce = Some(debounce);
        self
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn with_finalize(mut self, finalize: FinalizeCfg) -> Self {
        self.finalize = Some(finalize);
        self
    }

    /// Take every section from a complete config.
    pub fn with_config(self, cfg: AnalysisConfig) -> Self {
        self.with_phase(cfg.phase)
            .with_debounce(cfg.debounce)
            .with_rules(cfg.rules)
            .with_finalize(cfg.finalize)
    }

    pub fn build(self) -> Result<AnalysisSession> {
        validate_and_build(AnalysisConfig {
            phase: self.phase.unwrap_or_default(),
            debounce: self.debounce.unwrap_or_default(),
            rules: self.rules.unwrap_or_default(),
            finalize: self.finalize.unwrap_or_default(),
        })
    }
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

fn tolerance(v: f64, msg: &'static str) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(msg))
    }
}

/// Validate configuration and construct the session.
///
/// This is the single place where engine configuration is checked.
fn validate_and_build(cfg: AnalysisConfig) -> Result<AnalysisSession> {
    let phase = &cfg.phase;
    if !(phase.descent_threshold > 0.0 && phase.descent_threshold < 1.0) {
        return Err(invalid("descent_threshold must be in (0, 1)"));
    }
    if !(0.0..1.0).contains(&phase.ascent_return_threshold) {
        return Err(invalid("ascent_return_threshold must be in [0, 1)"));
    }
    if phase.ascent_return_threshold >= phase.descent_threshold {
        return Err(invalid(
            "ascent_return_threshold must be below descent_threshold",
        ));
    }

    let d = &cfg.debounce;
    if d.head == 0 || d.trunk == 0 || d.knee == 0 || d.heel == 0 {
        return Err(invalid("debounce thresholds must be >= 1"));
    }

    match cfg.rules.head {
        HeadRule::NoseShoulderOffset { max_offset_x } => {
            tolerance(max_offset_x, "head max_offset_x must be finite and >= 0")?
        }
        HeadRule::EarEyeLevel { max_tilt_deg } => {
            tolerance(max_tilt_deg, "head max_tilt_deg must be finite and >= 0")?
        }
        HeadRule::EarShoulderSpan { tolerance: t } => {
            tolerance(t, "head span tolerance must be finite and >= 0")?
        }
    }
    match cfg.rules.trunk {
        TrunkRule::TibiaParallel { position_gate } => {
            if let Some(g) = position_gate {
                tolerance(g, "trunk position_gate must be finite and >= 0")?;
            }
        }
        TrunkRule::AngleWindow { min_deg, max_deg } => {
            if !(min_deg.is_finite() && max_deg.is_finite()) {
                return Err(invalid("trunk angle window must be finite"));
            }
            if min_deg > max_deg {
                return Err(invalid("trunk min_deg must be <= max_deg"));
            }
        }
    }
    match cfg.rules.knee {
        KneeRule::ToeTravel { foot_fraction } => {
            tolerance(foot_fraction, "knee foot_fraction must be finite and >= 0")?
        }
        KneeRule::HipAnkleCorridor { margin_x } => {
            tolerance(margin_x, "knee margin_x must be finite and >= 0")?
        }
    }
    match cfg.rules.heel {
        HeelRule::AnkleLift { max_lift } => {
            tolerance(max_lift, "heel max_lift must be finite and >= 0")?
        }
        HeelRule::CalibratedHeight { tolerance: t } => {
            tolerance(t, "heel tolerance must be finite and >= 0")?
        }
    }

    tracing::debug!(
        descent = phase.descent_threshold,
        ascent = phase.ascent_return_threshold,
        ear = ?phase.ear,
        mode = ?d.mode,
        "analysis session configured"
    );
    Ok(AnalysisSession::from_config(cfg))
}
