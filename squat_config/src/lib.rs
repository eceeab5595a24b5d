#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and trace parsing for the squat analysis engine.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//!   Every section is optional; missing keys take the engine defaults.
//! - The landmark trace CSV loader enforces headers and groups rows into frames.
use serde::Deserialize;
use squat_traits::{Frame, Landmark, LandmarkId, Landmarks};

/// Which ear drives the repetition detector.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EarSide {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PhaseSection {
    /// Fraction of the standing ear height the ear must drop below to start a repetition.
    pub descent_threshold: f64,
    /// Fraction of the standing ear height within which a repetition counts as returned.
    pub ascent_return_threshold: f64,
    pub ear: EarSide,
}

impl Default for PhaseSection {
    fn default() -> Self {
        Self {
            descent_threshold: 0.05,
            ascent_return_threshold: 0.02,
            ear: EarSide::Right,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CountingMode {
    /// Count one error per run of `threshold` consecutive deviated frames.
    #[default]
    Consecutive,
    /// Count every deviated frame; the part is flagged once the count exceeds the threshold.
    PerFrame,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DebounceSection {
    pub head: u32,
    pub trunk: u32,
    pub knee: u32,
    pub heel: u32,
    pub mode: CountingMode,
}

impl Default for DebounceSection {
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

fn default_max_offset_x() -> f64 {
    0.05
}
fn default_max_tilt_deg() -> f64 {
    5.0
}
fn default_span_tolerance() -> f64 {
    0.10
}
fn default_min_deg() -> f64 {
    70.0
}
fn default_max_deg() -> f64 {
    110.0
}
fn default_foot_fraction() -> f64 {
    0.30
}
fn default_margin_x() -> f64 {
    0.03
}
fn default_max_lift() -> f64 {
    0.01
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeadRuleToml {
    NoseShoulderOffset {
        #[serde(default = "default_max_offset_x")]
        max_offset_x: f64,
    },
    EarEyeLevel {
        #[serde(default = "default_max_tilt_deg")]
        max_tilt_deg: f64,
    },
    EarShoulderSpan {
        #[serde(default = "default_span_tolerance")]
        tolerance: f64,
    },
}

impl Default for HeadRuleToml {
    fn default() -> Self {
        Self::NoseShoulderOffset {
            max_offset_x: default_max_offset_x(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrunkRuleToml {
    TibiaParallel {
        /// Max horizontal drift of knee/ankle from their standing reference
        /// before a frame is treated as a tracking jump. Absent disables the gate.
        #[serde(default)]
        position_gate: Option<f64>,
    },
    AngleWindow {
        #[serde(default = "default_min_deg")]
        min_deg: f64,
        #[serde(default = "default_max_deg")]
        max_deg: f64,
    },
}

impl Default for TrunkRuleToml {
    fn default() -> Self {
        Self::TibiaParallel {
            position_gate: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KneeRuleToml {
    ToeTravel {
        #[serde(default = "default_foot_fraction")]
        foot_fraction: f64,
    },
    HipAnkleCorridor {
        #[serde(default = "default_margin_x")]
        margin_x: f64,
    },
}

impl Default for KneeRuleToml {
    fn default() -> Self {
        Self::ToeTravel {
            foot_fraction: default_foot_fraction(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeelRuleToml {
    AnkleLift {
        #[serde(default = "default_max_lift")]
        max_lift: f64,
    },
    CalibratedHeight {
        #[serde(default = "default_max_lift")]
        tolerance: f64,
    },
}

impl Default for HeelRuleToml {
    fn default() -> Self {
        Self::AnkleLift {
            max_lift: default_max_lift(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RulesSection {
    pub head: HeadRuleToml,
    pub trunk: TrunkRuleToml,
    pub knee: KneeRuleToml,
    pub heel: HeelRuleToml,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IncompletePolicy {
    /// Keep a dangling first repetition, marked as incomplete.
    #[default]
    Record,
    /// Drop a repetition that never returned to standing.
    Discard,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FinalizeSection {
    pub incomplete: IncompletePolicy,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Nominal frame rate of recorded traces; used by the simulator and for
    /// the session duration estimate when none is given.
    pub fps: f64,
}

impl Default for InputSection {
    fn default() -> Self {
        Self { fps: 30.0 }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub phase: PhaseSection,
    pub debounce: DebounceSection,
    pub rules: RulesSection,
    pub finalize: FinalizeSection,
    pub input: InputSection,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

fn check_tolerance(name: &str, v: f64) -> eyre::Result<()> {
    if !v.is_finite() || v < 0.0 {
        eyre::bail!("{name} must be a finite value >= 0");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Phase
        let p = &self.phase;
        if !(p.descent_threshold > 0.0 && p.descent_threshold < 1.0) {
            eyre::bail!("phase.descent_threshold must be in (0.0, 1.0)");
        }
        if !(p.ascent_return_threshold >= 0.0 && p.ascent_return_threshold < 1.0) {
            eyre::bail!("phase.ascent_return_threshold must be in [0.0, 1.0)");
        }
        if p.ascent_return_threshold >= p.descent_threshold {
            eyre::bail!("phase.ascent_return_threshold must be below phase.descent_threshold");
        }

        // Debounce
        let d = &self.debounce;
        for (name, v) in [
            ("debounce.head", d.head),
            ("debounce.trunk", d.trunk),
            ("debounce.knee", d.knee),
            ("debounce.heel", d.heel),
        ] {
            if v == 0 {
                eyre::bail!("{name} must be >= 1");
            }
        }

        // Rules
        match self.rules.head {
            HeadRuleToml::NoseShoulderOffset { max_offset_x } => {
                check_tolerance("rules.head.max_offset_x", max_offset_x)?;
            }
            HeadRuleToml::EarEyeLevel { max_tilt_deg } => {
                check_tolerance("rules.head.max_tilt_deg", max_tilt_deg)?;
                if max_tilt_deg > 90.0 {
                    eyre::bail!("rules.head.max_tilt_deg must be <= 90");
                }
            }
            HeadRuleToml::EarShoulderSpan { tolerance } => {
                check_tolerance("rules.head.tolerance", tolerance)?;
            }
        }
        match self.rules.trunk {
            TrunkRuleToml::TibiaParallel { position_gate } => {
                if let Some(gate) = position_gate {
                    check_tolerance("rules.trunk.position_gate", gate)?;
                }
            }
            TrunkRuleToml::AngleWindow { min_deg, max_deg } => {
                check_tolerance("rules.trunk.min_deg", min_deg)?;
                check_tolerance("rules.trunk.max_deg", max_deg)?;
                if min_deg > max_deg {
                    eyre::bail!("rules.trunk.min_deg must be <= rules.trunk.max_deg");
                }
            }
        }
        match self.rules.knee {
            KneeRuleToml::ToeTravel { foot_fraction } => {
                check_tolerance("rules.knee.foot_fraction", foot_fraction)?;
            }
            KneeRuleToml::HipAnkleCorridor { margin_x } => {
                check_tolerance("rules.knee.margin_x", margin_x)?;
            }
        }
        match self.rules.heel {
            HeelRuleToml::AnkleLift { max_lift } => {
                check_tolerance("rules.heel.max_lift", max_lift)?;
            }
            HeelRuleToml::CalibratedHeight { tolerance } => {
                check_tolerance("rules.heel.tolerance", tolerance)?;
            }
        }

        // Input
        if !(self.input.fps.is_finite() && self.input.fps > 0.0) {
            eyre::bail!("input.fps must be > 0");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got '{rot}'");
        }

        Ok(())
    }
}

/// Landmark trace CSV schema (long format, one keypoint per row).
///
/// Expected headers:
/// timestamp_ms,landmark,x,y,z
///
/// Rows sharing a timestamp form one frame. A row with an empty `landmark`
/// marks a frame in which no body was detected.
///
/// Example:
/// timestamp_ms,landmark,x,y,z
/// 33.3,right_ear,0.51,0.40,0.0
/// 33.3,right_shoulder,0.50,0.30,0.0
/// 66.7,,,,
#[derive(Debug, Deserialize, Clone)]
pub struct TraceRow {
    pub timestamp_ms: f64,
    pub landmark: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

const TRACE_HEADERS: [&str; 5] = ["timestamp_ms", "landmark", "x", "y", "z"];

pub fn load_frames_csv(path: &std::path::Path) -> eyre::Result<Vec<Frame>> {
    let file = std::fs::File::open(path)
        .map_err(|e| eyre::eyre!("open trace CSV {:?}: {}", path, e))?;
    parse_frames_csv(file)
}

/// Parse a landmark trace from any reader. Rows must be in non-decreasing
/// timestamp order.
#[allow(clippy::float_cmp)]
pub fn parse_frames_csv<R: std::io::Read>(reader: R) -> eyre::Result<Vec<Frame>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read trace CSV headers: {}", e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != TRACE_HEADERS {
        eyre::bail!(
            "trace CSV must have headers '{}', got: {}",
            TRACE_HEADERS.join(","),
            actual.join(",")
        );
    }

    let mut frames: Vec<Frame> = Vec::new();
    for (idx, rec) in rdr.deserialize::<TraceRow>().enumerate() {
        let line = idx + 2;
        let row = match rec {
            Ok(row) => row,
            Err(e) => eyre::bail!("invalid CSV row {}: {}", line, e),
        };
        if !row.timestamp_ms.is_finite() {
            eyre::bail!("row {line}: timestamp_ms must be finite");
        }

        let starts_frame = match frames.last() {
            Some(last) if last.timestamp_ms == row.timestamp_ms => false,
            Some(last) if row.timestamp_ms < last.timestamp_ms => {
                eyre::bail!(
                    "row {line}: timestamp {} is before previous frame at {}",
                    row.timestamp_ms,
                    last.timestamp_ms
                );
            }
            _ => true,
        };
        if starts_frame {
            frames.push(Frame::empty(row.timestamp_ms));
        }
        let last = frames.len() - 1;
        let frame = &mut frames[last];

        let Some(name) = row.landmark.as_deref().filter(|s| !s.is_empty()) else {
            if frame.landmarks.is_some() {
                eyre::bail!("row {line}: empty landmark row inside a frame with detections");
            }
            continue;
        };
        let id: LandmarkId = name
            .parse()
            .map_err(|e| eyre::eyre!("row {line}: {e}"))?;
        let (Some(x), Some(y)) = (row.x, row.y) else {
            eyre::bail!("row {line}: landmark '{name}' is missing x or y");
        };
        frame
            .landmarks
            .get_or_insert_with(Landmarks::new)
            .insert(id, Landmark::new(x, y, row.z.unwrap_or(0.0)));
    }

    Ok(frames)
}
