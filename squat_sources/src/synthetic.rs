//! Deterministic synthetic squatting subject.
//!
//! Produces a right-side view: a standing lead-in, then per repetition a
//! cosine-shaped descent and ascent followed by a short standing rest.
//! Injected faults move one body part out of form while the subject is
//! down, scaled by squat depth.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use squat_traits::{Frame, FrameSource, Landmark, LandmarkId, Landmarks};

/// Standing frames before the first repetition.
pub const LEAD_IN_FRAMES: u32 = 15;
/// Frames spent going down, and again coming up.
pub const HALF_REP_FRAMES: u32 = 15;
/// Standing frames after each repetition.
pub const REST_FRAMES: u32 = 10;

const FRAMES_PER_REP: u32 = 2 * HALF_REP_FRAMES + REST_FRAMES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fault {
    /// Head pushed forward of the shoulders.
    Head,
    /// Hips drift forward of the shoulders.
    Trunk,
    /// Knee travels past the toes (the trunk leans to match the shin).
    Knee,
    /// Heel leaves the floor.
    Heel,
}

impl Fault {
    pub const ALL: [Fault; 4] = [Fault::Head, Fault::Trunk, Fault::Knee, Fault::Heel];

    pub fn name(self) -> &'static str {
        match self {
            Fault::Head => "head",
            Fault::Trunk => "trunk",
            Fault::Knee => "knee",
            Fault::Heel => "heel",
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Fault {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == key)
            .ok_or_else(|| format!("unknown fault '{s}' (expected head|trunk|knee|heel)"))
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticSquat {
    reps: u32,
    fps: f64,
    faults: BTreeSet<Fault>,
    noise: f64,
    rng: u32,
    dropout_every: Option<u32>,
    next: u32,
}

impl SyntheticSquat {
    pub fn new(reps: u32, fps: f64) -> Self {
        Self {
            reps,
            fps: if fps.is_finite() && fps > 0.0 { fps } else { 30.0 },
            faults: BTreeSet::new(),
            noise: 0.0,
            rng: 0x9E37_79B9,
            dropout_every: None,
            next: 0,
        }
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.faults.insert(fault);
        self
    }

    pub fn with_faults(mut self, faults: impl IntoIterator<Item = Fault>) -> Self {
        self.faults.extend(faults);
        self
    }

    /// Uniform jitter of `±amplitude` on every coordinate, from a fixed seed.
    pub fn with_noise(mut self, amplitude: f64, seed: u32) -> Self {
        self.noise = amplitude.abs();
        self.rng = seed.max(1);
        self
    }

    /// Every `n`th frame reports no detected body.
    pub fn with_dropout_every(mut self, n: u32) -> Self {
        self.dropout_every = (n > 0).then_some(n);
        self
    }

    /// Frames the subject produces, saturating at `u32::MAX`.
    pub fn total_frames(&self) -> u32 {
        self.reps
            .saturating_mul(FRAMES_PER_REP)
            .saturating_add(LEAD_IN_FRAMES)
    }

    pub fn duration_s(&self) -> f64 {
        f64::from(self.total_frames()) / self.fps
    }

    /// Squat depth in `[0, 1]` for frame `i`.
    pub fn depth(&self, i: u32) -> f64 {
        if i < LEAD_IN_FRAMES {
            return 0.0;
        }
        let k = (i - LEAD_IN_FRAMES) % FRAMES_PER_REP;
        let half = f64::from(HALF_REP_FRAMES);
        if k < HALF_REP_FRAMES {
            let t = f64::from(k + 1) / half;
            0.5 - 0.5 * (std::f64::consts::PI * t).cos()
        } else if k < 2 * HALF_REP_FRAMES {
            let t = f64::from(k - HALF_REP_FRAMES + 1) / half;
            0.5 + 0.5 * (std::f64::consts::PI * t).cos()
        } else {
            0.0
        }
    }

    fn jitter(&mut self) -> f64 {
        if self.noise == 0.0 {
            return 0.0;
        }
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        (f64::from(x) / f64::from(u32::MAX) * 2.0 - 1.0) * self.noise
    }

    /// Pose at squat depth `d`.
    fn pose(&mut self, d: f64) -> Landmarks {
        let has = |f| self.faults.contains(&f);
        let lean = if has(Fault::Knee) { 0.10 * d } else { 0.0 };
        let nose_dx = if has(Fault::Head) { 0.10 * d } else { 0.0 };
        let hip_x = if has(Fault::Trunk) {
            0.48 + 0.20 * d
        } else {
            0.48 - 0.08 * d
        };
        let knee_x = if has(Fault::Knee) {
            0.50 + 0.14 * d
        } else {
            0.50 + 0.04 * d
        };
        let heel_y = if has(Fault::Heel) {
            0.91 - 0.04 * d
        } else {
            0.91
        };
        let drop = 0.12 * d;

        let points = [
            (LandmarkId::Nose, 0.53 + lean + nose_dx, 0.24 + drop),
            (LandmarkId::RightEye, 0.54 + lean, 0.22 + drop),
            (LandmarkId::LeftEar, 0.49 + lean, 0.22 + drop),
            (LandmarkId::RightEar, 0.50 + lean, 0.22 + drop),
            (LandmarkId::LeftShoulder, 0.50 + lean, 0.30 + drop),
            (LandmarkId::RightShoulder, 0.50 + lean, 0.30 + drop),
            (LandmarkId::RightHip, hip_x, 0.55 + 0.10 * d),
            (LandmarkId::RightKnee, knee_x, 0.72),
            (LandmarkId::RightAnkle, 0.50, 0.90),
            (LandmarkId::RightHeel, 0.47, heel_y),
            (LandmarkId::RightFootIndex, 0.56, 0.92),
        ];
        let mut lm = Landmarks::new();
        for (id, x, y) in points {
            let jx = self.jitter();
            let jy = self.jitter();
            lm.insert(id, Landmark::new(x + jx, y + jy, 0.0));
        }
        lm
    }
}

impl Iterator for SyntheticSquat {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let i = self.next;
        if i >= self.total_frames() {
            return None;
        }
        self.next += 1;
        let timestamp_ms = f64::from(i) * 1000.0 / self.fps;
        if self.dropout_every.is_some_and(|n| (i + 1) % n == 0) {
            return Some(Frame::empty(timestamp_ms));
        }
        let d = self.depth(i);
        Some(Frame::detected(timestamp_ms, self.pose(d)))
    }
}

impl FrameSource for SyntheticSquat {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.next())
    }
}
