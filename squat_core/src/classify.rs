//! Per-frame geometric deviation rules for the four tracked body parts.
//!
//! Rules assume a right-sagittal camera view: the subject's right side faces
//! the camera, so right-side landmarks carry the signal. `y` grows downward.

use serde::Serialize;
use squat_traits::{Landmark, LandmarkId, Landmarks};

use crate::calibration::CalibrationBuffer;
use crate::config::{HeadRule, HeelRule, KneeRule, RuleSet, TrunkRule};
use crate::error::ClassifierError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Head,
    Trunk,
    Knee,
    Heel,
}

impl BodyPart {
    pub const ALL: [BodyPart; 4] = [
        BodyPart::Head,
        BodyPart::Trunk,
        BodyPart::Knee,
        BodyPart::Heel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::Trunk => "trunk",
            BodyPart::Knee => "knee",
            BodyPart::Heel => "heel",
        }
    }
}

impl core::fmt::Display for BodyPart {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per body part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PerPart<T> {
    pub head: T,
    pub trunk: T,
    pub knee: T,
    pub heel: T,
}

impl<T> PerPart<T> {
    pub fn from_fn(mut f: impl FnMut(BodyPart) -> T) -> Self {
        Self {
            head: f(BodyPart::Head),
            trunk: f(BodyPart::Trunk),
            knee: f(BodyPart::Knee),
            heel: f(BodyPart::Heel),
        }
    }

    pub fn get(&self, part: BodyPart) -> &T {
        match part {
            BodyPart::Head => &self.head,
            BodyPart::Trunk => &self.trunk,
            BodyPart::Knee => &self.knee,
            BodyPart::Heel => &self.heel,
        }
    }

    pub fn get_mut(&mut self, part: BodyPart) -> &mut T {
        match part {
            BodyPart::Head => &mut self.head,
            BodyPart::Trunk => &mut self.trunk,
            BodyPart::Knee => &mut self.knee,
            BodyPart::Heel => &mut self.heel,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(BodyPart, &T) -> U) -> PerPart<U> {
        PerPart::from_fn(|p| f(p, self.get(p)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyPart, &T)> {
        BodyPart::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

/// Per-frame deviation flags.
pub type PartFlags = PerPart<bool>;

impl PartFlags {
    pub fn any(&self) -> bool {
        self.head || self.trunk || self.knee || self.heel
    }
}

/// Standing references captured once per session for the rules that
/// compare against them.
#[derive(Debug, Clone, Default)]
pub struct References {
    heel_y: CalibrationBuffer,
    knee_x: CalibrationBuffer,
    ankle_x: CalibrationBuffer,
    ear_shoulder_span: Option<f64>,
}

impl References {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one detected frame. Missing landmarks simply leave the
    /// corresponding buffer where it was.
    pub fn observe(&mut self, lm: &Landmarks) {
        if let Ok(heel) = point(lm, LandmarkId::RightHeel) {
            self.heel_y.observe(heel.y);
        }
        if let Ok(knee) = point(lm, LandmarkId::RightKnee) {
            self.knee_x.observe(knee.x);
        }
        if let Ok(ankle) = point(lm, LandmarkId::RightAnkle) {
            self.ankle_x.observe(ankle.x);
        }
        if self.ear_shoulder_span.is_none() {
            if let (Ok(ear), Ok(shoulder)) = (
                point(lm, LandmarkId::RightEar),
                point(lm, LandmarkId::RightShoulder),
            ) {
                self.ear_shoulder_span = Some(shoulder.y - ear.y);
            }
        }
    }

    pub fn heel_y(&self) -> Option<f64> {
        self.heel_y.baseline()
    }

    pub fn knee_x(&self) -> Option<f64> {
        self.knee_x.baseline()
    }

    pub fn ankle_x(&self) -> Option<f64> {
        self.ankle_x.baseline()
    }

    pub fn ear_shoulder_span(&self) -> Option<f64> {
        self.ear_shoulder_span
    }
}

/// A geometric rule deciding whether one body part deviates in one frame.
pub trait DeviationRule {
    fn evaluate(&self, lm: &Landmarks, refs: &References) -> Result<bool, ClassifierError>;
}

fn point(lm: &Landmarks, id: LandmarkId) -> Result<&Landmark, ClassifierError> {
    match lm.get(&id) {
        Some(p) if p.is_finite() => Ok(p),
        _ => Err(ClassifierError::MissingLandmark(id)),
    }
}

/// Angle of the vector `from → to` in degrees, in image coordinates.
#[inline]
pub fn angle_deg(from: &Landmark, to: &Landmark) -> f64 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

impl DeviationRule for HeadRule {
    fn evaluate(&self, lm: &Landmarks, refs: &References) -> Result<bool, ClassifierError> {
        match *self {
            HeadRule::NoseShoulderOffset { max_offset_x } => {
                let nose = point(lm, LandmarkId::Nose)?;
                let left = point(lm, LandmarkId::LeftShoulder)?;
                let right = point(lm, LandmarkId::RightShoulder)?;
                let mid_x = (left.x + right.x) / 2.0;
                Ok((nose.x - mid_x).abs() > max_offset_x)
            }
            HeadRule::EarEyeLevel { max_tilt_deg } => {
                let ear = point(lm, LandmarkId::RightEar)?;
                let eye = point(lm, LandmarkId::RightEye)?;
                if ear.x == eye.x && ear.y == eye.y {
                    return Err(ClassifierError::DegenerateGeometry("ear and eye coincide"));
                }
                let a = angle_deg(ear, eye).abs();
                // the eye may sit on either side of the ear
                let tilt = a.min(180.0 - a);
                Ok(tilt > max_tilt_deg)
            }
            HeadRule::EarShoulderSpan { tolerance } => {
                let ear = point(lm, LandmarkId::RightEar)?;
                let shoulder = point(lm, LandmarkId::RightShoulder)?;
                let reference = refs
                    .ear_shoulder_span()
                    .ok_or(ClassifierError::DegenerateGeometry("no reference ear-shoulder span"))?;
                if reference.abs() < f64::EPSILON {
                    return Err(ClassifierError::DegenerateGeometry(
                        "reference ear-shoulder span is zero",
                    ));
                }
                let span = shoulder.y - ear.y;
                Ok((span - reference).abs() > tolerance * reference.abs())
            }
        }
    }
}

fn gate(
    id: LandmarkId,
    x: f64,
    reference: Option<f64>,
    tolerance: f64,
) -> Result<(), ClassifierError> {
    match reference {
        Some(r) if (x - r).abs() > tolerance => Err(ClassifierError::TrackingJump {
            landmark: id,
            drift: (x - r).abs(),
        }),
        _ => Ok(()),
    }
}

impl DeviationRule for TrunkRule {
    fn evaluate(&self, lm: &Landmarks, refs: &References) -> Result<bool, ClassifierError> {
        let shoulder = point(lm, LandmarkId::RightShoulder)?;
        let hip = point(lm, LandmarkId::RightHip)?;
        let trunk_angle = angle_deg(shoulder, hip);
        match *self {
            TrunkRule::TibiaParallel { position_gate } => {
                let knee = point(lm, LandmarkId::RightKnee)?;
                let ankle = point(lm, LandmarkId::RightAnkle)?;
                if let Some(tol) = position_gate {
                    gate(LandmarkId::RightKnee, knee.x, refs.knee_x(), tol)?;
                    gate(LandmarkId::RightAnkle, ankle.x, refs.ankle_x(), tol)?;
                }
                let tibia_angle = angle_deg(knee, ankle);
                Ok(trunk_angle < tibia_angle)
            }
            TrunkRule::AngleWindow { min_deg, max_deg } => {
                let a = trunk_angle.abs();
                Ok(a < min_deg || a > max_deg)
            }
        }
    }
}

impl DeviationRule for KneeRule {
    fn evaluate(&self, lm: &Landmarks, _refs: &References) -> Result<bool, ClassifierError> {
        let knee = point(lm, LandmarkId::RightKnee)?;
        match *self {
            KneeRule::ToeTravel { foot_fraction } => {
                let toe = point(lm, LandmarkId::RIGHT_BIG_TOE)?;
                let heel = point(lm, LandmarkId::RightHeel)?;
                let foot_length_x = (toe.x - heel.x).abs();
                Ok(knee.x > toe.x + foot_fraction * foot_length_x)
            }
            KneeRule::HipAnkleCorridor { margin_x } => {
                let hip = point(lm, LandmarkId::RightHip)?;
                let ankle = point(lm, LandmarkId::RightAnkle)?;
                let lo = hip.x.min(ankle.x) - margin_x;
                let hi = hip.x.max(ankle.x) + margin_x;
                Ok(knee.x < lo || knee.x > hi)
            }
        }
    }
}

impl DeviationRule for HeelRule {
    fn evaluate(&self, lm: &Landmarks, refs: &References) -> Result<bool, ClassifierError> {
        let heel = point(lm, LandmarkId::RightHeel)?;
        let ankle_lift = |max_lift: f64| -> Result<bool, ClassifierError> {
            let ankle = point(lm, LandmarkId::RightAnkle)?;
            Ok(ankle.y - heel.y > max_lift)
        };
        match *self {
            HeelRule::AnkleLift { max_lift } => ankle_lift(max_lift),
            HeelRule::CalibratedHeight { tolerance } => match refs.heel_y() {
                Some(reference) => Ok(heel.y < reference - tolerance),
                None => ankle_lift(tolerance),
            },
        }
    }
}

impl RuleSet {
    pub fn evaluate(
        &self,
        part: BodyPart,
        lm: &Landmarks,
        refs: &References,
    ) -> Result<bool, ClassifierError> {
        match part {
            BodyPart::Head => self.head.evaluate(lm, refs),
            BodyPart::Trunk => self.trunk.evaluate(lm, refs),
            BodyPart::Knee => self.knee.evaluate(lm, refs),
            BodyPart::Heel => self.heel.evaluate(lm, refs),
        }
    }
}
