//! Pose keypoint identifiers and normalized coordinates.
//!
//! The topology follows the 33-point full-body model used by common pose
//! estimators. Coordinates are normalized to the frame (`0..1`), with `y`
//! growing downward.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of a single body keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkId {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    #[serde(alias = "left_big_toe")]
    LeftFootIndex,
    #[serde(alias = "right_big_toe")]
    RightFootIndex,
}

impl LandmarkId {
    /// Number of keypoints in the topology.
    pub const COUNT: usize = 33;

    /// Big toe aliases; the estimator reports the toe tip as "foot index".
    pub const LEFT_BIG_TOE: LandmarkId = LandmarkId::LeftFootIndex;
    pub const RIGHT_BIG_TOE: LandmarkId = LandmarkId::RightFootIndex;

    pub const ALL: [LandmarkId; Self::COUNT] = [
        LandmarkId::Nose,
        LandmarkId::LeftEyeInner,
        LandmarkId::LeftEye,
        LandmarkId::LeftEyeOuter,
        LandmarkId::RightEyeInner,
        LandmarkId::RightEye,
        LandmarkId::RightEyeOuter,
        LandmarkId::LeftEar,
        LandmarkId::RightEar,
        LandmarkId::MouthLeft,
        LandmarkId::MouthRight,
        LandmarkId::LeftShoulder,
        LandmarkId::RightShoulder,
        LandmarkId::LeftElbow,
        LandmarkId::RightElbow,
        LandmarkId::LeftWrist,
        LandmarkId::RightWrist,
        LandmarkId::LeftPinky,
        LandmarkId::RightPinky,
        LandmarkId::LeftIndex,
        LandmarkId::RightIndex,
        LandmarkId::LeftThumb,
        LandmarkId::RightThumb,
        LandmarkId::LeftHip,
        LandmarkId::RightHip,
        LandmarkId::LeftKnee,
        LandmarkId::RightKnee,
        LandmarkId::LeftAnkle,
        LandmarkId::RightAnkle,
        LandmarkId::LeftHeel,
        LandmarkId::RightHeel,
        LandmarkId::LeftFootIndex,
        LandmarkId::RightFootIndex,
    ];

    /// Position of this keypoint in the estimator's output array.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stable snake_case name, as used in trace files.
    pub fn name(self) -> &'static str {
        match self {
            LandmarkId::Nose => "nose",
            LandmarkId::LeftEyeInner => "left_eye_inner",
            LandmarkId::LeftEye => "left_eye",
            LandmarkId::LeftEyeOuter => "left_eye_outer",
            LandmarkId::RightEyeInner => "right_eye_inner",
            LandmarkId::RightEye => "right_eye",
            LandmarkId::RightEyeOuter => "right_eye_outer",
            LandmarkId::LeftEar => "left_ear",
            LandmarkId::RightEar => "right_ear",
            LandmarkId::MouthLeft => "mouth_left",
            LandmarkId::MouthRight => "mouth_right",
            LandmarkId::LeftShoulder => "left_shoulder",
            LandmarkId::RightShoulder => "right_shoulder",
            LandmarkId::LeftElbow => "left_elbow",
            LandmarkId::RightElbow => "right_elbow",
            LandmarkId::LeftWrist => "left_wrist",
            LandmarkId::RightWrist => "right_wrist",
            LandmarkId::LeftPinky => "left_pinky",
            LandmarkId::RightPinky => "right_pinky",
            LandmarkId::LeftIndex => "left_index",
            LandmarkId::RightIndex => "right_index",
            LandmarkId::LeftThumb => "left_thumb",
            LandmarkId::RightThumb => "right_thumb",
            LandmarkId::LeftHip => "left_hip",
            LandmarkId::RightHip => "right_hip",
            LandmarkId::LeftKnee => "left_knee",
            LandmarkId::RightKnee => "right_knee",
            LandmarkId::LeftAnkle => "left_ankle",
            LandmarkId::RightAnkle => "right_ankle",
            LandmarkId::LeftHeel => "left_heel",
            LandmarkId::RightHeel => "right_heel",
            LandmarkId::LeftFootIndex => "left_foot_index",
            LandmarkId::RightFootIndex => "right_foot_index",
        }
    }
}

impl fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a landmark name is not part of the topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLandmark(pub String);

impl fmt::Display for UnknownLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown landmark '{}'", self.0)
    }
}

impl std::error::Error for UnknownLandmark {}

impl FromStr for LandmarkId {
    type Err = UnknownLandmark;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        match key.as_str() {
            "left_big_toe" => return Ok(LandmarkId::LEFT_BIG_TOE),
            "right_big_toe" => return Ok(LandmarkId::RIGHT_BIG_TOE),
            _ => {}
        }
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name() == key)
            .ok_or_else(|| UnknownLandmark(s.to_string()))
    }
}

/// A single keypoint position. `z` is carried through but unused by the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar point, `z = 0`.
    #[inline]
    pub const fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// True when both planar coordinates are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Keypoints detected in one frame, keyed by identifier.
pub type Landmarks = BTreeMap<LandmarkId, Landmark>;
