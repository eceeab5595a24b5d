//! One sample of the pose stream.

use serde::{Deserialize, Serialize};

use crate::landmark::{Landmark, LandmarkId, Landmarks};

/// Keypoints for one video frame. `landmarks == None` means the estimator
/// found no body in this frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp_ms: f64,
    #[serde(default)]
    pub landmarks: Option<Landmarks>,
}

impl Frame {
    /// Frame without a detected body.
    pub fn empty(timestamp_ms: f64) -> Self {
        Self {
            timestamp_ms,
            landmarks: None,
        }
    }

    pub fn detected(timestamp_ms: f64, landmarks: Landmarks) -> Self {
        Self {
            timestamp_ms,
            landmarks: Some(landmarks),
        }
    }

    /// Look up a single keypoint; `None` when no body or the point is absent.
    #[inline]
    pub fn landmark(&self, id: LandmarkId) -> Option<&Landmark> {
        self.landmarks.as_ref().and_then(|lm| lm.get(&id))
    }

    #[inline]
    pub fn has_detection(&self) -> bool {
        self.landmarks.is_some()
    }
}
