//! Test helpers for squat_core: a failing source wrapper and synthetic
//! upright poses and ear traces. In-memory playback is
//! `squat_sources::ReplaySource`.

use squat_traits::{Frame, FrameSource, Landmark, LandmarkId, Landmarks};

use crate::util::frame_interval_ms;

/// Yields `ok_frames` frames from the inner source, then fails.
pub struct FailingSource<S> {
    inner: S,
    ok_frames: usize,
}

impl<S> FailingSource<S> {
    pub fn new(inner: S, ok_frames: usize) -> Self {
        Self { inner, ok_frames }
    }
}

impl<S: FrameSource> FrameSource for FailingSource<S> {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error + Send + Sync>> {
        if self.ok_frames == 0 {
            return Err(Box::new(std::io::Error::other("mock source failure")));
        }
        self.ok_frames -= 1;
        self.inner.next_frame()
    }
}

/// A side-view standing pose with every part inside the default tolerances,
/// with the head and shoulders shifted so the right ear sits at `ear_y`.
pub fn upright_pose(ear_y: f64) -> Landmarks {
    let dy = ear_y - 0.22;
    let mut lm = Landmarks::new();
    for (id, x, y) in [
        (LandmarkId::Nose, 0.53, 0.24 + dy),
        (LandmarkId::RightEye, 0.54, 0.22 + dy),
        (LandmarkId::LeftEar, 0.49, 0.22 + dy),
        (LandmarkId::RightEar, 0.50, ear_y),
        (LandmarkId::LeftShoulder, 0.50, 0.30 + dy),
        (LandmarkId::RightShoulder, 0.50, 0.30 + dy),
        (LandmarkId::RightHip, 0.48, 0.55 + dy / 2.0),
        (LandmarkId::RightKnee, 0.50, 0.72),
        (LandmarkId::RightAnkle, 0.50, 0.90),
        (LandmarkId::RightHeel, 0.47, 0.91),
        (LandmarkId::RightFootIndex, 0.56, 0.92),
    ] {
        lm.insert(id, Landmark::new(x, y, 0.0));
    }
    lm
}

/// Frames at `fps` following an ear trace, starting one interval after zero.
pub fn ear_trace(ear_ys: &[f64], fps: f64) -> Vec<Frame> {
    let dt = frame_interval_ms(fps);
    ear_ys
        .iter()
        .enumerate()
        .map(|(i, &y)| Frame::detected((i + 1) as f64 * dt, upright_pose(y)))
        .collect()
}

/// A 40-frame, one-repetition ear trace at 30 fps: 10 standing frames at
/// 0.40, a descent to 0.46, a slow rise and a final standing frame.
pub fn one_rep_trace() -> Vec<f64> {
    let mut ys = vec![0.40; 10];
    for i in 11..=25 {
        ys.push(0.40 + 0.06 * f64::from(i - 10) / 15.0);
    }
    for i in 26..=39 {
        ys.push(0.46 - f64::from(i - 25) * 0.003);
    }
    ys.push(0.40);
    ys
}
