use proptest::prelude::*;
use squat_core::mocks::{ear_trace, upright_pose};
use squat_core::{AnalysisSession, MAX_REPETITIONS};
use squat_traits::Frame;

prop_compose! {
    // Ear heights around a standing 0.40, with occasional lost detections.
    fn frames_strategy()(
        ys in prop::collection::vec(0.30f64..0.60, 0..400),
        gaps in prop::collection::vec(any::<bool>(), 0..400),
    ) -> Vec<Frame> {
        let mut frames = ear_trace(&ys, 30.0);
        for (f, gap) in frames.iter_mut().zip(gaps) {
            if gap && f.timestamp_ms as u64 % 7 == 0 {
                f.landmarks = None;
            }
        }
        frames
    }
}

fn analyze(frames: &[Frame]) -> squat_core::AnalysisResult {
    let mut s = AnalysisSession::builder().build().unwrap();
    for f in frames {
        s.process_frame(f);
    }
    s.finalize(frames.last().map_or(0.0, |f| f.timestamp_ms))
}

proptest! {
    #[test]
    fn result_is_bounded(frames in frames_strategy()) {
        let r = analyze(&frames);
        prop_assert!(usize::from(r.repetitions_detected()) <= MAX_REPETITIONS);
        prop_assert_eq!(r.slots().len(), MAX_REPETITIONS);
        prop_assert!(r.completed_repetitions() <= r.repetitions_detected());
        for (i, slot) in r.slots().iter().enumerate() {
            prop_assert_eq!(usize::from(slot.index), i);
        }
    }

    #[test]
    fn identical_input_identical_result(frames in frames_strategy()) {
        let a = analyze(&frames);
        let b = analyze(&frames);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn calibration_needs_ten_detected_frames(n in 0usize..10) {
        let mut s = AnalysisSession::builder().build().unwrap();
        for i in 0..n {
            s.process_frame(&Frame::detected(i as f64, upright_pose(0.4)));
        }
        prop_assert!(s.baseline().is_none());
    }
}
