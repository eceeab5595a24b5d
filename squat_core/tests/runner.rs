use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rstest::rstest;
use squat_core::error::AnalysisError;
use squat_core::mocks::{FailingSource, ear_trace, one_rep_trace, upright_pose};
use squat_core::runner::{FeedMode, RunParams, run};
use squat_sources::ReplaySource;
use squat_traits::{Frame, FrameSource};

fn one_rep_source() -> ReplaySource {
    ReplaySource::new(ear_trace(&one_rep_trace(), 30.0))
}

#[rstest]
#[case::direct(FeedMode::Direct)]
#[case::threaded(FeedMode::Threaded { capacity: 4 })]
#[case::threaded_unit_queue(FeedMode::Threaded { capacity: 1 })]
fn both_feed_modes_agree(#[case] mode: FeedMode) {
    let out = run(
        one_rep_source(),
        RunParams {
            mode,
            collect_timeline: true,
            ..RunParams::default()
        },
    )
    .unwrap();
    assert_eq!(out.result.repetitions_detected(), 1);
    assert_eq!(out.stats.frames_seen, 40);
    assert_eq!(out.timeline.len(), 40);
    assert!((out.last_timestamp_ms - 40_000.0 / 30.0).abs() < 1e-9);
}

#[test]
fn timeline_is_empty_unless_requested() {
    let out = run(one_rep_source(), RunParams::default()).unwrap();
    assert!(out.timeline.is_empty());
}

#[rstest]
#[case::direct(FeedMode::Direct)]
#[case::threaded(FeedMode::Threaded { capacity: 2 })]
fn source_failure_is_typed(#[case] mode: FeedMode) {
    let err = run(
        FailingSource::new(one_rep_source(), 5),
        RunParams {
            mode,
            ..RunParams::default()
        },
    )
    .expect_err("source fails after five frames");
    match err.downcast_ref::<AnalysisError>() {
        Some(AnalysisError::Source(msg)) => assert!(msg.contains("mock source failure")),
        other => panic!("expected Source error, got {other:?}"),
    }
}

/// Serves the one-repetition trace, then raises the shutdown flag and keeps
/// the subject standing forever.
struct InterruptedAfterTrace {
    inner: ReplaySource,
    flag: Arc<AtomicBool>,
    next_ts: f64,
}

impl FrameSource for InterruptedAfterTrace {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(frame) = self.inner.next_frame()? {
            self.next_ts = frame.timestamp_ms + 1000.0 / 30.0;
            return Ok(Some(frame));
        }
        self.flag.store(true, Ordering::Relaxed);
        let frame = Frame::detected(self.next_ts, upright_pose(0.40));
        self.next_ts += 1000.0 / 30.0;
        Ok(Some(frame))
    }
}

#[rstest]
#[case::direct(FeedMode::Direct)]
#[case::threaded(FeedMode::Threaded { capacity: 1 })]
fn raised_shutdown_flag_stops_before_the_first_frame(#[case] mode: FeedMode) {
    let out = run(
        one_rep_source(),
        RunParams {
            mode,
            shutdown: Some(Arc::new(AtomicBool::new(true))),
            ..RunParams::default()
        },
    )
    .unwrap();
    assert!(out.cancelled);
    assert_eq!(out.stats.frames_seen, 0);
    assert_eq!(out.result.repetitions_detected(), 0);
}

// Direct mode only: a feeder thread reads ahead, so the flag would race the
// consumer.
#[test]
fn cancellation_keeps_repetitions_completed_before_it() {
    let flag = Arc::new(AtomicBool::new(false));
    let source = InterruptedAfterTrace {
        inner: one_rep_source(),
        flag: Arc::clone(&flag),
        next_ts: 0.0,
    };
    let out = run(
        source,
        RunParams {
            shutdown: Some(flag),
            ..RunParams::default()
        },
    )
    .unwrap();
    assert!(out.cancelled);
    assert_eq!(out.stats.frames_seen, 41);
    assert_eq!(out.result.repetitions_detected(), 1);
    assert_eq!(out.result.completed_repetitions(), 1);
    assert!((out.result.slots()[0].timestamp_s - 40.0 / 30.0).abs() < 1e-9);
}

#[test]
fn uninterrupted_run_is_not_cancelled() {
    let out = run(
        one_rep_source(),
        RunParams {
            shutdown: Some(Arc::new(AtomicBool::new(false))),
            ..RunParams::default()
        },
    )
    .unwrap();
    assert!(!out.cancelled);
}

#[test]
fn invalid_config_fails_before_reading() {
    let mut params = RunParams::default();
    params.config.debounce.knee = 0;
    let err = run(one_rep_source(), params).unwrap_err();
    assert!(err.to_string().contains("debounce"));
}
