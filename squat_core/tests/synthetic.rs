//! Whole-pipeline checks against the synthetic squatting subject.

use rstest::rstest;
use squat_core::runner::{FeedMode, RunParams, run};
use squat_core::{BodyPart, RepetitionStatus, SessionReport, Verdict};
use squat_sources::{Fault, SyntheticSquat};

fn analyze(src: SyntheticSquat) -> squat_core::runner::RunOutcome {
    run(src, RunParams::default()).unwrap()
}

#[rstest]
#[case(0, 0)]
#[case(1, 1)]
#[case(2, 2)]
#[case(3, 3)]
#[case(5, 3)]
fn clean_reps_are_counted(#[case] reps: u32, #[case] expected: u8) {
    let out = analyze(SyntheticSquat::new(reps, 30.0));
    assert_eq!(out.result.repetitions_detected(), expected);
    assert_eq!(out.result.completed_repetitions(), expected);
    assert!(!out.result.summary().any());
}

#[rstest]
#[case(Fault::Head, BodyPart::Head)]
#[case(Fault::Trunk, BodyPart::Trunk)]
#[case(Fault::Knee, BodyPart::Knee)]
#[case(Fault::Heel, BodyPart::Heel)]
fn injected_fault_fails_only_that_part(#[case] fault: Fault, #[case] part: BodyPart) {
    let out = analyze(SyntheticSquat::new(3, 30.0).with_fault(fault));
    let r = &out.result;
    assert_eq!(r.repetitions_detected(), 3);
    for p in BodyPart::ALL {
        assert_eq!(r.part_failed(p), p == part, "{p} with fault {fault}");
    }
    for slot in r.slots() {
        assert_eq!(slot.status, RepetitionStatus::Completed);
        assert!(*slot.error_totals.get(part) >= 1);
    }

    let report = SessionReport::new(r, Some(out.last_timestamp_ms / 1000.0));
    let row = report.row(part).unwrap();
    assert_eq!(row.verdict, Verdict::Fail);
    assert!(row.errors_per_second.is_some_and(|v| v > 0.0));
}

#[test]
fn noisy_threaded_run_with_dropouts_still_counts() {
    let src = SyntheticSquat::new(2, 30.0)
        .with_noise(0.001, 42)
        .with_dropout_every(13);
    let out = run(
        src,
        RunParams {
            mode: FeedMode::Threaded { capacity: 8 },
            ..RunParams::default()
        },
    )
    .unwrap();
    assert_eq!(out.result.repetitions_detected(), 2);
    assert!(out.stats.missing_detection > 0);
}
