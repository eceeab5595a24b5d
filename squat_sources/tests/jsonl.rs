use std::io::{Cursor, Write};

use rstest::rstest;
use squat_sources::{JsonlFrameSource, SourceError};
use squat_traits::{FrameSource, LandmarkId};

const TRACE: &str = r#"
{"timestamp_ms": 0, "landmarks": {"right_ear": {"x": 0.5, "y": 0.40}}}

{"timestamp_ms": 33.3, "landmarks": null}
{"timestamp_ms": 66.7, "landmarks": {"right_ear": {"x": 0.5, "y": 0.41}, "nose": {"x": 0.52, "y": 0.42}}}
"#;

#[test]
fn reads_frames_and_skips_blank_lines() {
    let mut src = JsonlFrameSource::new(Cursor::new(TRACE));
    let mut frames = Vec::new();
    while let Some(f) = src.read_frame().unwrap() {
        frames.push(f);
    }
    assert_eq!(frames.len(), 3);
    assert!(frames[1].landmarks.is_none());
    assert_eq!(frames[2].landmark(LandmarkId::Nose).map(|p| p.x), Some(0.52));
    assert_eq!(src.line(), 5);
    // end of stream is sticky
    assert!(src.read_frame().unwrap().is_none());
}

#[rstest]
#[case("not json", 1)]
#[case("{\"timestamp_ms\": 1}\n{\"landmarks\": null}", 2)]
#[case("{\"timestamp_ms\": 1, \"landmarks\": {\"left_hand\": {\"x\": 0, \"y\": 0}}}", 1)]
fn malformed_lines_report_their_number(#[case] input: &str, #[case] bad_line: usize) {
    let mut src = JsonlFrameSource::new(Cursor::new(input.to_string()));
    let err = loop {
        match src.read_frame() {
            Ok(Some(_)) => continue,
            Ok(None) => panic!("expected a parse error"),
            Err(e) => break e,
        }
    };
    match err {
        SourceError::Parse { line, .. } => assert_eq!(line, bad_line),
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(src.read_frame(), Err(SourceError::Exhausted)));
}

#[test]
fn opens_files_and_boxes_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"timestamp_ms": 5}}"#).unwrap();
    writeln!(file, "{{broken").unwrap();
    let mut src = JsonlFrameSource::open(file.path()).unwrap();
    assert!(src.next_frame().unwrap().is_some());
    let boxed = src.next_frame().unwrap_err();
    let typed = boxed.downcast_ref::<SourceError>().expect("typed source error");
    assert!(matches!(typed, SourceError::Parse { line: 2, .. }));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonlFrameSource::open(&dir.path().join("absent.jsonl")).err().unwrap();
    assert!(matches!(err, SourceError::Io(_)));
}
