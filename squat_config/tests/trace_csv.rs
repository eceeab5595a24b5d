use squat_config::{load_frames_csv, parse_frames_csv};
use squat_traits::LandmarkId;
use std::fs;
use std::io::Write;
use tempfile::tempdir;

#[test]
fn groups_rows_into_frames() {
    let csv = "\
timestamp_ms,landmark,x,y,z
0,right_ear,0.50,0.40,0.0
0,right_shoulder,0.50,0.30,
33.3,,,,
66.7,right_big_toe,0.56,0.92,0.1
";
    let frames = parse_frames_csv(csv.as_bytes()).expect("valid trace");
    assert_eq!(frames.len(), 3);

    let first = &frames[0];
    assert_eq!(first.timestamp_ms, 0.0);
    assert_eq!(first.landmarks.as_ref().map(|l| l.len()), Some(2));
    let shoulder = first.landmark(LandmarkId::RightShoulder).unwrap();
    assert_eq!(shoulder.z, 0.0);

    assert!(!frames[1].has_detection());

    let toe = frames[2].landmark(LandmarkId::RightFootIndex).unwrap();
    assert_eq!(toe.x, 0.56);
    assert_eq!(toe.z, 0.1);
}

#[test]
fn rejects_wrong_headers() {
    let csv = "t,name,x,y,z\n0,nose,0.5,0.5,0\n";
    let err = parse_frames_csv(csv.as_bytes()).expect_err("bad headers");
    assert!(err.to_string().contains("trace CSV must have headers"));
}

#[test]
fn rejects_decreasing_timestamps() {
    let csv = "\
timestamp_ms,landmark,x,y,z
10,nose,0.5,0.5,0
5,nose,0.5,0.5,0
";
    let err = parse_frames_csv(csv.as_bytes()).expect_err("out of order");
    assert!(err.to_string().contains("row 3"), "{err}");
}

#[test]
fn rejects_unknown_landmark_and_missing_coordinates() {
    let unknown = "timestamp_ms,landmark,x,y,z\n0,tail,0.5,0.5,0\n";
    let err = parse_frames_csv(unknown.as_bytes()).expect_err("unknown landmark");
    assert!(err.to_string().contains("unknown landmark 'tail'"));

    let missing = "timestamp_ms,landmark,x,y,z\n0,nose,0.5,,0\n";
    let err = parse_frames_csv(missing.as_bytes()).expect_err("missing y");
    assert!(err.to_string().contains("missing x or y"));
}

#[test]
fn rejects_empty_row_after_detections_in_same_frame() {
    let csv = "timestamp_ms,landmark,x,y,z\n0,nose,0.5,0.5,0\n0,,,,\n";
    let err = parse_frames_csv(csv.as_bytes()).expect_err("mixed frame");
    assert!(err.to_string().contains("empty landmark row"));
}

#[test]
fn loads_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.csv");
    let mut f = fs::File::create(&path).unwrap();
    writeln!(f, "timestamp_ms,landmark,x,y,z").unwrap();
    writeln!(f, "0,right_heel,0.47,0.91,0").unwrap();
    writeln!(f, "33.3,right_heel,0.47,0.91,0").unwrap();
    drop(f);

    let frames = load_frames_csv(&path).expect("load");
    assert_eq!(frames.len(), 2);

    let err = load_frames_csv(&dir.path().join("missing.csv")).expect_err("missing file");
    assert!(err.to_string().contains("open trace CSV"));
}
