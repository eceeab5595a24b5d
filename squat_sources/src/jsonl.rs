//! JSON-lines frame reader.
//!
//! Each non-blank line is one frame:
//!
//! ```json
//! {"timestamp_ms": 33.3, "landmarks": {"right_ear": {"x": 0.5, "y": 0.4}}}
//! {"timestamp_ms": 66.7, "landmarks": null}
//! {"timestamp_ms": 100.0, "landmarks": [{"x": 0.5, "y": 0.2, "z": -0.1}, ...]}
//! ```
//!
//! `landmarks` is either an object keyed by landmark name, an array of all
//! 33 points in estimator order, or `null`/absent for "no body detected".

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use squat_traits::{Frame, FrameSource, Landmark, LandmarkId, Landmarks};

use crate::error::{Result, SourceError};

#[derive(Deserialize)]
struct RawFrame {
    timestamp_ms: f64,
    #[serde(default)]
    landmarks: Option<RawLandmarks>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLandmarks {
    Named(Landmarks),
    Indexed(Vec<Landmark>),
}

fn into_landmarks(raw: RawLandmarks) -> std::result::Result<Landmarks, String> {
    match raw {
        RawLandmarks::Named(map) => Ok(map),
        RawLandmarks::Indexed(points) => {
            if points.len() != LandmarkId::COUNT {
                return Err(format!(
                    "indexed landmarks must have {} points, got {}",
                    LandmarkId::COUNT,
                    points.len()
                ));
            }
            Ok(LandmarkId::ALL.into_iter().zip(points).collect())
        }
    }
}

/// Parse one JSONL line (1-based `line` for error messages).
pub fn parse_frame_line(text: &str, line: usize) -> Result<Frame> {
    let raw: RawFrame = serde_json::from_str(text).map_err(|e| SourceError::Parse {
        line,
        message: e.to_string(),
    })?;
    if !raw.timestamp_ms.is_finite() {
        return Err(SourceError::Parse {
            line,
            message: "timestamp_ms must be finite".into(),
        });
    }
    let landmarks = raw
        .landmarks
        .map(into_landmarks)
        .transpose()
        .map_err(|message| SourceError::Parse { line, message })?;
    Ok(Frame {
        timestamp_ms: raw.timestamp_ms,
        landmarks,
    })
}

pub struct JsonlFrameSource<R> {
    reader: R,
    line: usize,
    buf: String,
    failed: bool,
}

impl JsonlFrameSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        tracing::debug!(path = %path.display(), "opened JSONL frame source");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonlFrameSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
            failed: false,
        }
    }

    /// Lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Typed variant of [`FrameSource::next_frame`].
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        if self.failed {
            return Err(SourceError::Exhausted);
        }
        let res = self.read_inner();
        if res.is_err() {
            self.failed = true;
        }
        res
    }

    fn read_inner(&mut self) -> Result<Option<Frame>> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            return parse_frame_line(text, self.line).map(Some);
        }
    }
}

impl<R: BufRead> FrameSource for JsonlFrameSource<R> {
    fn next_frame(
        &mut self,
    ) -> std::result::Result<Option<Frame>, Box<dyn std::error::Error + Send + Sync>> {
        self.read_frame().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_indexed_and_empty_frames() {
        let named = parse_frame_line(
            r#"{"timestamp_ms": 10, "landmarks": {"right_ear": {"x": 0.5, "y": 0.4}, "right_big_toe": {"x": 0.6, "y": 0.9, "z": 0.1}}}"#,
            1,
        )
        .unwrap();
        let lm = named.landmarks.unwrap();
        assert_eq!(lm[&LandmarkId::RightEar], Landmark::xy(0.5, 0.4));
        assert!(lm.contains_key(&LandmarkId::RightFootIndex));

        let points: Vec<String> = (0..33)
            .map(|i| format!(r#"{{"x": {}, "y": 0.5, "visibility": 0.9}}"#, f64::from(i) / 100.0))
            .collect();
        let indexed = parse_frame_line(
            &format!(r#"{{"timestamp_ms": 20, "landmarks": [{}]}}"#, points.join(",")),
            2,
        )
        .unwrap();
        let lm = indexed.landmarks.unwrap();
        assert_eq!(lm.len(), 33);
        assert_eq!(lm[&LandmarkId::Nose].x, 0.0);
        assert_eq!(lm[&LandmarkId::RightEar].x, 0.08);

        let empty = parse_frame_line(r#"{"timestamp_ms": 30}"#, 3).unwrap();
        assert!(empty.landmarks.is_none());
        let null = parse_frame_line(r#"{"timestamp_ms": 40, "landmarks": null}"#, 4).unwrap();
        assert!(null.landmarks.is_none());
    }

    #[test]
    fn short_index_list_is_rejected() {
        let err = parse_frame_line(r#"{"timestamp_ms": 1, "landmarks": [{"x": 0, "y": 0}]}"#, 9)
            .unwrap_err();
        match err {
            SourceError::Parse { line, message } => {
                assert_eq!(line, 9);
                assert!(message.contains("33"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
