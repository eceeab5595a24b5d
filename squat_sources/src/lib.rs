//! Frame sources feeding the squat analysis engine.
//!
//! - [`JsonlFrameSource`]: one JSON frame per line, as written by a pose
//!   estimator process.
//! - [`ReplaySource`]: frames already in memory (e.g. a parsed CSV trace).
//! - [`SyntheticSquat`]: a deterministic squatting subject for demos and tests.

pub mod error;
pub mod jsonl;
pub mod synthetic;

pub use error::SourceError;
pub use jsonl::JsonlFrameSource;
pub use synthetic::{Fault, SyntheticSquat};

use squat_traits::{Frame, FrameSource};
use std::collections::VecDeque;

/// Plays back frames held in memory.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    frames: VecDeque<Frame>,
}

impl ReplaySource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> std::result::Result<Option<Frame>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.frames.pop_front())
    }
}
