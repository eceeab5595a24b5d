#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Squat analysis engine (source-agnostic).
//!
//! Turns a stream of pose landmarks into a per-repetition verdict for four
//! body parts. All frame acquisition goes through `squat_traits::FrameSource`.
//!
//! ## Architecture
//!
//! - **Calibration**: warm-up buffer freezing a standing baseline (`calibration`)
//! - **Phase**: idle / descending / ascending / completed state machine (`phase`)
//! - **Classification**: one geometric rule per body part (`classify`)
//! - **Debounce**: consecutive-frame promotion of deviations to errors (`debounce`)
//! - **Aggregation**: at most three repetition records, padded at the end
//!   (`aggregate`, `result`)
//! - **Session**: the per-analysis owner of all of the above (`session`)
//!
//! Frames are processed strictly in order on one thread; `runner` can read
//! ahead on a feeder thread (`feeder`) without sharing any engine state.

pub mod aggregate;
pub mod builder;
pub mod calibration;
pub mod classify;
pub mod config;
pub mod conversions;
pub mod debounce;
pub mod error;
pub mod feeder;
pub mod mocks;
pub mod phase;
pub mod report;
pub mod result;
pub mod runner;
pub mod session;
pub mod source_error;
pub mod util;

pub use aggregate::{MAX_REPETITIONS, RepetitionRecord, RepetitionStatus};
pub use builder::AnalysisSessionBuilder;
pub use calibration::{CALIBRATION_WINDOW, CalibrationBuffer};
pub use classify::{BodyPart, DeviationRule, PartFlags, PerPart};
pub use config::*;
pub use debounce::DebounceCounter;
pub use phase::{PhaseDetector, PhaseState, PhaseUpdate, REBOUND_FACTOR};
pub use report::{PartReport, SessionReport, Verdict};
pub use result::AnalysisResult;
pub use session::{AnalysisSession, AnalysisStats, FrameOutcome, SkipReason};
