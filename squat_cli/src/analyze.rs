//! Source assembly and execution for the `analyze` and `simulate` commands.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use squat_core::error::{AnalysisError, Result as CoreResult};
use squat_core::runner::{FeedMode, RunOutcome, RunParams};
use squat_core::util::MILLIS_PER_SEC;
use squat_sources::{JsonlFrameSource, ReplaySource, SyntheticSquat};
use squat_traits::FrameSource;

use crate::cli::{FaultArg, InputFormat};

/// Queue depth for `--threaded` runs.
const FEED_QUEUE: usize = 64;

type BoxedSource = Box<dyn FrameSource + Send>;

pub struct Finished {
    pub run: RunOutcome,
    /// Duration used for the errors-per-second figures.
    pub duration_s: Option<f64>,
}

fn resolve_format(input: &Path, format: InputFormat) -> InputFormat {
    match format {
        InputFormat::Auto => {
            let is_csv = input
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            if is_csv {
                InputFormat::Csv
            } else {
                InputFormat::Jsonl
            }
        }
        f => f,
    }
}

fn open_source(input: &Path, format: InputFormat) -> CoreResult<BoxedSource> {
    match resolve_format(input, format) {
        InputFormat::Csv => {
            let frames = squat_config::load_frames_csv(input)
                .map_err(|e| AnalysisError::Source(format!("{e:#}")))?;
            tracing::info!(path = %input.display(), frames = frames.len(), "loaded CSV trace");
            Ok(Box::new(ReplaySource::new(frames)))
        }
        InputFormat::Jsonl | InputFormat::Auto => {
            let src = JsonlFrameSource::open(input).map_err(|e| {
                AnalysisError::Source(format!("open trace {}: {e}", input.display()))
            })?;
            Ok(Box::new(src))
        }
    }
}

fn execute(
    cfg: &squat_config::Config,
    source: BoxedSource,
    threaded: bool,
    timeline: bool,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<RunOutcome> {
    let mode = if threaded {
        FeedMode::Threaded {
            capacity: FEED_QUEUE,
        }
    } else {
        FeedMode::Direct
    };
    let params = RunParams {
        config: cfg.into(),
        mode,
        shutdown: Some(shutdown),
        collect_timeline: timeline,
    };
    let out = squat_core::runner::run(source, params)?;
    tracing::info!(
        repetitions = out.result.repetitions_detected(),
        frames = out.stats.frames_seen,
        classified = out.stats.frames_classified,
        dropped = out.stats.out_of_order,
        "analysis complete"
    );
    Ok(out)
}

fn duration_or_last(explicit: Option<f64>, run: &RunOutcome) -> Option<f64> {
    explicit.or_else(|| {
        let s = run.last_timestamp_ms / MILLIS_PER_SEC;
        (s > 0.0).then_some(s)
    })
}

pub fn run_analyze(
    cfg: &squat_config::Config,
    input: &Path,
    format: InputFormat,
    duration_s: Option<f64>,
    threaded: bool,
    timeline: bool,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<Finished> {
    if let Some(d) = duration_s {
        if !(d.is_finite() && d > 0.0) {
            return Err(AnalysisError::Config("--duration-s must be > 0".into()).into());
        }
    }
    let source = open_source(input, format)?;
    let run = execute(cfg, source, threaded, timeline, shutdown)?;
    let duration_s = duration_or_last(duration_s, &run);
    Ok(Finished { run, duration_s })
}

pub fn run_simulate(
    cfg: &squat_config::Config,
    reps: u32,
    fps: Option<f64>,
    faults: &[FaultArg],
    noise: Option<f64>,
    timeline: bool,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<Finished> {
    let fps = fps.unwrap_or(cfg.input.fps);
    if !(fps.is_finite() && fps > 0.0) {
        return Err(AnalysisError::Config("--fps must be > 0".into()).into());
    }
    let mut subject =
        SyntheticSquat::new(reps, fps).with_faults(faults.iter().copied().map(Into::into));
    if let Some(a) = noise {
        subject = subject.with_noise(a, 0x5EED);
    }
    let duration_s = Some(subject.duration_s());
    tracing::info!(reps, fps, faults = ?faults, "simulating subject");
    let run = execute(cfg, Box::new(subject), false, timeline, shutdown)?;
    Ok(Finished { run, duration_s })
}
