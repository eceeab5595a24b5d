use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use squat_traits::{Frame, FrameSource};

use crate::config::AnalysisConfig;
use crate::error::Result as CoreResult;
use crate::feeder::FrameFeeder;
use crate::result::AnalysisResult;
use crate::session::{AnalysisSession, AnalysisStats, FrameOutcome};
use crate::source_error::map_source_error;

/// How frames reach the session.
#[derive(Debug, Clone, Copy, Default)]
pub enum FeedMode {
    /// Pull each frame from the source on the calling thread.
    #[default]
    Direct,
    /// Read ahead on a feeder thread through a bounded queue.
    Threaded { capacity: usize },
}

#[derive(Debug, Clone, Default)]
pub struct RunParams {
    pub config: AnalysisConfig,
    pub mode: FeedMode,
    /// Checked before every frame; once set, feeding stops and the frames
    /// seen so far are finalized.
    pub shutdown: Option<Arc<AtomicBool>>,
    /// Keep every `FrameOutcome`.
    pub collect_timeline: bool,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub result: AnalysisResult,
    pub stats: AnalysisStats,
    /// Timestamp of the last accepted frame, 0 for an empty stream.
    pub last_timestamp_ms: f64,
    pub timeline: Vec<FrameOutcome>,
    /// The shutdown flag ended the run before the source did.
    pub cancelled: bool,
}

/// Drive a session over a whole source and finalize it.
pub fn run<S>(source: S, params: RunParams) -> CoreResult<RunOutcome>
where
    S: FrameSource + Send + 'static,
{
    let RunParams {
        config,
        mode,
        shutdown,
        collect_timeline,
    } = params;
    let session = AnalysisSession::builder().with_config(config).build()?;
    let mut driver = Driver {
        session,
        shutdown,
        timeline: collect_timeline.then(Vec::new),
    };

    let mut cancelled = false;
    match mode {
        FeedMode::Direct => {
            let mut source = source;
            loop {
                if driver.cancelled() {
                    cancelled = true;
                    break;
                }
                match source.next_frame() {
                    Ok(Some(frame)) => driver.feed(&frame),
                    Ok(None) => break,
                    Err(e) => return Err(source_failure(e.as_ref())),
                }
            }
        }
        FeedMode::Threaded { capacity } => {
            let feeder = FrameFeeder::spawn(source, capacity);
            loop {
                if driver.cancelled() {
                    feeder.stop();
                    cancelled = true;
                    break;
                }
                match feeder.recv() {
                    Some(Ok(frame)) => driver.feed(&frame),
                    Some(Err(e)) => return Err(source_failure(e.as_ref())),
                    None => break,
                }
            }
        }
    }

    Ok(driver.finish(cancelled))
}

fn source_failure(e: &(dyn std::error::Error + Send + Sync + 'static)) -> eyre::Report {
    let mapped = map_source_error(e);
    tracing::error!(error = %mapped, "frame source failed");
    eyre::Report::new(mapped)
}

struct Driver {
    session: AnalysisSession,
    shutdown: Option<Arc<AtomicBool>>,
    timeline: Option<Vec<FrameOutcome>>,
}

impl Driver {
    fn cancelled(&self) -> bool {
        let raised = self
            .shutdown
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        if raised {
            tracing::warn!(
                frames = self.session.stats().frames_seen,
                "analysis cancelled, finalizing frames seen so far"
            );
        }
        raised
    }

    fn feed(&mut self, frame: &Frame) {
        let outcome = self.session.process_frame(frame);
        if let Some(t) = self.timeline.as_mut() {
            t.push(outcome);
        }
    }

    fn finish(self, cancelled: bool) -> RunOutcome {
        let stats = self.session.stats().clone();
        let last_timestamp_ms = self.session.last_timestamp_ms().unwrap_or(0.0);
        let result = self.session.finalize(last_timestamp_ms);
        RunOutcome {
            result,
            stats,
            last_timestamp_ms,
            timeline: self.timeline.unwrap_or_default(),
            cancelled,
        }
    }
}
