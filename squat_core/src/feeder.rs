//! Background frame acquisition.
//!
//! Spawns a thread that owns the `FrameSource` and pushes frames through a
//! bounded channel, so decoding and analysis overlap without unbounded
//! buffering. The producer blocks while the queue is full.
//!
//! Each `FrameFeeder` owns exactly one thread, joined when it is dropped.
use crossbeam_channel as xch;
use squat_traits::{Frame, FrameSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub type SourceItem = Result<Frame, Box<dyn std::error::Error + Send + Sync>>;

pub struct FrameFeeder {
    rx: Option<xch::Receiver<SourceItem>>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl FrameFeeder {
    pub fn spawn<S: FrameSource + Send + 'static>(mut source: S, capacity: usize) -> Self {
        let (tx, rx) = xch::bounded(capacity.max(1));
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            let mut sent: u64 = 0;
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("feeder thread received shutdown signal");
                    break;
                }
                match source.next_frame() {
                    Ok(Some(frame)) => {
                        // consumer gone
                        if tx.send(Ok(frame)).is_err() {
                            tracing::debug!("feeder consumer disconnected, exiting thread");
                            break;
                        }
                        sent += 1;
                    }
                    Ok(None) => {
                        tracing::debug!(frames = sent, "frame source exhausted");
                        break;
                    }
                    Err(e) => {
                        // Forward once, then stop; the consumer decides what to do.
                        let _ = tx.send(Err(e));
                        break;
                    }
                }
            }
            tracing::trace!("feeder thread exiting cleanly");
        });

        Self {
            rx: Some(rx),
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Block for the next item. `None` once the source is exhausted (or failed
    /// and its error has already been delivered).
    pub fn recv(&self) -> Option<SourceItem> {
        self.rx.as_ref().and_then(|rx| rx.recv().ok())
    }

    /// Ask the producer to stop after its current read.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for FrameFeeder {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Unblocks a producer waiting on a full queue.
        drop(self.rx.take());
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("feeder thread joined"),
                Err(e) => tracing::warn!(?e, "feeder thread panicked during shutdown"),
            }
        }
    }
}
