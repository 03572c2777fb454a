//! Live frame driver.
//!
//! A capture callback hands frames to [`FrameStream::submit`]; one worker
//! thread runs them through a [`Processor`] and publishes the results on a
//! channel. There is no input queue: the hand-off channel has zero capacity,
//! so a frame is only accepted while the worker is idle and waiting. Frames
//! that arrive while the worker is busy are dropped and counted.
//!
//! ```text
//! capture ──submit──▶ [rendezvous] ──▶ worker ──▶ [1 slot] ──▶ display
//!            busy? drop                          full? drop
//! ```
//!
//! Stopping the stream closes the hand-off channel and joins the worker.

use crate::imaging::FrameBuffer;
use crate::session::Processor;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Failed to spawn stream worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// A processed frame and the submission sequence number it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFrame {
    pub sequence: u64,
    pub frame: FrameBuffer,
}

/// Outcome of [`FrameStream::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The worker took the frame; it carries this sequence number.
    Accepted(u64),
    /// The worker was busy or the stream is stopped.
    Dropped,
}

impl Submission {
    pub fn is_accepted(self) -> bool {
        matches!(self, Submission::Accepted(_))
    }
}

/// Counters for a running stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Frames offered through `submit`.
    pub submitted: u64,
    pub processed: u64,
    /// Frames refused because the worker was busy or stopped.
    pub dropped: u64,
    pub failed: u64,
    /// Processed frames thrown away because the consumer had not taken the previous one.
    pub discarded: u64,
}

impl fmt::Display for StreamStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} dropped, {} failed ({} submitted)",
            self.processed, self.dropped, self.failed, self.submitted
        )?;
        if self.discarded > 0 {
            write!(f, ", {} discarded", self.discarded)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Counters {
    submitted: AtomicU64,
    processed: AtomicU64,
    dropped: AtomicU64,
    failed: AtomicU64,
    discarded: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> StreamStats {
        StreamStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

struct Job {
    sequence: u64,
    frame: FrameBuffer,
}

/// Handle to a running worker.
pub struct FrameStream {
    sender: Option<Sender<Job>>,
    counters: Arc<Counters>,
    next_sequence: AtomicU64,
    thread_handle: Option<std::thread::JoinHandle<()>>,
    processor: Arc<Processor>,
}

impl FrameStream {
    /// Spawn the worker. Processed frames arrive on the returned receiver.
    pub fn start(
        processor: Arc<Processor>,
    ) -> Result<(Self, Receiver<ProcessedFrame>), StreamError> {
        let (job_tx, job_rx) = crossbeam_channel::bounded::<Job>(0);
        let (out_tx, out_rx) = crossbeam_channel::bounded::<ProcessedFrame>(1);
        let counters = Arc::new(Counters::default());

        let worker_processor = Arc::clone(&processor);
        let worker_counters = Arc::clone(&counters);
        let thread_handle = std::thread::Builder::new()
            .name("frame-stream".to_string())
            .spawn(move || {
                Self::worker_thread(job_rx, out_tx, worker_processor, worker_counters);
            })?;

        log::info!("frame stream started");
        Ok((
            Self {
                sender: Some(job_tx),
                counters,
                next_sequence: AtomicU64::new(0),
                thread_handle: Some(thread_handle),
                processor,
            },
            out_rx,
        ))
    }

    fn worker_thread(
        jobs: Receiver<Job>,
        output: Sender<ProcessedFrame>,
        processor: Arc<Processor>,
        counters: Arc<Counters>,
    ) {
        while let Ok(job) = jobs.recv() {
            match processor.process(&job.frame) {
                Ok(frame) => {
                    counters.processed.fetch_add(1, Ordering::Relaxed);
                    let result = ProcessedFrame {
                        sequence: job.sequence,
                        frame,
                    };
                    match output.try_send(result) {
                        Ok(()) => {}
                        Err(TrySendError::Full(stale)) => {
                            counters.discarded.fetch_add(1, Ordering::Relaxed);
                            log::debug!("consumer busy, dropped output #{}", stale.sequence);
                        }
                        Err(TrySendError::Disconnected(_)) => {
                            log::debug!("output receiver gone, stopping worker");
                            break;
                        }
                    }
                }
                Err(e) => {
                    counters.failed.fetch_add(1, Ordering::Relaxed);
                    log::warn!("frame #{} failed: {}", job.sequence, e);
                }
            }
        }
        log::info!("frame stream worker stopped");
    }

    /// Offer a frame to the worker. Never blocks.
    pub fn submit(&self, frame: FrameBuffer) -> Submission {
        self.counters.submitted.fetch_add(1, Ordering::Relaxed);
        let Some(sender) = &self.sender else {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            return Submission::Dropped;
        };
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        match sender.try_send(Job { sequence, frame }) {
            Ok(()) => Submission::Accepted(sequence),
            Err(_) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                log::trace!("worker busy, dropped frame #{sequence}");
                Submission::Dropped
            }
        }
    }

    pub fn stats(&self) -> StreamStats {
        self.counters.snapshot()
    }

    pub fn processor(&self) -> &Arc<Processor> {
        &self.processor
    }

    pub fn is_running(&self) -> bool {
        self.sender.is_some()
    }

    /// Stop accepting frames and wait for the worker to finish its current one.
    pub fn stop(&mut self) {
        if self.sender.take().is_some() {
            if let Some(handle) = self.thread_handle.take() {
                join_worker(handle);
            }
            log::info!("frame stream stopped: {}", self.stats());
        }
    }
}

/// Join the worker, logging a panic instead of propagating it. Returns
/// whether the worker exited cleanly.
fn join_worker(handle: std::thread::JoinHandle<()>) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::error!("frame stream worker panicked: {reason}");
            false
        }
    }
}

impl Drop for FrameStream {
    fn drop(&mut self) {
        self.stop();
    }
}
