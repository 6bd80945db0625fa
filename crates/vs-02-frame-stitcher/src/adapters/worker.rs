//! # Stitcher Worker
//!
//! Owns a [`FrameStitcher`] on a blocking thread and feeds it from a
//! bounded command queue. Oracle calls can be slow, so the async side
//! never waits on them.
//!
//! ## Epochs
//!
//! Every reset opens a new epoch. The handle bumps the shared epoch counter
//! *before* the worker sees the reset, and every command carries the epoch
//! it was issued in:
//!
//! - frames from an older epoch are dropped unprocessed
//! - results computed across a reset are discarded
//! - progress snapshots from an older epoch never overwrite newer ones

use crate::domain::ScanSnapshot;
use crate::error::ScanError;
use crate::ports::inbound::{FrameIngestApi, IngestOutcome};
use crate::ports::outbound::{DecodeOracle, ScanEvent, ScanEventKind, ScanEventPublisher};
use crate::service::FrameStitcher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

#[derive(Debug)]
enum Command {
    Frame {
        raw: String,
        epoch: u64,
        reply: Option<oneshot::Sender<Option<IngestOutcome>>>,
    },
    Reset { epoch: u64 },
    FinishPasswordRecovery { recovered: bool, epoch: u64 },
    Shutdown,
}

/// Store `snapshot` unless a newer epoch is already published.
fn publish_snapshot(sender: &watch::Sender<ScanSnapshot>, snapshot: ScanSnapshot) -> bool {
    sender.send_if_modified(|current| {
        if snapshot.epoch < current.epoch || *current == snapshot {
            false
        } else {
            *current = snapshot;
            true
        }
    })
}

/// Cloneable handle to a running worker.
#[derive(Debug, Clone)]
pub struct StitcherHandle {
    commands: mpsc::Sender<Command>,
    epoch: Arc<AtomicU64>,
    snapshots: Arc<watch::Sender<ScanSnapshot>>,
}

impl StitcherHandle {
    /// Queue a frame, waiting for room if the queue is full.
    pub async fn submit_frame(&self, raw: impl Into<String>) -> Result<(), ScanError> {
        let epoch = self.epoch();
        self.commands
            .send(Command::Frame {
                raw: raw.into(),
                epoch,
                reply: None,
            })
            .await
            .map_err(|_| ScanError::WorkerStopped)
    }

    /// Queue a frame and wait for the worker to process it.
    ///
    /// Returns `None` if a reset superseded the frame.
    pub async fn ingest(&self, raw: impl Into<String>) -> Result<Option<IngestOutcome>, ScanError> {
        let epoch = self.epoch();
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Frame {
                raw: raw.into(),
                epoch,
                reply: Some(reply),
            })
            .await
            .map_err(|_| ScanError::WorkerStopped)?;
        response.await.map_err(|_| ScanError::WorkerStopped)
    }

    /// Queue a frame without waiting. Returns `false` if the queue was full
    /// and the frame was dropped; the scanner will deliver it again.
    pub fn try_submit_frame(&self, raw: impl Into<String>) -> Result<bool, ScanError> {
        let epoch = self.epoch();
        match self.commands.try_send(Command::Frame {
            raw: raw.into(),
            epoch,
            reply: None,
        }) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(_)) => {
                trace!(epoch, "command queue full, frame dropped");
                Ok(false)
            }
            Err(TrySendError::Closed(_)) => Err(ScanError::WorkerStopped),
        }
    }

    /// Abandon the current session. Takes effect immediately for every
    /// observer; returns the new epoch.
    pub fn reset(&self) -> u64 {
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        publish_snapshot(&self.snapshots, ScanSnapshot::idle(epoch));

        match self.commands.try_send(Command::Reset { epoch }) {
            Ok(()) => {}
            // The next frame of this epoch resets the session anyway.
            Err(TrySendError::Full(_)) => debug!(epoch, "command queue full, reset deferred"),
            Err(TrySendError::Closed(_)) => debug!(epoch, "reset after worker stopped"),
        }
        epoch
    }

    /// Report the outcome of the passphrase flow.
    pub async fn finish_password_recovery(&self, recovered: bool) -> Result<(), ScanError> {
        let epoch = self.epoch();
        self.commands
            .send(Command::FinishPasswordRecovery { recovered, epoch })
            .await
            .map_err(|_| ScanError::WorkerStopped)
    }

    /// Current epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Latest published snapshot.
    pub fn progress(&self) -> ScanSnapshot {
        *self.snapshots.borrow()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<ScanSnapshot> {
        self.snapshots.subscribe()
    }

    /// Ask the worker to stop after draining queued commands.
    pub async fn shutdown(&self) -> Result<(), ScanError> {
        self.commands
            .send(Command::Shutdown)
            .await
            .map_err(|_| ScanError::WorkerStopped)
    }
}

/// Worker owning the stitcher.
pub struct StitcherWorker<O: DecodeOracle, P: ScanEventPublisher> {
    stitcher: FrameStitcher<O>,
    publisher: Arc<P>,
    commands: mpsc::Receiver<Command>,
    epoch: Arc<AtomicU64>,
    snapshots: Arc<watch::Sender<ScanSnapshot>>,
    session_epoch: u64,
}

impl<O, P> StitcherWorker<O, P>
where
    O: DecodeOracle + 'static,
    P: ScanEventPublisher + 'static,
{
    /// Start the worker on tokio's blocking pool.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(stitcher: FrameStitcher<O>, publisher: Arc<P>) -> (StitcherHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(stitcher.config().command_queue_depth.max(1));
        let (snapshot_tx, _) = watch::channel(ScanSnapshot::idle(0));
        let epoch = Arc::new(AtomicU64::new(0));
        let snapshots = Arc::new(snapshot_tx);

        let handle = StitcherHandle {
            commands: command_tx,
            epoch: Arc::clone(&epoch),
            snapshots: Arc::clone(&snapshots),
        };
        let worker = Self {
            stitcher,
            publisher,
            commands: command_rx,
            epoch,
            snapshots,
            session_epoch: 0,
        };

        let join = tokio::task::spawn_blocking(move || worker.run());
        (handle, join)
    }

    fn run(mut self) {
        info!("stitcher worker started");
        while let Some(command) = self.commands.blocking_recv() {
            match command {
                Command::Frame { raw, epoch, reply } => {
                    let outcome = self.handle_frame(&raw, epoch);
                    if let Some(reply) = reply {
                        // Caller may have stopped waiting.
                        let _ = reply.send(outcome);
                    }
                }
                Command::Reset { epoch } => self.advance_to(epoch),
                Command::FinishPasswordRecovery { recovered, epoch } => {
                    self.handle_finish(recovered, epoch)
                }
                Command::Shutdown => break,
            }
        }
        info!("stitcher worker stopped");
    }

    fn is_stale(&self, epoch: u64) -> bool {
        epoch < self.epoch.load(Ordering::Acquire)
    }

    /// Bring the session into `epoch`, resetting it if the epoch moved on.
    fn advance_to(&mut self, epoch: u64) {
        if epoch <= self.session_epoch {
            return;
        }
        self.stitcher.reset();
        self.session_epoch = epoch;
        self.publish(ScanEvent::new(epoch, ScanEventKind::Reset));
    }

    fn handle_frame(&mut self, raw: &str, epoch: u64) -> Option<IngestOutcome> {
        if self.is_stale(epoch) {
            trace!(epoch, "dropping frame from a previous epoch");
            return None;
        }
        self.advance_to(epoch);

        let outcome = self.stitcher.on_frame_decoded(raw);
        if self.is_stale(epoch) {
            debug!(epoch, "discarding result superseded by reset");
            return None;
        }

        self.publish_snapshot(epoch);
        let kind = match &outcome {
            IngestOutcome::Duplicate | IngestOutcome::Ignored(_) => None,
            IngestOutcome::Rejected(err) => Some(ScanEventKind::FrameRejected(err.clone())),
            IngestOutcome::Progress(progress) => Some(ScanEventKind::Progress(*progress)),
            IngestOutcome::Decoded(payload) => Some(ScanEventKind::Decoded(payload.clone())),
            IngestOutcome::PasswordRequired(shares) => {
                Some(ScanEventKind::PasswordRequired(shares.clone()))
            }
            IngestOutcome::DecodeFailed(err) => Some(ScanEventKind::DecodeFailed(err.clone())),
        };
        if let Some(kind) = kind {
            self.publish(ScanEvent::new(epoch, kind));
        }
        Some(outcome)
    }

    fn handle_finish(&mut self, recovered: bool, epoch: u64) {
        if self.is_stale(epoch) {
            debug!(epoch, "dropping password recovery result from a previous epoch");
            return;
        }
        self.advance_to(epoch);

        match self.stitcher.finish_password_recovery(recovered) {
            Ok(Some(payload)) => {
                self.publish_snapshot(epoch);
                self.publish(ScanEvent::new(epoch, ScanEventKind::Decoded(payload)));
            }
            Ok(None) => {
                self.publish_snapshot(epoch);
                self.publish(ScanEvent::new(epoch, ScanEventKind::Reset));
            }
            Err(err) => warn!(error = %err, "password recovery result rejected"),
        }
    }

    fn publish_snapshot(&self, epoch: u64) {
        let snapshot = ScanSnapshot::new(epoch, self.stitcher.progress());
        if !publish_snapshot(&self.snapshots, snapshot) {
            trace!(epoch, "snapshot unchanged or superseded");
        }
    }

    fn publish(&self, event: ScanEvent) {
        if let Err(err) = self.publisher.publish(event) {
            trace!(error = %err, "scan event not delivered");
        }
    }
}
