//! # Frame Stitcher
//!
//! Turns a stream of raw frames into at most one terminal result per
//! session. Every call runs to completion before the next one starts, so
//! the state machine never observes a half-applied transition.

use crate::config::StitcherConfig;
use crate::domain::{BananaSplitShares, DecodedPayload, ScanMode, ScanProgress, ScanSession};
use crate::error::{OracleError, ScanError};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::inbound::{FrameIngestApi, IngestOutcome};
use crate::ports::outbound::{BananaSplitOutcome, DecodeOracle, FrameSetResult};
use crate::recovery::PasswordRecovery;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a first frame opens a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The frame is the whole payload.
    SingleFrame,
    /// The sequence needs `total` distinct frames.
    MultiFrame { total: u32 },
}

/// Multi-frame QR stitcher.
pub struct FrameStitcher<O: DecodeOracle> {
    oracle: Arc<O>,
    config: StitcherConfig,
    session: ScanSession,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<O: DecodeOracle> FrameStitcher<O> {
    pub fn new(oracle: Arc<O>, config: StitcherConfig) -> Self {
        Self::with_metrics(oracle, config, Arc::new(NoOpMetrics))
    }

    pub fn with_metrics(
        oracle: Arc<O>,
        config: StitcherConfig,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            oracle,
            config,
            session: ScanSession::new(),
            metrics,
        }
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    pub fn config(&self) -> &StitcherConfig {
        &self.config
    }

    pub fn oracle(&self) -> Arc<O> {
        Arc::clone(&self.oracle)
    }

    /// Ask the oracle how many frames the sequence opened by `raw` needs.
    ///
    /// Totals of zero or above `max_expected_frames` are malformed.
    pub fn classify(&self, raw: &str) -> Result<Classification, ScanError> {
        let total = self
            .oracle
            .expected_frame_count(raw)
            .map_err(|err| match err {
                OracleError::Malformed(reason) => ScanError::MalformedFrame { reason },
                other => ScanError::MalformedFrame {
                    reason: other.to_string(),
                },
            })?;
        match total {
            0 => Err(ScanError::MalformedFrame {
                reason: "frame declares zero parts".into(),
            }),
            1 => Ok(Classification::SingleFrame),
            total if total > self.config.max_expected_frames => Err(ScanError::MalformedFrame {
                reason: format!(
                    "declared {} frames, limit is {}",
                    total, self.config.max_expected_frames
                ),
            }),
            total => Ok(Classification::MultiFrame { total }),
        }
    }

    /// Decode a complete frame set.
    ///
    /// A banana split password request becomes
    /// [`DecodedPayload::BananaSplitRecovery`] carrying the frames.
    pub fn decode(&self, frames: &[String]) -> Result<DecodedPayload, ScanError> {
        let result = self
            .oracle
            .decode_frame_set(frames)
            .map_err(|e| ScanError::DecodeFailure {
                reason: e.to_string(),
            })?;

        match result {
            FrameSetResult::BananaSplit(BananaSplitOutcome::RequestPassword) => Ok(
                DecodedPayload::BananaSplitRecovery(BananaSplitShares::password_required(
                    frames.to_vec(),
                )),
            ),
            FrameSetResult::BananaSplit(BananaSplitOutcome::RecoveredSeed(_)) => {
                Err(ScanError::UnexpectedRecoveredSeed)
            }
            FrameSetResult::Transaction(hex) => Ok(DecodedPayload::Transaction(hex)),
            FrameSetResult::DynamicDerivations(hex) => Ok(DecodedPayload::DynamicDerivations(hex)),
            FrameSetResult::DynamicDerivationsTransaction(hexes) => {
                Ok(DecodedPayload::DynamicDerivationsTransaction(hexes))
            }
        }
    }

    /// Open a passphrase flow over the share set awaiting a password.
    pub fn begin_password_recovery(&self) -> Result<PasswordRecovery<O>, ScanError> {
        if self.session.mode() != ScanMode::AwaitingPassword {
            return Err(ScanError::NotAwaitingPassword {
                mode: self.session.mode(),
            });
        }
        Ok(PasswordRecovery::new(
            BananaSplitShares::password_required(self.session.frames().to_vec()),
            self.oracle(),
            self.config.max_invalid_password_attempts,
        ))
    }

    fn start_session(&mut self, raw: &str) -> IngestOutcome {
        self.session.begin();

        let classification = match self.classify(raw) {
            Ok(classification) => classification,
            Err(err) => {
                self.session.reset();
                self.metrics.record_rejected();
                warn!(error = %err, "first frame rejected");
                return IngestOutcome::Rejected(err);
            }
        };
        self.metrics.record_session_started();

        match classification {
            Classification::SingleFrame => {
                debug!("single-frame payload");
                self.session.accept_single(raw.to_owned());
                self.finish_set()
            }
            Classification::MultiFrame { total } => {
                info!(total, "multi-frame scan started");
                self.session.start_accumulating(raw.to_owned(), total);
                IngestOutcome::Progress(self.session.progress())
            }
        }
    }

    fn accumulate(&mut self, raw: &str) -> IngestOutcome {
        if !self.session.append(raw.to_owned()) {
            self.metrics.record_duplicate();
            return IngestOutcome::Duplicate;
        }

        let progress = self.session.progress();
        debug!(captured = progress.captured, total = ?progress.total, "frame captured");

        if self.session.is_complete() {
            self.finish_set()
        } else {
            IngestOutcome::Progress(progress)
        }
    }

    fn finish_set(&mut self) -> IngestOutcome {
        let result = self.decode(self.session.frames());
        match result {
            Ok(DecodedPayload::BananaSplitRecovery(shares)) => {
                self.session.await_password();
                self.metrics.record_password_request();
                info!(captured = shares.frames().len(), "banana split shares complete");
                IngestOutcome::PasswordRequired(shares)
            }
            Ok(payload) => {
                self.session.complete();
                self.metrics.record_decoded();
                info!(payload_type = ?payload.payload_type(), "payload decoded");
                IngestOutcome::Decoded(payload)
            }
            Err(err) => {
                let captured = self.session.captured();
                self.session.reset();
                self.metrics.record_decode_failure();
                warn!(captured, error = %err, "frame set failed to decode");
                IngestOutcome::DecodeFailed(err)
            }
        }
    }
}

impl<O: DecodeOracle> FrameIngestApi for FrameStitcher<O> {
    fn on_frame_decoded(&mut self, raw: &str) -> IngestOutcome {
        self.metrics.record_frame_received();

        if raw.is_empty() {
            self.metrics.record_rejected();
            return IngestOutcome::Rejected(ScanError::EmptyFrame);
        }

        match self.session.mode() {
            ScanMode::Idle => self.start_session(raw),
            ScanMode::Accumulating => self.accumulate(raw),
            mode => {
                self.metrics.record_ignored();
                IngestOutcome::Ignored(mode)
            }
        }
    }

    fn reset(&mut self) {
        let mode = self.session.mode();
        self.session.reset();
        self.metrics.record_reset();
        debug!(previous = ?mode, "scan session reset");
    }

    fn progress(&self) -> ScanProgress {
        self.session.progress()
    }

    fn finish_password_recovery(
        &mut self,
        recovered: bool,
    ) -> Result<Option<DecodedPayload>, ScanError> {
        let mode = self.session.mode();
        if mode != ScanMode::AwaitingPassword {
            return Err(ScanError::NotAwaitingPassword { mode });
        }

        if recovered {
            let shares = BananaSplitShares::password_required(self.session.frames().to_vec());
            self.session.complete();
            info!("banana split recovery completed");
            Ok(Some(DecodedPayload::BananaSplitRecovery(
                shares.into_recovered(),
            )))
        } else {
            self.session.reset();
            info!("banana split recovery abandoned");
            Ok(None)
        }
    }
}
