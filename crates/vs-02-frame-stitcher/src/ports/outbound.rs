//! # Outbound Ports
//!
//! Dependencies of the stitcher, implemented by adapters.

use crate::domain::{
    BananaSplitShares, DecodedPayload, RecoveredSeed, ScanProgress, SecretPassword,
};
use crate::error::{OracleError, ScanError};

// =============================================================================
// DECODE ORACLE
// =============================================================================

/// Banana split branch of an oracle result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BananaSplitOutcome {
    /// Shares are complete; ask the user for the passphrase.
    RequestPassword,
    /// Passphrase accepted.
    RecoveredSeed(RecoveredSeed),
}

/// Result of decoding a complete frame set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSetResult {
    BananaSplit(BananaSplitOutcome),
    DynamicDerivations(String),
    Transaction(String),
    DynamicDerivationsTransaction(Vec<String>),
}

/// Frame parsing and payload decoding provided by the signing core.
///
/// Calls are synchronous and may be slow; the async worker runs them on a
/// blocking thread.
pub trait DecodeOracle: Send + Sync {
    /// Number of frames the sequence opened by `frame` needs.
    fn expected_frame_count(&self, frame: &str) -> Result<u32, OracleError>;

    /// Decode a complete frame set without a passphrase.
    fn decode_frame_set(&self, frames: &[String]) -> Result<FrameSetResult, OracleError>;

    /// Decode a banana split set with a passphrase.
    fn decode_with_password(
        &self,
        frames: &[String],
        password: &SecretPassword,
    ) -> Result<FrameSetResult, OracleError>;
}

impl<O: DecodeOracle + ?Sized> DecodeOracle for std::sync::Arc<O> {
    fn expected_frame_count(&self, frame: &str) -> Result<u32, OracleError> {
        (**self).expected_frame_count(frame)
    }

    fn decode_frame_set(&self, frames: &[String]) -> Result<FrameSetResult, OracleError> {
        (**self).decode_frame_set(frames)
    }

    fn decode_with_password(
        &self,
        frames: &[String],
        password: &SecretPassword,
    ) -> Result<FrameSetResult, OracleError> {
        (**self).decode_with_password(frames, password)
    }
}

// =============================================================================
// EVENT PUBLISHER
// =============================================================================

/// Observable scan events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEventKind {
    Progress(ScanProgress),
    FrameRejected(ScanError),
    Decoded(DecodedPayload),
    PasswordRequired(BananaSplitShares),
    DecodeFailed(ScanError),
    Reset,
}

/// An event tagged with the epoch that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    pub epoch: u64,
    pub kind: ScanEventKind,
}

impl ScanEvent {
    pub fn new(epoch: u64, kind: ScanEventKind) -> Self {
        Self { epoch, kind }
    }

    /// Whether this event ends a scan session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            ScanEventKind::Decoded(_)
                | ScanEventKind::PasswordRequired(_)
                | ScanEventKind::DecodeFailed(_)
        )
    }
}

/// Error type for publish operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// Nobody is listening.
    NoSubscribers,
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSubscribers => write!(f, "No event subscribers"),
        }
    }
}

impl std::error::Error for PublishError {}

/// Sink for scan events.
pub trait ScanEventPublisher: Send + Sync {
    fn publish(&self, event: ScanEvent) -> Result<(), PublishError>;
}

/// No-op publisher for running without observers.
#[derive(Debug, Clone, Default)]
pub struct NoOpPublisher;

impl ScanEventPublisher for NoOpPublisher {
    fn publish(&self, _event: ScanEvent) -> Result<(), PublishError> {
        Ok(())
    }
}
