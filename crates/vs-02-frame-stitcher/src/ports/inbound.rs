//! # Inbound Port
//!
//! The API a camera or UI layer calls. Frames are delivered one at a time,
//! already QR-decoded to their raw hex strings.

use crate::domain::{BananaSplitShares, DecodedPayload, ScanMode, ScanProgress};
use crate::error::ScanError;

/// What happened to one delivered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Frame was already in the bucket.
    Duplicate,
    /// Frame arrived while the session does not accept frames.
    Ignored(ScanMode),
    /// First frame could not be classified; session is back to `Idle`.
    Rejected(ScanError),
    /// Frame stored; the set is not complete yet.
    Progress(ScanProgress),
    /// Set decoded; session is `Completed`.
    Decoded(DecodedPayload),
    /// Banana split shares complete; session is `AwaitingPassword`.
    PasswordRequired(BananaSplitShares),
    /// Set failed to decode; session is back to `Idle`.
    DecodeFailed(ScanError),
}

impl IngestOutcome {
    /// Whether this outcome ends the scan session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Decoded(_) | Self::PasswordRequired(_) | Self::DecodeFailed(_)
        )
    }
}

/// Primary API for stitching scanned frames.
pub trait FrameIngestApi {
    /// Deliver one decoded QR string.
    fn on_frame_decoded(&mut self, raw: &str) -> IngestOutcome;

    /// Abandon the current session and return to `Idle`.
    fn reset(&mut self);

    /// Current progress.
    fn progress(&self) -> ScanProgress;

    /// Close the passphrase flow.
    ///
    /// `true` completes the session and returns the recovered share set,
    /// `false` discards the session.
    fn finish_password_recovery(
        &mut self,
        recovered: bool,
    ) -> Result<Option<DecodedPayload>, ScanError>;
}
