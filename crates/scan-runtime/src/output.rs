//! JSON report lines written to stdout.

use serde::Serialize;
use vs_02_frame_stitcher::{IngestOutcome, PayloadType};

/// One completed scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanReport {
    Decoded {
        epoch: u64,
        payload_type: PayloadType,
        payload: Vec<String>,
    },
    PasswordRequired {
        epoch: u64,
        frames: usize,
    },
    DecodeFailed {
        epoch: u64,
        error: String,
    },
}

impl ScanReport {
    /// Report for a terminal outcome; `None` while the scan is still going.
    pub fn from_outcome(epoch: u64, outcome: &IngestOutcome) -> Option<Self> {
        match outcome {
            IngestOutcome::Decoded(payload) => Some(Self::Decoded {
                epoch,
                payload_type: payload.payload_type(),
                payload: payload.payload(),
            }),
            IngestOutcome::PasswordRequired(shares) => Some(Self::PasswordRequired {
                epoch,
                frames: shares.frames().len(),
            }),
            IngestOutcome::DecodeFailed(err) => Some(Self::DecodeFailed {
                epoch,
                error: err.to_string(),
            }),
            _ => None,
        }
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
