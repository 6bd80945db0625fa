//! # Scan Progress
//!
//! Values the UI reads to render a progress indicator.

use super::session::ScanMode;
use serde::{Deserialize, Serialize};

/// Captured frames versus the declared total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanProgress {
    pub captured: usize,
    pub total: Option<u32>,
    pub mode: ScanMode,
}

impl ScanProgress {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Fraction in `0.0..=1.0`, or `None` before the total is known.
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(0) | None => None,
            Some(total) => Some((self.captured as f64 / f64::from(total)).min(1.0)),
        }
    }

    /// Whether a multi-frame progress bar should be shown.
    pub fn is_multi_frame(&self) -> bool {
        self.total.is_some_and(|total| total > 1)
    }
}

/// Progress tagged with the epoch it was produced in.
///
/// Epochs only grow; a snapshot from an older epoch never replaces a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub epoch: u64,
    pub progress: ScanProgress,
}

impl ScanSnapshot {
    pub fn new(epoch: u64, progress: ScanProgress) -> Self {
        Self { epoch, progress }
    }

    /// Idle snapshot opening `epoch`.
    pub fn idle(epoch: u64) -> Self {
        Self::new(epoch, ScanProgress::idle())
    }
}
