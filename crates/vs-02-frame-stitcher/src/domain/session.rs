//! # Scan Session
//!
//! The ordered bucket of raw frames for the scan in progress.

use super::progress::ScanProgress;
use serde::{Deserialize, Serialize};

/// Phase of the current scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// No session; the next frame starts one.
    #[default]
    Idle,
    /// First frame is being classified.
    AwaitingFirstFrame,
    /// Collecting frames of a multi-frame sequence.
    Accumulating,
    /// Banana split shares are complete; waiting on the passphrase flow.
    AwaitingPassword,
    /// A payload was produced. Frames are ignored until reset.
    Completed,
}

impl ScanMode {
    /// Whether incoming frames are dropped in this mode.
    pub fn ignores_frames(self) -> bool {
        matches!(self, ScanMode::AwaitingPassword | ScanMode::Completed)
    }
}

/// Frames collected for the current scan.
///
/// ## Invariants
///
/// - `frames` holds no duplicates and keeps scan order
/// - `expected_total` is set exactly when `frames` is non-empty
/// - `Idle` implies an empty bucket
#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    frames: Vec<String>,
    expected_total: Option<u32>,
    mode: ScanMode,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn expected_total(&self) -> Option<u32> {
        self.expected_total
    }

    pub fn captured(&self) -> usize {
        self.frames.len()
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.frames.iter().any(|frame| frame == raw)
    }

    /// Enter `AwaitingFirstFrame` while the first frame is classified.
    pub fn begin(&mut self) {
        debug_assert!(self.frames.is_empty());
        self.mode = ScanMode::AwaitingFirstFrame;
    }

    /// Store a frame that completes a sequence on its own.
    pub fn accept_single(&mut self, raw: String) {
        self.frames = vec![raw];
        self.expected_total = Some(1);
    }

    /// Store the first frame of a multi-frame sequence.
    pub fn start_accumulating(&mut self, raw: String, total: u32) {
        self.frames = vec![raw];
        self.expected_total = Some(total);
        self.mode = ScanMode::Accumulating;
    }

    /// Append a new frame. Returns `false` if it was already present.
    pub fn append(&mut self, raw: String) -> bool {
        if self.contains(&raw) {
            return false;
        }
        self.frames.push(raw);
        true
    }

    /// Completion is exact: captured frames reached the declared total.
    pub fn is_complete(&self) -> bool {
        self.expected_total
            .is_some_and(|total| self.frames.len() >= total as usize)
    }

    pub fn await_password(&mut self) {
        self.mode = ScanMode::AwaitingPassword;
    }

    pub fn complete(&mut self) {
        self.mode = ScanMode::Completed;
    }

    /// Drop all frames and return to `Idle`.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.expected_total = None;
        self.mode = ScanMode::Idle;
    }

    pub fn progress(&self) -> ScanProgress {
        ScanProgress {
            captured: self.frames.len(),
            total: self.expected_total,
            mode: self.mode,
        }
    }
}
