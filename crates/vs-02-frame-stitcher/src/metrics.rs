//! Scan counters
//!
//! Thread-safe counters for monitoring how scans progress and fail.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use vs_02_frame_stitcher::metrics::ScanMetrics;
//!
//! let metrics = Arc::new(ScanMetrics::new());
//! let stitcher = FrameStitcher::with_metrics(oracle, config, metrics.clone());
//! // ... scan ...
//! println!("{:?}", metrics.snapshot());
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for frame stitching.
#[derive(Debug, Default)]
pub struct ScanMetrics {
    /// Frames delivered by the scanner
    pub frames_received: AtomicU64,
    /// Frames already present in the bucket
    pub duplicates_dropped: AtomicU64,
    /// Frames dropped in AwaitingPassword or Completed
    pub frames_ignored: AtomicU64,
    /// First frames that failed classification
    pub frames_rejected: AtomicU64,
    /// Sessions that got past classification
    pub sessions_started: AtomicU64,
    /// Payloads produced
    pub payloads_decoded: AtomicU64,
    /// Complete sets that failed to decode
    pub decode_failures: AtomicU64,
    /// Banana split sets handed to the passphrase flow
    pub password_requests: AtomicU64,
    /// Explicit resets
    pub resets: AtomicU64,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            duplicates_dropped: self.duplicates_dropped.load(Ordering::Relaxed),
            frames_ignored: self.frames_ignored.load(Ordering::Relaxed),
            frames_rejected: self.frames_rejected.load(Ordering::Relaxed),
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            payloads_decoded: self.payloads_decoded.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            password_requests: self.password_requests.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        for counter in [
            &self.frames_received,
            &self.duplicates_dropped,
            &self.frames_ignored,
            &self.frames_rejected,
            &self.sessions_started,
            &self.payloads_decoded,
            &self.decode_failures,
            &self.password_requests,
            &self.resets,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub frames_received: u64,
    pub duplicates_dropped: u64,
    pub frames_ignored: u64,
    pub frames_rejected: u64,
    pub sessions_started: u64,
    pub payloads_decoded: u64,
    pub decode_failures: u64,
    pub password_requests: u64,
    pub resets: u64,
}

/// Hook for plugging scan counters into an external metrics system.
pub trait MetricsRecorder: Send + Sync {
    fn record_frame_received(&self);
    fn record_duplicate(&self);
    fn record_ignored(&self);
    fn record_rejected(&self);
    fn record_session_started(&self);
    fn record_decoded(&self);
    fn record_decode_failure(&self);
    fn record_password_request(&self);
    fn record_reset(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Debug, Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_frame_received(&self) {}
    fn record_duplicate(&self) {}
    fn record_ignored(&self) {}
    fn record_rejected(&self) {}
    fn record_session_started(&self) {}
    fn record_decoded(&self) {}
    fn record_decode_failure(&self) {}
    fn record_password_request(&self) {}
    fn record_reset(&self) {}
}

impl MetricsRecorder for ScanMetrics {
    fn record_frame_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    fn record_duplicate(&self) {
        self.duplicates_dropped.fetch_add(1, Ordering::Relaxed);
    }

    fn record_ignored(&self) {
        self.frames_ignored.fetch_add(1, Ordering::Relaxed);
    }

    fn record_rejected(&self) {
        self.frames_rejected.fetch_add(1, Ordering::Relaxed);
    }

    fn record_session_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    fn record_decoded(&self) {
        self.payloads_decoded.fetch_add(1, Ordering::Relaxed);
    }

    fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn record_password_request(&self) {
        self.password_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn record_reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }
}
