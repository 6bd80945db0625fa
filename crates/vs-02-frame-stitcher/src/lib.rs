//! # Frame Stitcher (vs-02)
//!
//! Collects the frames of an animated QR code shown on a hot device and
//! turns them into exactly one payload for the signing core.
//!
//! ## Architecture
//!
//! ```text
//! camera ──frame──→ StitcherHandle ──mpsc──→ StitcherWorker ──→ FrameStitcher
//!                        │                        │                  │
//!                        │ reset (epoch + 1)      │ events           │ DecodeOracle
//!                        ↓                        ↓                  ↓
//!                  watch<ScanSnapshot>    ScanEventPublisher    signing core
//! ```
//!
//! ## Session Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Deduplication | A frame is stored at most once per session |
//! | Exact completion | Decode runs once, when captured reaches the declared total |
//! | Single result | One terminal outcome per session; later frames are ignored |
//! | Clean failure | A failed decode empties the bucket and returns to `Idle` |
//! | Reset wins | Results produced across a reset are never delivered |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - ScanSession, ScanMode, payloads, secrets
//! - `ports/` - FrameIngestApi (inbound), DecodeOracle and ScanEventPublisher (outbound)
//! - `service/` - FrameStitcher state machine
//! - `recovery` - Banana split passphrase attempts
//! - `adapters/` - Tokio worker, broadcast publisher, codec-backed oracle
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use vs_02_frame_stitcher::{BroadcastPublisher, CodecOracle, FrameStitcher, StitcherConfig, StitcherWorker};
//!
//! let config = StitcherConfig::from_env();
//! let publisher = Arc::new(BroadcastPublisher::new(config.event_capacity));
//! let mut events = publisher.subscribe();
//! let stitcher = FrameStitcher::new(Arc::new(CodecOracle::default()), config);
//! let (handle, _join) = StitcherWorker::spawn(stitcher, publisher);
//!
//! handle.submit_frame(line).await?;
//! let event = events.recv().await?;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod recovery;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::broadcast::BroadcastPublisher;
#[cfg(feature = "codec")]
pub use adapters::codec_oracle::CodecOracle;
pub use adapters::worker::{StitcherHandle, StitcherWorker};
pub use config::StitcherConfig;
pub use domain::{
    BananaSplitShares, DecodedPayload, PayloadType, RecoveredSeed, RecoveryStage, ScanMode,
    ScanProgress, ScanSession, ScanSnapshot, SecretPassword,
};
pub use error::{OracleError, ScanError};
pub use metrics::{MetricsRecorder, MetricsSnapshot, NoOpMetrics, ScanMetrics};
pub use ports::inbound::{FrameIngestApi, IngestOutcome};
pub use ports::outbound::{
    BananaSplitOutcome, DecodeOracle, FrameSetResult, NoOpPublisher, PublishError, ScanEvent,
    ScanEventKind, ScanEventPublisher,
};
pub use recovery::{PasswordRecovery, RecoveryStatus};
pub use service::{Classification, FrameStitcher};
