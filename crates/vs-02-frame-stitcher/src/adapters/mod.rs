//! # Adapters
//!
//! - `worker` - Tokio worker owning the stitcher behind a bounded queue
//! - `broadcast` - ScanEventPublisher over a tokio broadcast channel
//! - `codec_oracle` - DecodeOracle backed by the reference QR codec

pub mod broadcast;
#[cfg(feature = "codec")]
pub mod codec_oracle;
pub mod worker;
