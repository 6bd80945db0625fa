//! # QR Frame Codec (vs-01)
//!
//! Reference decoder for the frames an air-gapped signer scans from a
//! screen. It answers the two questions a frame stitcher asks:
//!
//! - how many frames does the sequence opened by this frame need?
//!   ([`expected_frame_count`])
//! - what does this complete set of frames decode to?
//!   ([`decode_frame_set`])
//!
//! ## Supported Transports
//!
//! | Transport | Count source | Result |
//! |-----------|--------------|--------|
//! | Static | always 1 | payload |
//! | Legacy multipart | 16-bit total in header | joined payload |
//! | Banana split | `r` field of the share | password request |
//! | Fountain (raptorq) | payload size over symbol size, plus one | decoded payload |
//!
//! The codec never recovers banana split secrets; that needs the signing
//! core and a passphrase.
//!
//! ## Usage
//!
//! ```
//! use vs_01_qr_codec::{decode_frame_set, expected_frame_count, DecodedFrameSet};
//!
//! let line = "40003530102";
//! assert_eq!(expected_frame_count(line, false).unwrap(), 1);
//! let decoded = decode_frame_set(&[line.to_string()], false).unwrap();
//! assert_eq!(decoded, DecodedFrameSet::Transaction("530102".into()));
//! ```

pub mod error;
pub mod frame;
pub mod parser;
pub mod payload;
pub mod sequence;

pub use error::CodecError;
pub use frame::{FountainFrame, Frame, LegacyFrame, ShareEnvelope};
pub use parser::{frame_bytes, strip_qr_header};
pub use payload::{classify_payload, PayloadKind};
pub use sequence::{Assembled, BananaSplitSet, SequenceAssembler};

/// Environment variable selecting cleaned (header-less) frames.
pub const CLEANED_FRAMES_ENV: &str = "VS_CLEANED_FRAMES";

/// Codec configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecConfig {
    /// Frames hold only payload hex, without the QR byte-mode header.
    pub cleaned: bool,
}

impl CodecConfig {
    /// Load from environment, falling back to defaults.
    pub fn from_env() -> Self {
        let cleaned = std::env::var(CLEANED_FRAMES_ENV)
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self { cleaned }
    }
}

/// Result of decoding a complete frame set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedFrameSet {
    /// Hex payload to hand to transaction parsing.
    Transaction(String),
    /// Hex payload of a dynamic derivations request.
    DynamicDerivations(String),
    /// Complete banana split share set awaiting a passphrase.
    BananaSplit(BananaSplitSet),
}

/// Number of frames needed to complete the sequence opened by `line`.
pub fn expected_frame_count(line: &str, cleaned: bool) -> Result<u32, CodecError> {
    Frame::parse(frame_bytes(line, cleaned)?).expected_total()
}

/// Decode a frame set in scan order.
///
/// Frames after the one completing the sequence are ignored.
pub fn decode_frame_set(frames: &[String], cleaned: bool) -> Result<DecodedFrameSet, CodecError> {
    if frames.is_empty() {
        return Err(CodecError::EmptySequence);
    }

    let mut assembler = SequenceAssembler::new();
    for line in frames {
        let frame = Frame::parse(frame_bytes(line, cleaned)?);
        if let Some(assembled) = assembler.push(frame)? {
            return Ok(finish(assembled));
        }
    }

    #[cfg(feature = "tracing-log")]
    tracing::debug!(frames = frames.len(), "frame set ended before completion");

    Err(CodecError::Incomplete)
}

fn finish(assembled: Assembled) -> DecodedFrameSet {
    match assembled {
        Assembled::BananaSplit(set) => DecodedFrameSet::BananaSplit(set),
        Assembled::Payload(bytes) => {
            let hex = hex::encode(&bytes);
            match classify_payload(&bytes) {
                PayloadKind::DynamicDerivations => DecodedFrameSet::DynamicDerivations(hex),
                PayloadKind::Transaction => DecodedFrameSet::Transaction(hex),
            }
        }
    }
}
