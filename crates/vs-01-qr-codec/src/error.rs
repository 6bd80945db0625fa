//! # Codec Errors
//!
//! Every way a scanned line or a frame set can fail to decode.

use thiserror::Error;

/// Errors produced while parsing frames or assembling a frame set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Frame payload is not valid hex.
    #[error("invalid hex in frame payload: {0}")]
    Hex(String),

    /// Raw line does not start with the byte-mode indicator `4`.
    #[error("unsupported QR encoding mode: expected byte mode")]
    UnsupportedEncodingMode,

    /// Raw line is too short to carry the 16-bit length field.
    #[error("truncated QR header")]
    TruncatedHeader,

    /// Length field is not four hex digits.
    #[error("invalid length field {0:?}")]
    InvalidLengthField(String),

    /// Declared byte length is longer than the data present.
    #[error("declared length {declared} exceeds available {available} bytes")]
    LengthExceedsFrame { declared: usize, available: usize },

    /// Two fountain frames disagree on the payload size.
    #[error("conflicting fountain payload sizes: {expected} then {found}")]
    ConflictingFountainSizes { expected: u32, found: u32 },

    /// Fountain symbol does not fit the raptorq packet size field.
    #[error("fountain symbol of {0} bytes is too large")]
    OversizedSymbol(usize),

    /// Legacy frame declares zero total parts.
    #[error("legacy frame declares zero parts")]
    EmptyLegacyTotal,

    /// Legacy frame index is outside `0..total`.
    #[error("legacy frame index {index} out of range for {total} parts")]
    IndexOutOfRange { index: u16, total: u16 },

    /// Two legacy frames disagree on the number of parts.
    #[error("conflicting legacy lengths: {expected} then {found}")]
    ConflictingLengths { expected: u16, found: u16 },

    /// Same legacy index seen twice with different content.
    #[error("legacy index {0} repeated with different content")]
    DuplicateIndex(u16),

    /// Banana split share is not well formed.
    #[error("invalid banana split share: {0}")]
    InvalidShare(String),

    /// Banana split shares belong to different secrets.
    #[error("banana split shares belong to different sets")]
    ConflictingShares,

    /// A sequence of one kind was interrupted by a frame of another kind.
    #[error("{found} frame interrupted {expected} sequence")]
    MixedSequence {
        expected: &'static str,
        found: &'static str,
    },

    /// Frame set contained no frames.
    #[error("empty frame set")]
    EmptySequence,

    /// All frames were consumed without completing the payload.
    #[error("frame set incomplete: unable to decode")]
    Incomplete,
}

impl From<hex::FromHexError> for CodecError {
    fn from(err: hex::FromHexError) -> Self {
        Self::Hex(err.to_string())
    }
}
