//! # Frame Classification
//!
//! A decoded frame is exactly one of:
//!
//! | Kind | Marker | Multi-frame |
//! |------|--------|-------------|
//! | Fountain | high bit of byte 0 set, raptorq packet | yes |
//! | Legacy | byte 0 is `0x00`, 5-byte header | yes |
//! | Banana share | JSON share envelope | yes |
//! | Static | anything else | no |

use crate::error::CodecError;
use serde::{Deserialize, Serialize};

/// Marker byte opening a legacy multipart frame.
pub const LEGACY_MARKER: u8 = 0x00;

/// Legacy header: marker, big-endian u16 total, big-endian u16 index.
pub const LEGACY_HEADER_LEN: usize = 5;

/// Fountain frames carry the payload size with this bit set.
pub const FOUNTAIN_FLAG: u8 = 0x80;

/// Fountain header: big-endian u32 payload size with [`FOUNTAIN_FLAG`] set.
pub const FOUNTAIN_HEADER_LEN: usize = 4;

/// Payload id (source block number and symbol id) opening every raptorq packet.
pub const PACKET_ID_LEN: usize = 4;

/// One raptorq packet of a fountain-coded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FountainFrame {
    /// Size of the whole encoded payload in bytes.
    pub size: u32,
    /// Serialized raptorq encoding packet.
    pub packet: Vec<u8>,
}

impl FountainFrame {
    fn try_parse(bytes: &[u8]) -> Option<Self> {
        if bytes.len() <= FOUNTAIN_HEADER_LEN + PACKET_ID_LEN || bytes[0] & FOUNTAIN_FLAG == 0 {
            return None;
        }
        let size = u32::from_be_bytes([bytes[0] & !FOUNTAIN_FLAG, bytes[1], bytes[2], bytes[3]]);
        if size == 0 {
            return None;
        }
        Some(Self {
            size,
            packet: bytes[FOUNTAIN_HEADER_LEN..].to_vec(),
        })
    }

    /// Symbol bytes carried by the packet.
    pub fn symbol_len(&self) -> usize {
        self.packet.len() - PACKET_ID_LEN
    }

    /// Frames to expect: enough packets to cover the payload plus one.
    ///
    /// Decoding is probabilistic; one extra packet keeps the estimate on the
    /// safe side.
    pub fn total(&self) -> u32 {
        let symbol_len = u32::try_from(self.symbol_len()).unwrap_or(u32::MAX);
        self.size / symbol_len + 1
    }
}

/// One part of a legacy multipart payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyFrame {
    pub total: u16,
    pub index: u16,
    pub data: Vec<u8>,
}

impl LegacyFrame {
    fn try_parse(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < LEGACY_HEADER_LEN || bytes[0] != LEGACY_MARKER {
            return None;
        }
        Some(Self {
            total: u16::from_be_bytes([bytes[1], bytes[2]]),
            index: u16::from_be_bytes([bytes[3], bytes[4]]),
            data: bytes[LEGACY_HEADER_LEN..].to_vec(),
        })
    }
}

/// One banana split share as printed into its QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareEnvelope {
    #[serde(rename = "v")]
    pub version: u8,
    #[serde(rename = "t")]
    pub title: String,
    #[serde(rename = "r")]
    pub required: u8,
    #[serde(rename = "d")]
    pub data: String,
    #[serde(rename = "n")]
    pub nonce: String,
}

impl ShareEnvelope {
    fn try_parse(bytes: &[u8]) -> Option<Self> {
        if bytes.first() != Some(&b'{') {
            return None;
        }
        serde_json::from_slice(bytes).ok()
    }

    /// Reject shares that can never form a set.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.required == 0 {
            return Err(CodecError::InvalidShare("zero shares required".into()));
        }
        if self.data.is_empty() {
            return Err(CodecError::InvalidShare("empty share data".into()));
        }
        Ok(())
    }

    /// Whether `other` belongs to the same split secret.
    pub fn same_set(&self, other: &ShareEnvelope) -> bool {
        self.title == other.title && self.nonce == other.nonce && self.required == other.required
    }
}

/// A classified frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Fountain(FountainFrame),
    Legacy(LegacyFrame),
    BananaShare(ShareEnvelope),
    Static(Vec<u8>),
}

impl Frame {
    /// Classify payload bytes. Never fails; unrecognised bytes are static.
    pub fn parse(bytes: Vec<u8>) -> Self {
        if let Some(share) = ShareEnvelope::try_parse(&bytes) {
            return Frame::BananaShare(share);
        }
        if let Some(fountain) = FountainFrame::try_parse(&bytes) {
            return Frame::Fountain(fountain);
        }
        match LegacyFrame::try_parse(&bytes) {
            Some(legacy) => Frame::Legacy(legacy),
            None => Frame::Static(bytes),
        }
    }

    /// Short name used in sequence errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Fountain(_) => "fountain",
            Frame::Legacy(_) => "legacy",
            Frame::BananaShare(_) => "banana split",
            Frame::Static(_) => "static",
        }
    }

    /// Number of frames needed to complete the sequence this frame opens.
    pub fn expected_total(&self) -> Result<u32, CodecError> {
        match self {
            Frame::Fountain(fountain) => Ok(fountain.total()),
            Frame::Legacy(legacy) => Ok(u32::from(legacy.total)),
            Frame::BananaShare(share) => {
                share.validate()?;
                Ok(u32::from(share.required))
            }
            Frame::Static(_) => Ok(1),
        }
    }
}
