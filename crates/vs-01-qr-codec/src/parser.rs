//! # QR Line Parser
//!
//! Raw scanner output is the hex form of the QR data segment:
//!
//! ```text
//! 4 | LLLL | payload (2 * LLLL hex chars) | padding
//! ^   ^
//! |   16-bit byte count
//! byte mode indicator
//! ```
//!
//! Scanners that already strip the header deliver "cleaned" lines holding
//! only the payload hex.

use crate::error::CodecError;

/// Byte-mode indicator at the start of every uncleaned line.
pub const BYTE_MODE_INDICATOR: char = '4';

/// Number of hex digits carrying the payload byte count.
pub const LENGTH_FIELD_DIGITS: usize = 4;

/// Strip the mode indicator, length field and trailing padding.
pub fn strip_qr_header(line: &str) -> Result<&str, CodecError> {
    let rest = line
        .strip_prefix(BYTE_MODE_INDICATOR)
        .ok_or(CodecError::UnsupportedEncodingMode)?;

    if rest.len() < LENGTH_FIELD_DIGITS || !rest.is_char_boundary(LENGTH_FIELD_DIGITS) {
        return Err(CodecError::TruncatedHeader);
    }
    let (length_field, body) = rest.split_at(LENGTH_FIELD_DIGITS);
    let declared = usize::from_str_radix(length_field, 16)
        .map_err(|_| CodecError::InvalidLengthField(length_field.to_string()))?;

    body.get(..declared * 2)
        .ok_or(CodecError::LengthExceedsFrame {
            declared,
            available: body.len() / 2,
        })
}

/// Decode a scanned line into payload bytes.
pub fn frame_bytes(line: &str, cleaned: bool) -> Result<Vec<u8>, CodecError> {
    let payload = if cleaned {
        line
    } else {
        strip_qr_header(line)?
    };
    Ok(hex::decode(payload)?)
}
