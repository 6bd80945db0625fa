//! # Payload Classification
//!
//! Completed payloads open with a three byte prelude:
//! `0x53` (substrate), encryption algorithm, payload type.

use serde::{Deserialize, Serialize};

/// First prelude byte of every substrate payload.
pub const SUBSTRATE_PRELUDE: u8 = 0x53;

/// Payload type byte for a dynamic derivations request.
pub const DYNAMIC_DERIVATIONS_TYPE: u8 = 0xdf;

/// What a completed payload asks the signing core to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Transaction,
    DynamicDerivations,
}

/// Classify completed payload bytes by their prelude.
pub fn classify_payload(bytes: &[u8]) -> PayloadKind {
    match bytes {
        [SUBSTRATE_PRELUDE, _, DYNAMIC_DERIVATIONS_TYPE, ..] => PayloadKind::DynamicDerivations,
        _ => PayloadKind::Transaction,
    }
}
