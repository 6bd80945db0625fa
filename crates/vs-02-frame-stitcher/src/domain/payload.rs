//! # Decoded Payloads

use serde::{Deserialize, Serialize};

/// Discriminant of a [`DecodedPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadType {
    Transaction,
    DynamicDerivations,
    DynamicDerivationsTransaction,
    BananaSplitRecovery,
}

/// Where a banana split recovery stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStage {
    /// Shares are complete; a passphrase must still be supplied.
    PasswordRequired,
    /// The passphrase flow finished successfully.
    Recovered,
}

/// The frame set holding a complete banana split share set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BananaSplitShares {
    frames: Vec<String>,
    stage: RecoveryStage,
}

impl BananaSplitShares {
    pub fn password_required(frames: Vec<String>) -> Self {
        Self {
            frames,
            stage: RecoveryStage::PasswordRequired,
        }
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn stage(&self) -> RecoveryStage {
        self.stage
    }

    pub fn into_recovered(self) -> Self {
        Self {
            frames: self.frames,
            stage: RecoveryStage::Recovered,
        }
    }
}

/// Terminal result of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DecodedPayload {
    /// Hex payload for transaction parsing.
    Transaction(String),
    /// Hex payload of a dynamic derivations request.
    DynamicDerivations(String),
    /// Several hex payloads combining derivations and transactions.
    DynamicDerivationsTransaction(Vec<String>),
    /// Banana split share set handed to the passphrase flow.
    BananaSplitRecovery(BananaSplitShares),
}

impl DecodedPayload {
    pub fn payload_type(&self) -> PayloadType {
        match self {
            Self::Transaction(_) => PayloadType::Transaction,
            Self::DynamicDerivations(_) => PayloadType::DynamicDerivations,
            Self::DynamicDerivationsTransaction(_) => PayloadType::DynamicDerivationsTransaction,
            Self::BananaSplitRecovery(_) => PayloadType::BananaSplitRecovery,
        }
    }

    /// Payload strings in delivery order.
    pub fn payload(&self) -> Vec<String> {
        match self {
            Self::Transaction(hex) | Self::DynamicDerivations(hex) => vec![hex.clone()],
            Self::DynamicDerivationsTransaction(hexes) => hexes.clone(),
            Self::BananaSplitRecovery(shares) => shares.frames().to_vec(),
        }
    }
}
