//! # Banana Split Password Recovery
//!
//! Drives passphrase attempts against a complete share set. Wrong
//! passphrases are counted; once the count passes the configured maximum
//! the recovery closes for good.

use crate::domain::{BananaSplitShares, RecoveredSeed, SecretPassword};
use crate::error::{OracleError, ScanError};
use crate::ports::outbound::{BananaSplitOutcome, DecodeOracle, FrameSetResult};
use std::sync::Arc;
use tracing::{info, warn};

/// Where a recovery stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStatus {
    /// Accepting passphrase attempts.
    Pending,
    /// A seed was recovered.
    Recovered,
    /// Too many wrong passphrases, or the oracle failed.
    Closed,
}

/// One passphrase flow over one share set.
pub struct PasswordRecovery<O: DecodeOracle> {
    shares: BananaSplitShares,
    oracle: Arc<O>,
    max_invalid_attempts: u32,
    invalid_attempts: u32,
    status: RecoveryStatus,
}

impl<O: DecodeOracle> PasswordRecovery<O> {
    pub fn new(shares: BananaSplitShares, oracle: Arc<O>, max_invalid_attempts: u32) -> Self {
        Self {
            shares,
            oracle,
            max_invalid_attempts,
            invalid_attempts: 0,
            status: RecoveryStatus::Pending,
        }
    }

    pub fn status(&self) -> RecoveryStatus {
        self.status
    }

    pub fn invalid_attempts(&self) -> u32 {
        self.invalid_attempts
    }

    pub fn shares(&self) -> &BananaSplitShares {
        &self.shares
    }

    /// Attempts left before the recovery closes.
    pub fn attempts_left(&self) -> u32 {
        (self.max_invalid_attempts + 1).saturating_sub(self.invalid_attempts)
    }

    /// Try one passphrase.
    pub fn attempt(&mut self, password: &SecretPassword) -> Result<RecoveredSeed, ScanError> {
        if self.status != RecoveryStatus::Pending {
            return Err(ScanError::RecoveryClosed);
        }

        match self
            .oracle
            .decode_with_password(self.shares.frames(), password)
        {
            Ok(FrameSetResult::BananaSplit(BananaSplitOutcome::RecoveredSeed(seed))) => {
                self.status = RecoveryStatus::Recovered;
                info!(attempts = self.invalid_attempts + 1, "banana split seed recovered");
                Ok(seed)
            }
            Err(OracleError::WrongPassword) => {
                self.invalid_attempts += 1;
                if self.invalid_attempts > self.max_invalid_attempts {
                    self.status = RecoveryStatus::Closed;
                    warn!(attempts = self.invalid_attempts, "passphrase attempts exhausted");
                    Err(ScanError::PasswordAttemptsExhausted)
                } else {
                    let attempts_left = self.attempts_left();
                    warn!(attempts_left, "wrong banana split passphrase");
                    Err(ScanError::InvalidPassword { attempts_left })
                }
            }
            Err(err) => {
                self.status = RecoveryStatus::Closed;
                warn!(error = %err, "banana split recovery failed");
                Err(ScanError::DecodeFailure {
                    reason: err.to_string(),
                })
            }
            Ok(other) => {
                self.status = RecoveryStatus::Closed;
                warn!("passphrase decode returned a non-seed payload");
                Err(ScanError::DecodeFailure {
                    reason: format!("expected a recovered seed, got {}", result_kind(&other)),
                })
            }
        }
    }
}

fn result_kind(result: &FrameSetResult) -> &'static str {
    match result {
        FrameSetResult::BananaSplit(_) => "a password request",
        FrameSetResult::DynamicDerivations(_) => "dynamic derivations",
        FrameSetResult::Transaction(_) => "a transaction",
        FrameSetResult::DynamicDerivationsTransaction(_) => "dynamic derivations transaction",
    }
}
