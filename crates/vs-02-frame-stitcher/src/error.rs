//! # Scan Errors
//!
//! Error types surfaced by the frame stitcher and its decode oracle.

use crate::domain::ScanMode;
use thiserror::Error;

/// Failure reported by a [`DecodeOracle`](crate::ports::outbound::DecodeOracle).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The frame could not be parsed at all.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// Passphrase did not open the banana split shares.
    #[error("wrong banana split passphrase")]
    WrongPassword,

    /// Any other decode failure.
    #[error("decode failed: {0}")]
    Failed(String),
}

/// Errors produced while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Scanner delivered an empty string.
    #[error("empty frame")]
    EmptyFrame,

    /// First frame could not be classified.
    #[error("malformed frame: {reason}")]
    MalformedFrame { reason: String },

    /// Complete frame set failed to decode.
    #[error("decode failure: {reason}")]
    DecodeFailure { reason: String },

    /// Oracle returned a recovered seed without being given a passphrase.
    #[error("decoder returned a recovered seed without a passphrase")]
    UnexpectedRecoveredSeed,

    /// Passphrase rejected; more attempts remain.
    #[error("invalid passphrase, {attempts_left} attempt(s) left")]
    InvalidPassword { attempts_left: u32 },

    /// Too many wrong passphrases; recovery is closed.
    #[error("too many invalid passphrase attempts")]
    PasswordAttemptsExhausted,

    /// Password recovery completion requested outside of `AwaitingPassword`.
    #[error("not awaiting a passphrase (mode: {mode:?})")]
    NotAwaitingPassword { mode: ScanMode },

    /// Recovery already finished.
    #[error("password recovery already closed")]
    RecoveryClosed,

    /// Background worker is gone.
    #[error("stitcher worker stopped")]
    WorkerStopped,

    /// Configuration rejected at startup.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ScanError {
    /// Whether scanning can continue after this error without user action.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyFrame
                | Self::MalformedFrame { .. }
                | Self::DecodeFailure { .. }
                | Self::UnexpectedRecoveredSeed
                | Self::InvalidPassword { .. }
        )
    }
}
