//! # Secrets
//!
//! Passphrases and recovered seed phrases are wiped on drop and never
//! printed by `Debug`.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Banana split passphrase typed by the user.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretPassword(String);

impl SecretPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretPassword(***)")
    }
}

/// Seed phrase recovered from a banana split set.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RecoveredSeed(String);

impl RecoveredSeed {
    pub fn new(seed: impl Into<String>) -> Self {
        Self(seed.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RecoveredSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoveredSeed(***)")
    }
}

impl PartialEq for RecoveredSeed {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for RecoveredSeed {}
