//! # Stitcher Configuration
//!
//! Defaults suit a phone camera; every field can be overridden from the
//! environment.
//!
//! | Field | Env var | Default |
//! |-------|---------|---------|
//! | `max_expected_frames` | `VS_MAX_EXPECTED_FRAMES` | 4096 |
//! | `max_invalid_password_attempts` | `VS_MAX_PASSWORD_ATTEMPTS` | 3 |
//! | `command_queue_depth` | `VS_COMMAND_QUEUE_DEPTH` | 64 |
//! | `event_capacity` | `VS_EVENT_CAPACITY` | 32 |

use crate::error::ScanError;
use serde::{Deserialize, Serialize};

/// Bounds enforced by [`StitcherConfig::validate`].
pub mod limits {
    /// Largest total a first frame may declare.
    pub const MAX_EXPECTED_FRAMES: u32 = 65_535;

    /// Upper bound on passphrase attempts.
    pub const MAX_PASSWORD_ATTEMPTS: u32 = 100;

    /// Upper bound on queued worker commands.
    pub const MAX_QUEUE_DEPTH: usize = 65_536;
}

/// Configuration for the frame stitcher and its worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitcherConfig {
    /// Declared totals above this are treated as malformed.
    pub max_expected_frames: u32,

    /// Wrong passphrases tolerated before recovery closes.
    pub max_invalid_password_attempts: u32,

    /// Bounded command queue between the handle and the worker.
    pub command_queue_depth: usize,

    /// Broadcast buffer for scan events.
    pub event_capacity: usize,
}

impl Default for StitcherConfig {
    fn default() -> Self {
        Self {
            max_expected_frames: 4096,
            max_invalid_password_attempts: 3,
            command_queue_depth: 64,
            event_capacity: 32,
        }
    }
}

impl StitcherConfig {
    /// Load from environment, falling back to defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_expected_frames: env_or("VS_MAX_EXPECTED_FRAMES", defaults.max_expected_frames),
            max_invalid_password_attempts: env_or(
                "VS_MAX_PASSWORD_ATTEMPTS",
                defaults.max_invalid_password_attempts,
            ),
            command_queue_depth: env_or("VS_COMMAND_QUEUE_DEPTH", defaults.command_queue_depth),
            event_capacity: env_or("VS_EVENT_CAPACITY", defaults.event_capacity),
        }
    }

    pub fn with_max_expected_frames(mut self, max: u32) -> Self {
        self.max_expected_frames = max;
        self
    }

    pub fn with_max_invalid_password_attempts(mut self, attempts: u32) -> Self {
        self.max_invalid_password_attempts = attempts;
        self
    }

    pub fn with_command_queue_depth(mut self, depth: usize) -> Self {
        self.command_queue_depth = depth;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Reject values the stitcher cannot run with.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.max_expected_frames == 0 || self.max_expected_frames > limits::MAX_EXPECTED_FRAMES
        {
            return Err(ScanError::InvalidConfig(format!(
                "max_expected_frames must be in 1..={}, got {}",
                limits::MAX_EXPECTED_FRAMES,
                self.max_expected_frames
            )));
        }
        if self.max_invalid_password_attempts > limits::MAX_PASSWORD_ATTEMPTS {
            return Err(ScanError::InvalidConfig(format!(
                "max_invalid_password_attempts must be at most {}",
                limits::MAX_PASSWORD_ATTEMPTS
            )));
        }
        if self.command_queue_depth == 0 || self.command_queue_depth > limits::MAX_QUEUE_DEPTH {
            return Err(ScanError::InvalidConfig(format!(
                "command_queue_depth must be in 1..={}",
                limits::MAX_QUEUE_DEPTH
            )));
        }
        if self.event_capacity == 0 {
            return Err(ScanError::InvalidConfig(
                "event_capacity must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
