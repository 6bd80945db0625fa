//! Test doubles for the outbound ports.
//!
//! Enabled for unit tests and, through the `test-utils` feature, for
//! downstream integration tests.

use crate::domain::{RecoveredSeed, SecretPassword};
use crate::error::OracleError;
use crate::ports::outbound::{
    BananaSplitOutcome, DecodeOracle, FrameSetResult, PublishError, ScanEvent, ScanEventKind,
    ScanEventPublisher,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

/// Decode oracle answering from a script.
///
/// - unscripted frames are malformed
/// - unscripted complete sets decode to a transaction of the concatenated frames
/// - scripted sets match regardless of frame order
#[derive(Default)]
pub struct ScriptedOracle {
    totals: HashMap<String, Result<u32, OracleError>>,
    sets: HashMap<Vec<String>, Result<FrameSetResult, OracleError>>,
    password: Option<(String, String)>,
    password_failure: Option<String>,
    decode_delay: Option<Duration>,
    count_calls: Mutex<Vec<String>>,
    decode_calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_total(mut self, frame: &str, total: u32) -> Self {
        self.totals.insert(frame.to_string(), Ok(total));
        self
    }

    pub fn with_malformed(mut self, frame: &str, reason: &str) -> Self {
        self.totals
            .insert(frame.to_string(), Err(OracleError::Malformed(reason.into())));
        self
    }

    /// Script every frame of `frames` to declare `frames.len()` as total.
    pub fn with_sequence(mut self, frames: &[&str]) -> Self {
        for frame in frames {
            self.totals
                .insert(frame.to_string(), Ok(frames.len() as u32));
        }
        self
    }

    pub fn with_result(mut self, frames: &[&str], result: FrameSetResult) -> Self {
        self.sets.insert(set_key(frames), Ok(result));
        self
    }

    pub fn with_failure(mut self, frames: &[&str], reason: &str) -> Self {
        self.sets
            .insert(set_key(frames), Err(OracleError::Failed(reason.into())));
        self
    }

    /// Script `frames` as a banana split set asking for a passphrase.
    pub fn with_banana_split(self, frames: &[&str]) -> Self {
        self.with_result(
            frames,
            FrameSetResult::BananaSplit(BananaSplitOutcome::RequestPassword),
        )
    }

    pub fn with_password(mut self, password: &str, seed: &str) -> Self {
        self.password = Some((password.to_string(), seed.to_string()));
        self
    }

    pub fn with_password_failure(mut self, reason: &str) -> Self {
        self.password_failure = Some(reason.to_string());
        self
    }

    /// Sleep inside `decode_frame_set`, simulating a slow signing core.
    pub fn with_decode_delay(mut self, delay: Duration) -> Self {
        self.decode_delay = Some(delay);
        self
    }

    /// Frames passed to `expected_frame_count`, in call order.
    pub fn count_calls(&self) -> Vec<String> {
        self.count_calls.lock().clone()
    }

    /// Frame sets passed to `decode_frame_set`, in call order.
    pub fn decode_calls(&self) -> Vec<Vec<String>> {
        self.decode_calls.lock().clone()
    }
}

fn set_key<S: AsRef<str>>(frames: &[S]) -> Vec<String> {
    let mut key: Vec<String> = frames.iter().map(|f| f.as_ref().to_string()).collect();
    key.sort();
    key
}

impl DecodeOracle for ScriptedOracle {
    fn expected_frame_count(&self, frame: &str) -> Result<u32, OracleError> {
        self.count_calls.lock().push(frame.to_string());
        self.totals
            .get(frame)
            .cloned()
            .unwrap_or_else(|| Err(OracleError::Malformed(format!("unscripted frame {frame:?}"))))
    }

    fn decode_frame_set(&self, frames: &[String]) -> Result<FrameSetResult, OracleError> {
        self.decode_calls.lock().push(frames.to_vec());
        if let Some(delay) = self.decode_delay {
            std::thread::sleep(delay);
        }
        self.sets
            .get(&set_key(frames))
            .cloned()
            .unwrap_or_else(|| Ok(FrameSetResult::Transaction(frames.concat())))
    }

    fn decode_with_password(
        &self,
        _frames: &[String],
        password: &SecretPassword,
    ) -> Result<FrameSetResult, OracleError> {
        if let Some(reason) = &self.password_failure {
            return Err(OracleError::Failed(reason.clone()));
        }
        match &self.password {
            Some((expected, seed)) if expected == password.expose() => Ok(
                FrameSetResult::BananaSplit(BananaSplitOutcome::RecoveredSeed(RecoveredSeed::new(
                    seed.clone(),
                ))),
            ),
            _ => Err(OracleError::WrongPassword),
        }
    }
}

/// Recording publisher for testing.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<ScanEvent>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScanEvent> {
        self.events.lock().clone()
    }

    pub fn kinds(&self) -> Vec<ScanEventKind> {
        self.events.lock().iter().map(|e| e.kind.clone()).collect()
    }
}

impl ScanEventPublisher for RecordingPublisher {
    fn publish(&self, event: ScanEvent) -> Result<(), PublishError> {
        self.events.lock().push(event);
        Ok(())
    }
}
