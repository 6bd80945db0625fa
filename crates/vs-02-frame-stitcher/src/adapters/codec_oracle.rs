//! Decode oracle backed by `vs-01-qr-codec`.
//!
//! Covers frame counting and payload assembly. Banana split passphrase
//! recovery needs the signing core, so password decodes always fail here.

use crate::domain::SecretPassword;
use crate::error::OracleError;
use crate::ports::outbound::{BananaSplitOutcome, DecodeOracle, FrameSetResult};
use vs_01_qr_codec::{CodecConfig, DecodedFrameSet};

/// Reference oracle for headless scanning.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodecOracle {
    config: CodecConfig,
}

impl CodecOracle {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }
}

impl DecodeOracle for CodecOracle {
    fn expected_frame_count(&self, frame: &str) -> Result<u32, OracleError> {
        vs_01_qr_codec::expected_frame_count(frame, self.config.cleaned)
            .map_err(|e| OracleError::Malformed(e.to_string()))
    }

    fn decode_frame_set(&self, frames: &[String]) -> Result<FrameSetResult, OracleError> {
        let decoded = vs_01_qr_codec::decode_frame_set(frames, self.config.cleaned)
            .map_err(|e| OracleError::Failed(e.to_string()))?;

        Ok(match decoded {
            DecodedFrameSet::Transaction(hex) => FrameSetResult::Transaction(hex),
            DecodedFrameSet::DynamicDerivations(hex) => FrameSetResult::DynamicDerivations(hex),
            DecodedFrameSet::BananaSplit(_) => {
                FrameSetResult::BananaSplit(BananaSplitOutcome::RequestPassword)
            }
        })
    }

    fn decode_with_password(
        &self,
        frames: &[String],
        _password: &SecretPassword,
    ) -> Result<FrameSetResult, OracleError> {
        match self.decode_frame_set(frames)? {
            FrameSetResult::BananaSplit(_) => Err(OracleError::Failed(
                "banana split seed recovery is not available in the reference codec".into(),
            )),
            other => Ok(other),
        }
    }
}
