//! Cross-crate integration tests.

pub mod codec_pipeline;
pub mod flows;
