//! Runtime configuration.
//!
//! Environment variables provide the base; command line flags override them.

use clap::Parser;
use vs_01_qr_codec::CodecConfig;
use vs_02_frame_stitcher::{ScanError, StitcherConfig};
use vs_telemetry::TelemetryConfig;

/// Headless multi-frame QR scanner.
///
/// Reads one decoded QR string per line from stdin and prints one JSON
/// line per completed scan.
#[derive(Debug, Default, Parser)]
#[command(name = "scan-runtime", version)]
pub struct Cli {
    /// Lines hold payload hex without the QR byte-mode header
    #[arg(long)]
    pub cleaned: bool,

    /// Emit JSON log lines on stderr
    #[arg(long)]
    pub json_logs: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Largest frame total a first frame may declare
    #[arg(long, value_name = "N")]
    pub max_expected_frames: Option<u32>,

    /// Bounded command queue depth for the stitcher worker
    #[arg(long, value_name = "N")]
    pub queue_depth: Option<usize>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub codec: CodecConfig,
    pub stitcher: StitcherConfig,
    pub telemetry: TelemetryConfig,
}

impl RuntimeConfig {
    /// Load from environment, apply CLI overrides, then validate.
    pub fn load(cli: &Cli) -> Result<Self, ScanError> {
        let mut codec = CodecConfig::from_env();
        if cli.cleaned {
            codec.cleaned = true;
        }

        let mut stitcher = StitcherConfig::from_env();
        if let Some(max) = cli.max_expected_frames {
            stitcher.max_expected_frames = max;
        }
        if let Some(depth) = cli.queue_depth {
            stitcher.command_queue_depth = depth;
        }
        stitcher.validate()?;

        let mut telemetry = TelemetryConfig::for_component("runtime");
        if cli.json_logs {
            telemetry.json_logs = true;
        }
        if let Some(level) = &cli.log_level {
            telemetry.log_level = level.clone();
        }

        Ok(Self {
            codec,
            stitcher,
            telemetry,
        })
    }
}
