//! # Vault Scanner Runtime
//!
//! Reads decoded QR strings from stdin, one per line, and prints a JSON
//! line for every completed scan. Logs go to stderr.
//!
//! ## Startup Sequence
//!
//! 1. Parse CLI flags and layer them over environment configuration
//! 2. Initialize logging
//! 3. Spawn the stitcher worker
//! 4. Pump stdin until EOF, then drain and exit

use anyhow::Result;
use clap::Parser;
use scan_runtime::{Cli, RuntimeConfig, ScanRuntime, COMPONENT};
use vs_telemetry::log_event;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RuntimeConfig::load(&cli)?;

    vs_telemetry::init_telemetry(&config.telemetry)?;
    log_event!(
        info,
        COMPONENT,
        "scan runtime starting",
        cleaned = config.codec.cleaned,
        max_expected_frames = config.stitcher.max_expected_frames
    );

    let runtime = ScanRuntime::new(config);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let summary = runtime.run(stdin, tokio::io::stdout()).await?;

    log_event!(
        info,
        COMPONENT,
        "scan runtime finished",
        reports = summary.reports,
        metrics = ?summary.metrics
    );
    Ok(())
}
