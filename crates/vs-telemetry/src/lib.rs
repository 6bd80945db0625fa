//! # Vault Scanner Telemetry
//!
//! Structured logging for the scanner binaries.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vs_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     vs_telemetry::log_event!(info, "runtime", "ready");
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RUST_LOG` | unset | Full filter directive, overrides `VS_LOG_LEVEL` |
//! | `VS_LOG_LEVEL` | `info` | Log level filter |
//! | `VS_JSON_LOGS` | `false` | JSON log lines |
//! | `VS_SERVICE_NAME` | `vault-scanner` | Service name |

mod config;
mod logging;
mod tracing_setup;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use tracing_setup::{build_filter, init_tracing};

#[doc(hidden)]
pub use tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for a scanner process.
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_tracing(config)
}
