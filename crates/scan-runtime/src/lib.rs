//! # Vault Scanner Runtime
//!
//! Headless front end for the frame stitcher.
//!
//! ## Data Flow
//!
//! ```text
//! stdin ──line──→ StitcherHandle::ingest ──→ worker ──→ CodecOracle
//!                        │                      │
//!                        ↓                      ↓
//!                 ScanReport (stdout)    ScanEvent ──→ log_events (stderr)
//! ```
//!
//! ## Modules
//!
//! - `config` - CLI flags layered over environment configuration
//! - `output` - JSON report lines
//! - `runtime` - Input loop and worker wiring

pub mod config;
pub mod output;
pub mod runtime;

pub use config::{Cli, RuntimeConfig};
pub use output::ScanReport;
pub use runtime::{RunSummary, ScanRuntime, COMPONENT};
