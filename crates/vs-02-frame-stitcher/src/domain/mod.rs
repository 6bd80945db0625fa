//! # Scan Domain
//!
//! Pure scanning state: no I/O, no async, no oracle calls.
//!
//! ## State Machine
//!
//! ```text
//!             first frame                 total > 1
//!   Idle ─────────────────→ AwaitingFirstFrame ─────────→ Accumulating
//!    ↑                          │ total == 1                  │ captured == total
//!    │                          ↓                             ↓
//!    │                      [decode] ←────────────────────────┘
//!    │                          │
//!    │   failure / reset        ├── banana split ──→ AwaitingPassword
//!    └──────────────────────────┤                          │ recovered
//!                               └── payload ─────→ Completed ←┘
//! ```
//!
//! ## Module Structure
//!
//! - `session` - ScanSession bucket and ScanMode
//! - `progress` - ScanProgress and epoch-tagged ScanSnapshot
//! - `payload` - DecodedPayload variants
//! - `secret` - Zeroizing passphrase and seed wrappers

mod payload;
mod progress;
mod secret;
mod session;


pub use payload::{BananaSplitShares, DecodedPayload, PayloadType, RecoveryStage};
pub use progress::{ScanProgress, ScanSnapshot};
pub use secret::{RecoveredSeed, SecretPassword};
pub use session::{ScanMode, ScanSession};
