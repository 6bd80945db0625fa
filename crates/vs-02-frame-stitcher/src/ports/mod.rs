//! # Ports
//!
//! - `inbound` - API the camera layer drives
//! - `outbound` - Decode oracle and event publisher the stitcher depends on

pub mod inbound;
pub mod outbound;
