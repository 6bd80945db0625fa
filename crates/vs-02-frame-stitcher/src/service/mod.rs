//! # Application Service
//!
//! - `stitcher` - FrameStitcher, the synchronous state machine

mod stitcher;


pub use stitcher::{Classification, FrameStitcher};
