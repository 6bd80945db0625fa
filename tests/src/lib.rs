//! # Vault Scanner Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── codec_pipeline.rs   # Real codec through the stitcher and worker
//!     └── flows.rs            # Reset races and passphrase recovery
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p vs-tests
//! cargo test -p vs-tests integration::flows::
//! ```

pub mod integration;
