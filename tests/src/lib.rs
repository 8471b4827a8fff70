//! # Trust-Stamp Mail Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs        # Send, verify, tamper, identity checks
//!     └── file_store.rs   # JSON mailboxes shared between clients
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ts-tests
//! cargo test -p ts-tests integration::flows::
//! ```

pub mod integration;
