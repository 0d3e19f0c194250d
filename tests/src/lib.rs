//! # Chain Converter Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Keys, registries and input chains
//! └── integration/
//!     ├── end_to_end.rs # Conversion scenarios over whole blocks
//!     └── file_logs.rs  # Runs over file-backed block logs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cc-tests
//! cargo test -p cc-tests integration::file_logs::
//! ```

pub mod fixtures;
pub mod integration;
